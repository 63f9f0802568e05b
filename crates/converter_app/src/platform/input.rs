/// One line typed into the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Anything that is not a command is treated as a link to convert.
    Submit(String),
    Clear,
    History,
    ClearHistory,
    /// `None` downloads the current result; `Some(i)` the zero-based history row.
    Download(Option<usize>),
    Theme,
    Hide,
    Show,
    Help,
    Quit,
    Invalid(String),
}

pub(crate) fn parse(line: &str) -> Command {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = words.collect();

    let simple = |command: Command| {
        if rest.is_empty() {
            command
        } else {
            Command::Invalid(format!("`{head}` takes no arguments"))
        }
    };

    match head.as_str() {
        "clear" => simple(Command::Clear),
        "history" => simple(Command::History),
        "clear-history" => simple(Command::ClearHistory),
        "theme" => simple(Command::Theme),
        "hide" => simple(Command::Hide),
        "show" => simple(Command::Show),
        "help" | "?" => simple(Command::Help),
        "quit" | "exit" => simple(Command::Quit),
        "download" => match rest.as_slice() {
            [] => Command::Download(None),
            [index] => match index.parse::<usize>() {
                Ok(position) if position >= 1 => Command::Download(Some(position - 1)),
                _ => Command::Invalid(format!("`{index}` is not a history number")),
            },
            _ => Command::Invalid("usage: download [N]".to_string()),
        },
        _ => Command::Submit(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_and_blank_lines_are_submitted() {
        assert_eq!(
            parse("  https://youtu.be/abc \n"),
            Command::Submit("https://youtu.be/abc".to_string())
        );
        assert_eq!(parse(""), Command::Submit(String::new()));
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse("CLEAR"), Command::Clear);
        assert_eq!(parse("Clear-History"), Command::ClearHistory);
        assert_eq!(parse("exit"), Command::Quit);
        assert_eq!(parse("hide"), Command::Hide);
    }

    #[test]
    fn download_takes_a_one_based_row() {
        assert_eq!(parse("download"), Command::Download(None));
        assert_eq!(parse("download 1"), Command::Download(Some(0)));
        assert_eq!(parse("download 5"), Command::Download(Some(4)));
        assert!(matches!(parse("download 0"), Command::Invalid(_)));
        assert!(matches!(parse("download x"), Command::Invalid(_)));
        assert!(matches!(parse("download 1 2"), Command::Invalid(_)));
    }

    #[test]
    fn extra_words_after_simple_command_are_rejected() {
        assert!(matches!(parse("theme dark"), Command::Invalid(_)));
    }
}
