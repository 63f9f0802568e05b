const MAX_STEM_LEN: usize = 100;
const FALLBACK_STEM: &str = "audio";

/// Turns a server-provided filename into a safe local name.
///
/// Path separators, reserved characters and control characters are removed,
/// whitespace and dot runs are collapsed, the stem is capped at 100 bytes and
/// Windows device names get a trailing underscore. The `.mp3` extension is
/// always present on the result.
pub fn local_filename(remote: &str) -> String {
    let stem = remote
        .strip_suffix(".mp3")
        .or_else(|| remote.strip_suffix(".MP3"))
        .unwrap_or(remote);

    let cleaned: String = stem.chars().filter(|c| !is_forbidden(*c)).collect();
    let mut stem = collapse_runs(&cleaned);
    stem = stem.trim_matches(&[' ', '.'][..]).to_string();
    if stem.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        stem.truncate(cut);
        stem = stem.trim_end_matches(&[' ', '.'][..]).to_string();
    }
    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    format!("{stem}.mp3")
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}' | '\u{7F}'
    )
}

/// Collapses whitespace runs to one space and dot runs to one dot.
fn collapse_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev: Option<char> = None;
    for c in input.chars() {
        let c = if c.is_whitespace() { ' ' } else { c };
        if (c == ' ' || c == '.') && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
