use converter_core::{
    AppViewModel, HistoryRowView, Notification, NotificationKind, PanelOutcome, StatusPanelView,
};

use super::palette::Palette;

const BAR_WIDTH: usize = 30;

/// Text for the two regions of the screen. The event loop reprints a region
/// only when its lines differ from the last frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Frame {
    pub status: Vec<String>,
    pub history: Vec<String>,
}

pub(crate) fn frame(view: &AppViewModel, server: &str, palette: &Palette) -> Frame {
    Frame {
        status: view
            .status_panel
            .as_ref()
            .map(|panel| status_lines(panel, view.submit_label, server, palette))
            .unwrap_or_default(),
        history: history_lines(&view.history, server, palette),
    }
}

/// Server-provided text must never reach the terminal as raw control codes
/// or bidi overrides that reorder the rest of the line.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_control() || is_bidi_control(ch) {
            out.extend(ch.escape_default());
        } else {
            out.push(ch);
        }
    }
    out
}

fn is_bidi_control(ch: char) -> bool {
    matches!(
        ch,
        '\u{200E}' | '\u{200F}' | '\u{061C}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}

pub(crate) fn progress_bar(progress: u8) -> String {
    let progress = progress.min(100);
    let filled = usize::from(progress) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress
    )
}

fn status_lines(
    panel: &StatusPanelView,
    submit_label: &str,
    server: &str,
    palette: &Palette,
) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(info) = &panel.video_info {
        lines.push(format!(
            "{}{}{}",
            palette.accent,
            escape(&info.title),
            palette.reset
        ));
        let channel = if info.channel.is_empty() {
            String::new()
        } else {
            format!("{}  ", escape(&info.channel))
        };
        lines.push(format!(
            "{}{}{}{}",
            palette.muted,
            channel,
            escape(&info.duration),
            palette.reset
        ));
        if let Some(thumbnail) = &info.thumbnail {
            lines.push(format!(
                "{}thumbnail: {}{}",
                palette.muted,
                escape(thumbnail),
                palette.reset
            ));
        }
    }

    match &panel.outcome {
        PanelOutcome::InProgress => {
            lines.push(format!("{} {}", submit_label, progress_bar(panel.progress)));
            lines.push(escape(&panel.status_text));
        }
        PanelOutcome::Success {
            filename,
            filesize,
            download_path,
        } => {
            lines.push(format!(
                "{}Ready: {} ({}){}",
                palette.success,
                escape(filename),
                escape(filesize),
                palette.reset
            ));
            lines.push(format!("  {server}{download_path}"));
            lines.push("  Type `download` to save it locally.".to_string());
        }
        PanelOutcome::Failure { message, .. } => {
            lines.push(format!(
                "{}Error: {}{}",
                palette.error,
                escape(message),
                palette.reset
            ));
        }
    }
    lines
}

fn history_lines(rows: &[HistoryRowView], server: &str, palette: &Palette) -> Vec<String> {
    if rows.is_empty() {
        return vec![format!("{}No conversions yet{}", palette.muted, palette.reset)];
    }

    let mut lines = vec!["Recent conversions:".to_string()];
    for (index, row) in rows.iter().enumerate() {
        lines.push(format!(
            "{:>2}. {} {}({}){}",
            index + 1,
            escape(&row.title),
            palette.muted,
            escape(&row.filesize),
            palette.reset
        ));
        lines.push(format!("    {server}{}", row.download_path));
    }
    lines
}

pub(crate) fn notification_line(notification: &Notification, palette: &Palette) -> String {
    let tag = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
        NotificationKind::Info => "info",
        NotificationKind::Warning => "warn",
    };
    format!(
        "{}[{}]{} {}",
        palette.for_notification(notification.kind),
        tag,
        palette.reset,
        escape(&notification.message)
    )
}

pub(crate) fn download_progress_line(filename: &str, bytes: u64, total: Option<u64>) -> String {
    match total.filter(|total| *total > 0) {
        Some(total) => {
            let percent = (bytes.saturating_mul(100) / total).min(100) as u8;
            format!("{} {}", escape(filename), progress_bar(percent))
        }
        None => format!("{} {} KiB", escape(filename), bytes / 1024),
    }
}

pub(crate) const HELP: &[&str] = &[
    "Paste a YouTube link and press Enter to convert it.",
    "Commands:",
    "  clear            cancel the conversion and reset the input",
    "  history          list recent conversions",
    "  clear-history    forget all recent conversions",
    "  download [N]     save the finished file, or history entry N",
    "  theme            switch between dark and light",
    "  hide / show      poll slower or faster",
    "  help             show this text",
    "  quit             leave",
];

#[cfg(test)]
mod tests {
    use super::*;
    use converter_core::{ErrorKind, Theme, VideoInfoView};
    use pretty_assertions::assert_eq;

    const SERVER: &str = "http://localhost:5000";

    fn plain() -> Palette {
        Palette::for_theme(Theme::Dark, false)
    }

    fn panel(outcome: PanelOutcome) -> StatusPanelView {
        StatusPanelView {
            progress: 40,
            status_text: "Downloading... 40%".to_string(),
            video_info: Some(VideoInfoView {
                title: "Song".to_string(),
                channel: "Artist".to_string(),
                duration: "03:33".to_string(),
                thumbnail: None,
            }),
            outcome,
        }
    }

    #[test]
    fn escape_neutralises_control_characters() {
        assert_eq!(escape("a\x1b[2Jb"), "a\\u{1b}[2Jb");
        assert_eq!(escape("line\nbreak"), "line\\nbreak");
        assert_eq!(escape("Ünïcode ok"), "Ünïcode ok");
    }

    #[test]
    fn escape_neutralises_bidi_overrides() {
        assert_eq!(escape("abc\u{202E}3pm.exe"), "abc\\u{202e}3pm.exe");
        assert_eq!(escape("\u{2066}x\u{2069}"), "\\u{2066}x\\u{2069}");
        assert_eq!(escape("\u{200F}"), "\\u{200f}");
    }

    #[test]
    fn progress_bar_scales_and_clamps() {
        assert_eq!(progress_bar(0), format!("[{}]   0%", ".".repeat(30)));
        assert_eq!(progress_bar(50), format!("[{}{}]  50%", "#".repeat(15), ".".repeat(15)));
        assert_eq!(progress_bar(250), format!("[{}] 100%", "#".repeat(30)));
    }

    #[test]
    fn in_progress_panel_shows_info_and_bar() {
        let lines = status_lines(&panel(PanelOutcome::InProgress), "Converting...", SERVER, &plain());
        assert_eq!(
            lines,
            vec![
                "Song".to_string(),
                "Artist  03:33".to_string(),
                format!("Converting... {}", progress_bar(40)),
                "Downloading... 40%".to_string(),
            ]
        );
    }

    #[test]
    fn success_panel_links_to_server() {
        let lines = status_lines(
            &panel(PanelOutcome::Success {
                filename: "My Song.mp3".to_string(),
                filesize: "3.2 MB".to_string(),
                download_path: "/download/My%20Song.mp3".to_string(),
            }),
            "Convert",
            SERVER,
            &plain(),
        );
        assert!(lines.contains(&"Ready: My Song.mp3 (3.2 MB)".to_string()));
        assert!(lines.contains(&"  http://localhost:5000/download/My%20Song.mp3".to_string()));
    }

    #[test]
    fn failure_panel_escapes_message() {
        let lines = status_lines(
            &panel(PanelOutcome::Failure {
                kind: ErrorKind::Conversion,
                message: "bad\x07".to_string(),
            }),
            "Convert",
            SERVER,
            &plain(),
        );
        assert_eq!(lines.last().map(String::as_str), Some("Error: bad\\u{7}"));
    }

    #[test]
    fn history_lists_rows_or_placeholder() {
        assert_eq!(history_lines(&[], SERVER, &plain()), vec!["No conversions yet"]);

        let rows = vec![HistoryRowView {
            title: "Song".to_string(),
            filename: "Song.mp3".to_string(),
            filesize: "3.2 MB".to_string(),
            download_path: "/download/Song.mp3".to_string(),
        }];
        assert_eq!(
            history_lines(&rows, SERVER, &plain()),
            vec![
                "Recent conversions:",
                " 1. Song (3.2 MB)",
                "    http://localhost:5000/download/Song.mp3",
            ]
        );
    }

    #[test]
    fn notifications_are_tagged_by_kind() {
        let line = notification_line(
            &Notification::new(NotificationKind::Warning, "Please paste a YouTube link"),
            &plain(),
        );
        assert_eq!(line, "[warn] Please paste a YouTube link");
    }

    #[test]
    fn download_progress_without_length_counts_bytes() {
        assert_eq!(download_progress_line("a.mp3", 4096, None), "a.mp3 4 KiB");
        assert_eq!(
            download_progress_line("a.mp3", 5, Some(10)),
            format!("a.mp3 {}", progress_bar(50))
        );
    }
}
