use std::io::{self, Write};

use converter_core::{AppViewModel, Notification, Theme};

use super::palette::Palette;
use super::render::{self, Frame};

/// Line-oriented output. Keeps the last frame so unchanged regions are not
/// printed again.
pub(crate) struct Screen<W: Write> {
    out: W,
    color: bool,
    server: String,
    theme: Theme,
    last: Frame,
    progress_line_open: bool,
    at_prompt: bool,
}

impl Screen<io::Stdout> {
    pub(crate) fn stdout(color: bool, server: impl Into<String>) -> Self {
        Self::new(io::stdout(), color, server)
    }
}

impl<W: Write> Screen<W> {
    pub(crate) fn new(out: W, color: bool, server: impl Into<String>) -> Self {
        Self {
            out,
            color,
            server: server.into(),
            theme: Theme::default(),
            last: Frame::default(),
            progress_line_open: false,
            at_prompt: false,
        }
    }

    fn palette(&self) -> Palette {
        Palette::for_theme(self.theme, self.color)
    }

    pub(crate) fn render(&mut self, view: &AppViewModel) {
        self.theme = view.theme;
        let frame = render::frame(view, &self.server, &self.palette());

        let status: Vec<String> = changed_lines(&self.last.status, &frame.status)
            .into_iter()
            .cloned()
            .collect();
        self.print_lines(&status);
        if frame.history != self.last.history {
            self.print_lines(&frame.history);
        }
        self.last = frame;
    }

    /// Prints the history region even if it did not change.
    pub(crate) fn show_history(&mut self) {
        let history = self.last.history.clone();
        self.print_lines(&history);
    }

    pub(crate) fn notify(&mut self, notification: &Notification) {
        let line = render::notification_line(notification, &self.palette());
        self.print_lines(&[line]);
    }

    pub(crate) fn text(&mut self, lines: &[&str]) {
        let lines: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        self.print_lines(&lines);
    }

    /// Redraws a single download progress line in place.
    pub(crate) fn download_progress(&mut self, filename: &str, bytes: u64, total: Option<u64>) {
        let line = render::download_progress_line(filename, bytes, total);
        let _ = write!(self.out, "\r{line}\x1b[K");
        let _ = self.out.flush();
        self.progress_line_open = true;
        self.at_prompt = false;
    }

    pub(crate) fn prompt(&mut self) {
        self.close_progress_line();
        let _ = write!(self.out, "> ");
        let _ = self.out.flush();
        self.at_prompt = true;
    }

    /// Prints the prompt again if output arrived after it.
    pub(crate) fn restore_prompt(&mut self) {
        if !self.at_prompt && !self.progress_line_open {
            self.prompt();
        }
    }

    fn print_lines(&mut self, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        self.close_progress_line();
        for line in lines {
            let _ = writeln!(self.out, "{line}");
        }
        let _ = self.out.flush();
        self.at_prompt = false;
    }

    fn close_progress_line(&mut self) {
        if std::mem::take(&mut self.progress_line_open) {
            let _ = writeln!(self.out);
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

/// Lines of `new` that differ from the same position in `old`. A region that
/// changed shape is printed whole.
fn changed_lines<'a>(old: &[String], new: &'a [String]) -> Vec<&'a String> {
    if old.len() != new.len() {
        return new.iter().collect();
    }
    new.iter()
        .zip(old)
        .filter(|(new, old)| new != old)
        .map(|(new, _)| new)
        .collect()
}
