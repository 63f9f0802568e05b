use converter_core::{NotificationKind, Theme};

/// ANSI colour codes for one theme. All fields are empty when colour is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    pub success: &'static str,
    pub error: &'static str,
    pub info: &'static str,
    pub warning: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub reset: &'static str,
}

const PLAIN: Palette = Palette {
    success: "",
    error: "",
    info: "",
    warning: "",
    muted: "",
    accent: "",
    reset: "",
};

const DARK: Palette = Palette {
    success: "\x1b[92m",
    error: "\x1b[91m",
    info: "\x1b[94m",
    warning: "\x1b[93m",
    muted: "\x1b[37m",
    accent: "\x1b[95m",
    reset: "\x1b[0m",
};

const LIGHT: Palette = Palette {
    success: "\x1b[32m",
    error: "\x1b[31m",
    info: "\x1b[34m",
    warning: "\x1b[33m",
    muted: "\x1b[90m",
    accent: "\x1b[35m",
    reset: "\x1b[0m",
};

impl Palette {
    pub(crate) fn for_theme(theme: Theme, color: bool) -> Self {
        match (color, theme) {
            (false, _) => PLAIN,
            (true, Theme::Dark) => DARK,
            (true, Theme::Light) => LIGHT,
        }
    }

    pub(crate) fn for_notification(&self, kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Error => self.error,
            NotificationKind::Info => self.info,
            NotificationKind::Warning => self.warning,
        }
    }
}

/// Terminal counterpart of `prefers-color-scheme`, read from `COLORFGBG`
/// (`"fg;bg"`, sometimes `"fg;default;bg"`). Unknown means dark.
pub(crate) fn theme_from_colorfgbg(value: Option<&str>) -> Theme {
    let background = value
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match background {
        Some(7) | Some(9..=15) => Theme::Light,
        _ => Theme::Dark,
    }
}

pub(crate) fn system_theme() -> Theme {
    theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}
