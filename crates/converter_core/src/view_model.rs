use url::form_urlencoded::byte_serialize;

use crate::{ErrorKind, Theme, VideoInfo};

/// Backend route that serves converted files.
pub const DOWNLOAD_ROUTE: &str = "/download/";

/// Builds `/download/{filename}` with the filename percent-encoded as a single
/// path segment.
pub fn download_path(filename: &str) -> String {
    // byte_serialize uses form encoding; a literal '+' is already %2B, so every
    // remaining '+' stands for a space.
    let encoded: String = byte_serialize(filename.as_bytes()).collect();
    format!("{DOWNLOAD_ROUTE}{}", encoded.replace('+', "%20"))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub status_panel: Option<StatusPanelView>,
    pub history: Vec<HistoryRowView>,
    pub theme: Theme,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPanelView {
    pub progress: u8,
    pub status_text: String,
    pub video_info: Option<VideoInfoView>,
    pub outcome: PanelOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    InProgress,
    Success {
        filename: String,
        filesize: String,
        download_path: String,
    },
    Failure {
        kind: ErrorKind,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfoView {
    pub title: String,
    pub channel: String,
    pub duration: String,
    pub thumbnail: Option<String>,
}

impl VideoInfoView {
    pub(crate) fn from_info(info: &VideoInfo) -> Self {
        Self {
            title: info
                .title
                .clone()
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| "Loading...".to_string()),
            channel: info.channel.clone().unwrap_or_default(),
            duration: info
                .duration_formatted
                .clone()
                .filter(|duration| !duration.is_empty())
                .unwrap_or_else(|| "--:--".to_string()),
            thumbnail: info.thumbnail.clone().filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub title: String,
    pub filename: String,
    pub filesize: String,
    pub download_path: String,
}
