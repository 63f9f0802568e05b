use std::path::{Path, PathBuf};

use converter_core::{HistoryEntry, Theme};
use converter_engine::{read_if_exists, AtomicFileWriter};
use converter_logging::{conv_error, conv_info, conv_warn};
use serde::{Deserialize, Serialize};

const HISTORY_FILENAME: &str = "history.ron";
const THEME_FILENAME: &str = "theme.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedEntry {
    filename: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    filesize: String,
    #[serde(default)]
    timestamp: u64,
}

/// Loads the history list. Missing or unreadable files yield an empty list.
pub(crate) fn load_history(data_dir: &Path) -> Vec<HistoryEntry> {
    let Some(content) = read_key(data_dir, HISTORY_FILENAME) else {
        return Vec::new();
    };

    let persisted: Vec<PersistedEntry> = match ron::from_str(&content) {
        Ok(entries) => entries,
        Err(err) => {
            conv_warn!(
                "Ignoring malformed history in {:?}: {}",
                data_dir.join(HISTORY_FILENAME),
                err
            );
            return Vec::new();
        }
    };

    conv_info!("Loaded {} history entries", persisted.len());
    persisted
        .into_iter()
        .map(|entry| HistoryEntry {
            filename: entry.filename,
            title: entry.title,
            filesize_formatted: entry.filesize,
            timestamp_millis: entry.timestamp,
        })
        .collect()
}

/// Writes the history list; failures are logged and otherwise ignored.
pub(crate) fn save_history(data_dir: &Path, entries: &[HistoryEntry]) {
    let persisted: Vec<PersistedEntry> = entries
        .iter()
        .map(|entry| PersistedEntry {
            filename: entry.filename.clone(),
            title: entry.title.clone(),
            filesize: entry.filesize_formatted.clone(),
            timestamp: entry.timestamp_millis,
        })
        .collect();

    let pretty = ron::ser::PrettyConfig::new();
    match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(content) => write_key(data_dir, HISTORY_FILENAME, &content),
        Err(err) => conv_error!("Failed to serialize history: {}", err),
    }
}

/// Stored theme choice; `None` means follow the system preference.
pub(crate) fn load_theme(data_dir: &Path) -> Option<Theme> {
    let content = read_key(data_dir, THEME_FILENAME)?;
    match ron::from_str::<String>(&content) {
        Ok(value) => Theme::parse(&value),
        Err(err) => {
            conv_warn!("Ignoring malformed theme preference: {}", err);
            None
        }
    }
}

pub(crate) fn save_theme(data_dir: &Path, theme: Theme) {
    match ron::to_string(theme.as_str()) {
        Ok(content) => write_key(data_dir, THEME_FILENAME, &content),
        Err(err) => conv_error!("Failed to serialize theme preference: {}", err),
    }
}

fn read_key(data_dir: &Path, filename: &str) -> Option<String> {
    match read_if_exists(data_dir, filename) {
        Ok(content) => content,
        Err(err) => {
            conv_warn!("Failed to read {:?}: {}", data_dir.join(filename), err);
            None
        }
    }
}

fn write_key(data_dir: &Path, filename: &str, content: &str) {
    let writer = AtomicFileWriter::new(PathBuf::from(data_dir));
    if let Err(err) = writer.write(filename, content) {
        conv_error!("Failed to write {:?}: {}", data_dir.join(filename), err);
    }
}
