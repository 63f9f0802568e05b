use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ConversionStarted {
        request_id: RequestId,
        result: Result<String, ApiError>,
    },
    StatusChecked {
        job_id: String,
        result: Result<StatusResponse, ApiError>,
    },
    Released {
        job_id: String,
        result: Result<(), ApiError>,
    },
    DownloadProgress {
        filename: String,
        bytes: u64,
        total: Option<u64>,
    },
    DownloadFinished {
        filename: String,
        result: Result<PathBuf, ApiError>,
    },
}

/// Body of `GET /status/{id}`. Unknown fields are ignored and every field
/// tolerates being absent or null.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub info: Option<VideoInfoResponse>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub filesize_formatted: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Progress as a whole percentage in `0..=100`.
    pub fn progress_percent(&self) -> u8 {
        match self.progress {
            Some(value) if value.is_finite() => value.round().clamp(0.0, 100.0) as u8,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct VideoInfoResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration_formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Message the server put in its `{error}` body, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self.kind {
            FailureKind::Rejected { .. } => Some(self.message.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Non-success status carrying an `{error}` message from the server.
    Rejected { status: u16 },
    /// Non-success status without a usable body.
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Rejected { status } => write!(f, "rejected by server ({status})"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
