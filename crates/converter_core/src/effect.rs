use std::time::Duration;

use crate::{HistoryEntry, JobId, RequestId, Theme, TimerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the URL to the backend to create a conversion job.
    StartConversion { request_id: RequestId, url: String },
    /// Query the backend for the job's status.
    CheckStatus { job_id: JobId },
    /// Start a repeating timer that delivers `Msg::PollTick { timer_id }`.
    StartTimer { timer_id: TimerId, interval: Duration },
    /// Stop the timer with this id. Unknown ids are ignored.
    CancelTimer { timer_id: TimerId },
    /// Tell the backend it may forget this job.
    ReleaseJob { job_id: JobId },
    /// Write the full history list to storage.
    PersistHistory { entries: Vec<HistoryEntry> },
    /// Write the explicit theme choice to storage.
    PersistTheme { theme: Theme },
    /// Fetch a converted file from the backend into the download directory.
    Download { filename: String },
    /// Show a transient message.
    Notify(Notification),
    /// Move the cursor back to the URL input.
    FocusInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
