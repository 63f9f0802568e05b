#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    InputChanged(String),
    /// User submitted the current input for conversion.
    ConvertClicked,
    /// User cleared the input; cancels any conversion in progress.
    ClearClicked,
    /// Backend answered the job creation request.
    ConversionStarted {
        request_id: crate::RequestId,
        result: Result<crate::JobId, String>,
    },
    /// A poll timer fired.
    PollTick { timer_id: crate::TimerId },
    /// Backend answered a status request for `job_id`.
    StatusReceived {
        job_id: crate::JobId,
        result: Result<crate::StatusReport, String>,
        received_at_millis: u64,
    },
    /// The session became visible or hidden.
    VisibilityChanged { visible: bool },
    /// Restore history loaded from storage.
    RestoreHistory(Vec<crate::HistoryEntry>),
    /// User asked to forget all history entries.
    ClearHistoryClicked,
    /// Restore the stored theme choice alongside the system default.
    RestoreTheme {
        saved: Option<crate::Theme>,
        system: crate::Theme,
    },
    /// User flipped between dark and light.
    ToggleThemeClicked,
    /// User asked to download the current result, or a history entry.
    DownloadClicked { history_index: Option<usize> },
    /// A download finished; `Ok` carries the saved path.
    DownloadFinished {
        filename: String,
        result: Result<String, String>,
    },
}
