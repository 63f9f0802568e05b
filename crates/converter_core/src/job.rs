use std::fmt;

/// Opaque conversion identifier issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Error,
}

impl JobStatus {
    /// Maps the backend's status string. Anything that is not one of the known
    /// values is still in flight and counts as running.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "pending" => JobStatus::Pending,
            "completed" => JobStatus::Completed,
            "error" => JobStatus::Error,
            _ => JobStatus::Running,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub channel: Option<String>,
    pub thumbnail: Option<String>,
    pub duration_formatted: Option<String>,
}

/// One decoded answer from the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    pub status: JobStatus,
    pub progress: u8,
    pub status_text: Option<String>,
    pub info: Option<VideoInfo>,
    pub filename: Option<String>,
    pub filesize_formatted: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub filename: String,
    pub size_formatted: String,
}

const MISSING_OUTPUT: &str = "Conversion finished without an output file";

/// Client-side view of the active conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub status_text: String,
    pub video_info: Option<VideoInfo>,
    pub result: Option<JobResult>,
    pub error_message: Option<String>,
}

impl ConversionJob {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            progress: 0,
            status_text: String::new(),
            video_info: None,
            result: None,
            error_message: None,
        }
    }

    /// Folds a status report into the job. Video info and status text are
    /// sticky: a report that omits them keeps the previous values.
    pub(crate) fn apply_report(&mut self, report: &StatusReport) {
        self.status = report.status;
        self.progress = report.progress.min(100);
        if let Some(text) = report.status_text.as_ref().filter(|text| !text.is_empty()) {
            self.status_text = text.clone();
        }
        if let Some(info) = &report.info {
            self.video_info = Some(info.clone());
        }
        match report.status {
            JobStatus::Completed => match report.filename.clone().filter(|name| !name.is_empty()) {
                Some(filename) => {
                    self.result = Some(JobResult {
                        filename,
                        size_formatted: report.filesize_formatted.clone().unwrap_or_default(),
                    });
                    self.error_message = None;
                }
                // Nothing to download; the job is a failure as far as the user can tell.
                None => {
                    self.status = JobStatus::Error;
                    self.error_message = Some(MISSING_OUTPUT.to_string());
                    self.result = None;
                }
            },
            JobStatus::Error => {
                self.error_message = Some(
                    report
                        .error
                        .clone()
                        .filter(|message| !message.is_empty())
                        .unwrap_or_else(|| "Unknown error".to_string()),
                );
                self.result = None;
            }
            JobStatus::Pending | JobStatus::Running => {}
        }
    }

    /// Title used for history: video title if known, else the filename.
    pub fn display_title(&self) -> Option<String> {
        let title = self
            .video_info
            .as_ref()
            .and_then(|info| info.title.clone())
            .filter(|title| !title.is_empty());
        title.or_else(|| self.result.as_ref().map(|result| result.filename.clone()))
    }
}

/// User-visible failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or non-YouTube input; nothing was sent.
    Validation,
    /// Backend refused to create the job.
    JobStart,
    /// A single status check failed; polling continues.
    TransientPoll,
    /// Backend reported the conversion as failed.
    Conversion,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::JobStart => write!(f, "job start"),
            ErrorKind::TransientPoll => write!(f, "transient poll failure"),
            ErrorKind::Conversion => write!(f, "conversion"),
        }
    }
}
