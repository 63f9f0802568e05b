use crate::view_model::{
    download_path, AppViewModel, HistoryRowView, PanelOutcome, StatusPanelView, VideoInfoView,
};
use crate::{ConversionJob, ErrorKind, History, Poller, Theme};

/// Tag for job creation requests, so a late answer can be matched or dropped.
pub type RequestId = u64;

/// Orchestrator-level progress of the single conversion slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for the backend to hand out a job id.
    Starting { request_id: RequestId },
    /// Job id known; the poller is running.
    Converting,
    Completed,
    Failed { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    phase: Phase,
    job: Option<ConversionJob>,
    status_panel_visible: bool,
    poller: Poller,
    history: History,
    theme_preference: Option<Theme>,
    system_theme: Theme,
    next_request_id: RequestId,
    pending_download: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            input: self.input.clone(),
            submit_enabled: !self.is_busy(),
            submit_label: if self.is_busy() {
                "Converting..."
            } else {
                "Convert"
            },
            status_panel: self.status_panel_view(),
            history: self
                .history
                .entries()
                .iter()
                .map(|entry| HistoryRowView {
                    title: if entry.title.is_empty() {
                        entry.filename.clone()
                    } else {
                        entry.title.clone()
                    },
                    filename: entry.filename.clone(),
                    filesize: entry.filesize_formatted.clone(),
                    download_path: download_path(&entry.filename),
                })
                .collect(),
            theme: self.theme(),
            dirty: self.dirty,
        }
    }

    fn status_panel_view(&self) -> Option<StatusPanelView> {
        if !self.status_panel_visible {
            return None;
        }

        let (progress, status_text, video_info) = match &self.job {
            Some(job) => (
                job.progress,
                if job.status_text.is_empty() {
                    "Waiting...".to_string()
                } else {
                    job.status_text.clone()
                },
                job.video_info.as_ref().map(VideoInfoView::from_info),
            ),
            None => (0, "Starting conversion...".to_string(), None),
        };

        let outcome = match &self.phase {
            Phase::Idle | Phase::Starting { .. } | Phase::Converting => PanelOutcome::InProgress,
            Phase::Completed => match self.job.as_ref().and_then(|job| job.result.as_ref()) {
                Some(result) => PanelOutcome::Success {
                    filename: result.filename.clone(),
                    filesize: result.size_formatted.clone(),
                    download_path: download_path(&result.filename),
                },
                None => PanelOutcome::InProgress,
            },
            Phase::Failed { kind, message } => PanelOutcome::Failure {
                kind: *kind,
                message: message.clone(),
            },
        };

        Some(StatusPanelView {
            progress,
            status_text,
            video_info,
            outcome,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn job(&self) -> Option<&ConversionJob> {
        self.job.as_ref()
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn pending_download(&self) -> Option<&str> {
        self.pending_download.as_deref()
    }

    /// Effective theme: explicit choice if any, otherwise the system default.
    pub fn theme(&self) -> Theme {
        self.theme_preference.unwrap_or(self.system_theme)
    }

    pub fn theme_preference(&self) -> Option<Theme> {
        self.theme_preference
    }

    /// True while a conversion occupies the single job slot.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Starting { .. } | Phase::Converting)
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, input: String) {
        self.input = input;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_status_panel_visible(&mut self, visible: bool) {
        self.status_panel_visible = visible;
    }

    pub(crate) fn take_job(&mut self) -> Option<ConversionJob> {
        self.job.take()
    }

    pub(crate) fn set_job(&mut self, job: ConversionJob) {
        self.job = Some(job);
    }

    pub(crate) fn job_mut(&mut self) -> Option<&mut ConversionJob> {
        self.job.as_mut()
    }

    pub(crate) fn poller_mut(&mut self) -> &mut Poller {
        &mut self.poller
    }

    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub(crate) fn set_history(&mut self, history: History) {
        self.history = history;
    }

    pub(crate) fn set_theme(&mut self, preference: Option<Theme>, system: Theme) {
        self.theme_preference = preference;
        self.system_theme = system;
    }

    pub(crate) fn set_theme_preference(&mut self, theme: Theme) {
        self.theme_preference = Some(theme);
    }

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.next_request_id
    }

    pub(crate) fn set_pending_download(&mut self, filename: Option<String>) {
        self.pending_download = filename;
    }
}
