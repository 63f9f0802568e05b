//! Converter core: pure state machine and view-model helpers.
mod effect;
mod history;
mod job;
mod msg;
mod poller;
mod state;
mod theme;
mod update;
mod validate;
mod view_model;

pub use effect::{Effect, Notification, NotificationKind};
pub use history::{History, HistoryEntry, MAX_HISTORY_ENTRIES};
pub use job::{ConversionJob, ErrorKind, JobId, JobResult, JobStatus, StatusReport, VideoInfo};
pub use msg::Msg;
pub use poller::{Cadence, PollSettings, Poller, PollerState, TimerId};
pub use state::{AppState, Phase, RequestId};
pub use theme::Theme;
pub use update::update;
pub use validate::is_valid_url;
pub use view_model::{
    download_path, AppViewModel, HistoryRowView, PanelOutcome, StatusPanelView, VideoInfoView,
    DOWNLOAD_ROUTE,
};
