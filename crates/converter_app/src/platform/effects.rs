use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use converter_core::{
    Effect, ErrorKind, JobId, JobStatus, Msg, Notification, StatusReport, VideoInfo,
};
use converter_engine::{
    ApiError, EngineEvent, EngineEvents, EngineHandle, FailureKind, StatusResponse,
};
use converter_logging::{conv_debug, conv_info, conv_warn};

use super::app::AppEvent;
use super::persistence;
use super::timers::TimerService;

/// Effects that only the terminal can carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UiEffect {
    Notify(Notification),
    FocusInput,
}

pub(crate) struct EffectRunner {
    engine: EngineHandle,
    timers: TimerService,
    data_dir: PathBuf,
}

impl EffectRunner {
    pub(crate) fn new(engine: EngineHandle, timers: TimerService, data_dir: PathBuf) -> Self {
        Self {
            engine,
            timers,
            data_dir,
        }
    }

    pub(crate) fn run(&mut self, effects: Vec<Effect>) -> Vec<UiEffect> {
        let mut ui = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartConversion { request_id, url } => {
                    conv_info!("StartConversion request_id={} url={}", request_id, url);
                    self.engine.start_conversion(request_id, url);
                }
                Effect::CheckStatus { job_id } => {
                    conv_debug!("CheckStatus job_id={}", job_id);
                    self.engine.check_status(job_id.as_str());
                }
                Effect::StartTimer { timer_id, interval } => self.timers.start(timer_id, interval),
                Effect::CancelTimer { timer_id } => self.timers.cancel(timer_id),
                Effect::ReleaseJob { job_id } => {
                    conv_info!("ReleaseJob job_id={}", job_id);
                    self.engine.release(job_id.as_str());
                }
                Effect::PersistHistory { entries } => {
                    persistence::save_history(&self.data_dir, &entries)
                }
                Effect::PersistTheme { theme } => persistence::save_theme(&self.data_dir, theme),
                Effect::Download { filename } => {
                    conv_info!("Download filename={}", filename);
                    self.engine.download(filename);
                }
                Effect::Notify(notification) => ui.push(UiEffect::Notify(notification)),
                Effect::FocusInput => ui.push(UiEffect::FocusInput),
            }
        }
        ui
    }
}

/// Forwards engine results into the event loop until either side hangs up.
pub(crate) fn spawn_event_forwarder(events: EngineEvents, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            let Some(app_event) = map_event(event) else {
                continue;
            };
            if tx.send(app_event).is_err() {
                break;
            }
        }
        conv_debug!("Engine event forwarder stopped");
    });
}

fn map_event(event: EngineEvent) -> Option<AppEvent> {
    let msg = match event {
        EngineEvent::ConversionStarted { request_id, result } => Msg::ConversionStarted {
            request_id,
            result: result.map(JobId::new).map_err(|err| {
                conv_warn!("Starting conversion failed: {}", err);
                start_failure_message(&err)
            }),
        },
        EngineEvent::StatusChecked { job_id, result } => Msg::StatusReceived {
            job_id: JobId::new(job_id.clone()),
            result: result.map(map_status).map_err(|err| {
                conv_warn!("{} for job {}: {}", ErrorKind::TransientPoll, job_id, err);
                err.to_string()
            }),
            received_at_millis: now_millis(),
        },
        EngineEvent::Released { job_id, result } => {
            match result {
                Ok(()) => conv_debug!("Released job {}", job_id),
                Err(err) => conv_warn!("Releasing job {} failed: {}", job_id, err),
            }
            return None;
        }
        EngineEvent::DownloadProgress {
            filename,
            bytes,
            total,
        } => {
            return Some(AppEvent::DownloadProgress {
                filename,
                bytes,
                total,
            })
        }
        EngineEvent::DownloadFinished { filename, result } => Msg::DownloadFinished {
            filename,
            result: result
                .map(|path| std::path::absolute(&path).unwrap_or(path).display().to_string())
                .map_err(|err| err.to_string()),
        },
    };
    Some(AppEvent::Msg(msg))
}

/// The server's own message when it sent one; an empty string lets the core
/// fall back to its generic text.
fn start_failure_message(err: &ApiError) -> String {
    if let Some(message) = err.server_message() {
        return message.to_string();
    }
    match err.kind {
        FailureKind::HttpStatus(_) | FailureKind::Decode => String::new(),
        _ => err.to_string(),
    }
}

pub(crate) fn map_status(response: StatusResponse) -> StatusReport {
    StatusReport {
        status: JobStatus::from_wire(&response.status),
        progress: response.progress_percent(),
        status_text: response.status_text,
        info: response.info.map(|info| VideoInfo {
            title: info.title,
            channel: info.channel,
            thumbnail: info.thumbnail,
            duration_formatted: info.duration_formatted,
        }),
        filename: response.filename,
        filesize_formatted: response.filesize_formatted,
        error: response.error,
    }
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}
