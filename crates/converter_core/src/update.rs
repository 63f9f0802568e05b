use crate::{
    is_valid_url, AppState, ConversionJob, Effect, ErrorKind, HistoryEntry, JobId, JobStatus, Msg,
    Notification, NotificationKind, Phase, RequestId, StatusReport,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ConvertClicked => submit(&mut state),
        Msg::ClearClicked => {
            let mut effects = discard_job(&mut state);
            state.set_phase(Phase::Idle);
            state.set_status_panel_visible(false);
            state.set_input(String::new());
            state.mark_dirty();
            effects.push(Effect::FocusInput);
            effects
        }
        Msg::ConversionStarted { request_id, result } => {
            conversion_started(&mut state, request_id, result)
        }
        Msg::PollTick { timer_id } => match state.poller().accept_tick(timer_id) {
            Some(job_id) => vec![Effect::CheckStatus {
                job_id: job_id.clone(),
            }],
            // A tick from a timer the poller no longer owns.
            None => vec![Effect::CancelTimer { timer_id }],
        },
        Msg::StatusReceived {
            job_id,
            result,
            received_at_millis,
        } => status_received(&mut state, job_id, result, received_at_millis),
        Msg::VisibilityChanged { visible } => state.poller_mut().set_visible(visible),
        Msg::RestoreHistory(entries) => {
            state.set_history(crate::History::from_entries(entries));
            state.mark_dirty();
            Vec::new()
        }
        Msg::ClearHistoryClicked => {
            state.history_mut().clear();
            state.mark_dirty();
            vec![
                Effect::PersistHistory {
                    entries: Vec::new(),
                },
                notify(NotificationKind::Info, "History cleared"),
            ]
        }
        Msg::RestoreTheme { saved, system } => {
            state.set_theme(saved, system);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ToggleThemeClicked => {
            let theme = state.theme().toggled();
            state.set_theme_preference(theme);
            state.mark_dirty();
            vec![Effect::PersistTheme { theme }]
        }
        Msg::DownloadClicked { history_index } => request_download(&mut state, history_index),
        Msg::DownloadFinished { filename, result } => {
            if state.pending_download() == Some(filename.as_str()) {
                state.set_pending_download(None);
            }
            state.mark_dirty();
            match result {
                Ok(path) => vec![notify(NotificationKind::Success, format!("Saved {path}"))],
                Err(message) => vec![notify(
                    NotificationKind::Error,
                    format!("Download of {filename} failed: {message}"),
                )],
            }
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if state.is_busy() {
        return Vec::new();
    }

    let url = state.input().trim().to_string();
    if url.is_empty() {
        return vec![
            notify(NotificationKind::Warning, "Please paste a YouTube link"),
            Effect::FocusInput,
        ];
    }
    if !is_valid_url(&url) {
        return vec![
            notify(NotificationKind::Error, "Invalid YouTube link"),
            Effect::FocusInput,
        ];
    }

    let mut effects = discard_job(state);
    let request_id = state.allocate_request_id();
    state.set_phase(Phase::Starting { request_id });
    state.set_status_panel_visible(true);
    state.mark_dirty();
    effects.push(Effect::StartConversion { request_id, url });
    effects
}

fn conversion_started(
    state: &mut AppState,
    request_id: RequestId,
    result: Result<JobId, String>,
) -> Vec<Effect> {
    if *state.phase() != (Phase::Starting { request_id }) {
        // The user cleared or restarted meanwhile; drop the answer and let the
        // server forget a job nobody will poll.
        return match result {
            Ok(job_id) => vec![Effect::ReleaseJob { job_id }],
            Err(_) => Vec::new(),
        };
    }

    state.mark_dirty();
    match result {
        Ok(job_id) => {
            state.set_job(ConversionJob::new(job_id.clone()));
            state.set_phase(Phase::Converting);
            state.poller_mut().start(job_id)
        }
        Err(message) => {
            let message = non_empty_or(message, "Failed to start conversion");
            state.set_phase(Phase::Failed {
                kind: ErrorKind::JobStart,
                message: message.clone(),
            });
            vec![notify(NotificationKind::Error, message)]
        }
    }
}

fn status_received(
    state: &mut AppState,
    job_id: JobId,
    result: Result<StatusReport, String>,
    received_at_millis: u64,
) -> Vec<Effect> {
    let is_active = state.poller().active_job() == Some(&job_id)
        && state.job().map(|job| &job.id) == Some(&job_id);
    if !is_active {
        return Vec::new();
    }
    // Transient miss: keep polling, keep the display as it is.
    let Ok(report) = result else {
        return Vec::new();
    };

    let Some(job) = state.job_mut() else {
        return Vec::new();
    };
    job.apply_report(&report);
    let job = job.clone();
    state.mark_dirty();

    if !job.status.is_terminal() {
        return Vec::new();
    }
    match job.status {
        JobStatus::Completed => {
            let mut effects = state.poller_mut().complete();
            state.set_phase(Phase::Completed);
            if let Some(result) = job.result.as_ref() {
                let entry = HistoryEntry {
                    filename: result.filename.clone(),
                    title: job.display_title().unwrap_or_default(),
                    filesize_formatted: result.size_formatted.clone(),
                    timestamp_millis: received_at_millis,
                };
                let entries = state.history_mut().add(entry).to_vec();
                effects.push(Effect::PersistHistory { entries });
            }
            effects.push(notify(NotificationKind::Success, "Conversion completed!"));
            effects
        }
        _ => {
            let mut effects = state.poller_mut().fail();
            state.set_phase(Phase::Failed {
                kind: ErrorKind::Conversion,
                message: job.error_message.unwrap_or_default(),
            });
            effects.push(notify(NotificationKind::Error, "Conversion failed"));
            effects
        }
    }
}

fn request_download(state: &mut AppState, history_index: Option<usize>) -> Vec<Effect> {
    let filename = match history_index {
        Some(index) => state.history().get(index).map(|entry| entry.filename.clone()),
        None if *state.phase() == Phase::Completed => state
            .job()
            .and_then(|job| job.result.as_ref())
            .map(|result| result.filename.clone()),
        None => None,
    };

    let Some(filename) = filename.filter(|name| !name.is_empty()) else {
        return vec![notify(NotificationKind::Warning, "Nothing to download")];
    };
    if state.pending_download().is_some() {
        return vec![notify(
            NotificationKind::Info,
            "A download is already in progress",
        )];
    }

    state.set_pending_download(Some(filename.clone()));
    state.mark_dirty();
    vec![
        notify(NotificationKind::Info, format!("Downloading {filename}...")),
        Effect::Download { filename },
    ]
}

/// Cancels polling and drops the current job, releasing it on the server.
fn discard_job(state: &mut AppState) -> Vec<Effect> {
    let mut effects = state.poller_mut().cancel();
    if let Some(job) = state.take_job() {
        effects.push(Effect::ReleaseJob { job_id: job.id });
    }
    effects
}

fn notify(kind: NotificationKind, message: impl Into<String>) -> Effect {
    Effect::Notify(Notification::new(kind, message))
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
