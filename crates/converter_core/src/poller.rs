//! Status polling state machine.
//!
//! The poller never owns a real timer. It hands out [`TimerId`]s and emits
//! `StartTimer` / `CancelTimer` effects; the platform layer turns those into
//! actual timers and feeds ticks back as `Msg::PollTick`. Every start is
//! preceded by a cancel of the previous id, so at most one timer is live.

use std::time::Duration;

use crate::{Effect, JobId};

pub type TimerId = u64;

/// How often the active job is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// The user is looking at the session.
    Foreground,
    /// The session is hidden; poll less often.
    Background,
}

impl Cadence {
    pub fn for_visibility(visible: bool) -> Self {
        if visible {
            Cadence::Foreground
        } else {
            Cadence::Background
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub foreground_interval: Duration,
    pub background_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            foreground_interval: Duration::from_millis(500),
            background_interval: Duration::from_millis(2000),
        }
    }
}

impl PollSettings {
    pub fn interval(&self, cadence: Cadence) -> Duration {
        match cadence {
            Cadence::Foreground => self.foreground_interval,
            Cadence::Background => self.background_interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollerState {
    #[default]
    Idle,
    Polling {
        job_id: JobId,
        timer_id: TimerId,
        cadence: Cadence,
    },
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poller {
    state: PollerState,
    settings: PollSettings,
    visible: bool,
    next_timer_id: TimerId,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(PollSettings::default())
    }
}

impl Poller {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            state: PollerState::Idle,
            settings,
            visible: true,
            next_timer_id: 1,
        }
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.state, PollerState::Polling { .. })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Job currently being polled, if any.
    pub fn active_job(&self) -> Option<&JobId> {
        match &self.state {
            PollerState::Polling { job_id, .. } => Some(job_id),
            _ => None,
        }
    }

    /// Idle/terminal -> Polling. Any running timer is cancelled first.
    pub fn start(&mut self, job_id: JobId) -> Vec<Effect> {
        let mut effects = self.cancel_timer();
        let cadence = Cadence::for_visibility(self.visible);
        let timer_id = self.allocate_timer();
        effects.push(Effect::StartTimer {
            timer_id,
            interval: self.settings.interval(cadence),
        });
        self.state = PollerState::Polling {
            job_id,
            timer_id,
            cadence,
        };
        effects
    }

    /// Returns the job to query if `timer_id` is the live timer.
    pub fn accept_tick(&self, timer_id: TimerId) -> Option<&JobId> {
        match &self.state {
            PollerState::Polling {
                job_id,
                timer_id: live,
                ..
            } if *live == timer_id => Some(job_id),
            _ => None,
        }
    }

    /// Polling -> Completed.
    pub fn complete(&mut self) -> Vec<Effect> {
        let effects = self.cancel_timer();
        self.state = PollerState::Completed;
        effects
    }

    /// Polling -> Error.
    pub fn fail(&mut self) -> Vec<Effect> {
        let effects = self.cancel_timer();
        self.state = PollerState::Error;
        effects
    }

    /// Any state -> Idle, dropping the job.
    pub fn cancel(&mut self) -> Vec<Effect> {
        let effects = self.cancel_timer();
        self.state = PollerState::Idle;
        effects
    }

    /// Records the new visibility and, while polling, swaps the timer for one
    /// at the matching cadence. The logical state does not change.
    pub fn set_visible(&mut self, visible: bool) -> Vec<Effect> {
        self.visible = visible;
        let cadence = Cadence::for_visibility(visible);
        let (job_id, current) = match &self.state {
            PollerState::Polling {
                job_id, cadence, ..
            } => (job_id.clone(), *cadence),
            _ => return Vec::new(),
        };
        if current == cadence {
            return Vec::new();
        }

        let mut effects = self.cancel_timer();
        let timer_id = self.allocate_timer();
        effects.push(Effect::StartTimer {
            timer_id,
            interval: self.settings.interval(cadence),
        });
        self.state = PollerState::Polling {
            job_id,
            timer_id,
            cadence,
        };
        effects
    }

    fn cancel_timer(&mut self) -> Vec<Effect> {
        match &self.state {
            PollerState::Polling { timer_id, .. } => vec![Effect::CancelTimer {
                timer_id: *timer_id,
            }],
            _ => Vec::new(),
        }
    }

    fn allocate_timer(&mut self) -> TimerId {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        id
    }
}
