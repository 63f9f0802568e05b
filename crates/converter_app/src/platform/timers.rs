use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use converter_core::{Msg, TimerId};
use converter_logging::conv_debug;

use super::app::AppEvent;

/// Repeating timers that deliver `Msg::PollTick` into the event loop.
pub(crate) struct TimerService {
    tx: mpsc::Sender<AppEvent>,
    timers: HashMap<TimerId, Arc<AtomicBool>>,
}

impl TimerService {
    pub(crate) fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            tx,
            timers: HashMap::new(),
        }
    }

    pub(crate) fn start(&mut self, timer_id: TimerId, interval: Duration) {
        // Restarting an id replaces its thread.
        self.cancel(timer_id);

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let tx = self.tx.clone();
        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::Acquire) {
                break;
            }
            if tx.send(AppEvent::Msg(Msg::PollTick { timer_id })).is_err() {
                break;
            }
        });

        conv_debug!("Timer {} started every {:?}", timer_id, interval);
        self.timers.insert(timer_id, cancelled);
    }

    pub(crate) fn cancel(&mut self, timer_id: TimerId) {
        if let Some(flag) = self.timers.remove(&timer_id) {
            flag.store(true, Ordering::Release);
            conv_debug!("Timer {} cancelled", timer_id);
        }
    }

    #[cfg(test)]
    pub(crate) fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        for flag in self.timers.values() {
            flag.store(true, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(rx: &mpsc::Receiver<AppEvent>) -> Vec<TimerId> {
        rx.try_iter()
            .filter_map(|event| match event {
                AppEvent::Msg(Msg::PollTick { timer_id }) => Some(timer_id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn started_timer_ticks_until_cancelled() {
        let (tx, rx) = mpsc::channel();
        let mut timers = TimerService::new(tx);

        timers.start(1, Duration::from_millis(5));
        assert_eq!(timers.active_count(), 1);
        thread::sleep(Duration::from_millis(40));
        timers.cancel(1);
        assert_eq!(timers.active_count(), 0);

        let seen = ticks(&rx);
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|id| *id == 1));

        // Allow an in-flight tick to land, then expect silence.
        thread::sleep(Duration::from_millis(20));
        let _ = ticks(&rx);
        thread::sleep(Duration::from_millis(30));
        assert!(ticks(&rx).is_empty());
    }

    #[test]
    fn cancelling_unknown_timer_is_harmless() {
        let (tx, _rx) = mpsc::channel();
        let mut timers = TimerService::new(tx);
        timers.cancel(99);
        assert_eq!(timers.active_count(), 0);
    }
}
