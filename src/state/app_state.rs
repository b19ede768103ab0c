//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::services::{
    lifecycle::{LifecycleBus, LifecycleEvent},
    ring::{RingFrame, RingGeometry},
};
use super::{
    clock::Clock,
    timer_engine::TimerEngine,
    timer_state::{CompletionEvent, TickOutcome, TimerSnapshot, TimerStatus},
};

const STATUS_READY: &str = "Ready";
const STATUS_RUNNING: &str = "Running";
const STATUS_PAUSED: &str = "Paused";
const STATUS_DONE: &str = "Time's up!";

/// Host-side state: one timer engine plus the channels that feed the
/// renderer and anyone waiting for completion
#[derive(Debug)]
pub struct AppState {
    /// The countdown engine; all mutation goes through this lock
    pub timer: Arc<Mutex<TimerEngine>>,
    pub ring_geometry: RingGeometry,
    /// Status line shown by the host screen
    pub status_text: Arc<Mutex<String>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest timer snapshot for renderers and the tick driver
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
    /// One message per finished countdown
    pub completion_tx: broadcast::Sender<CompletionEvent>,
    pub lifecycle: LifecycleBus,
}

impl AppState {
    /// Create a new AppState hosting a `Ready` timer of `duration_seconds`
    pub fn new(
        port: u16,
        host: String,
        duration_seconds: u64,
        ring_geometry: RingGeometry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (completion_tx, _) = broadcast::channel(16);
        let status_text = Arc::new(Mutex::new(STATUS_READY.to_string()));

        let on_complete = {
            let completion_tx = completion_tx.clone();
            let status_text = Arc::clone(&status_text);
            move |event: &CompletionEvent| {
                if let Ok(mut text) = status_text.lock() {
                    *text = STATUS_DONE.to_string();
                }
                // Nobody listening is fine; the status text still updates
                let _ = completion_tx.send(event.clone());
            }
        };

        let engine = TimerEngine::new(duration_seconds, clock, on_complete);
        let (timer_update_tx, timer_update_rx) = watch::channel(engine.snapshot());

        Self {
            timer: Arc::new(Mutex::new(engine)),
            ring_geometry,
            status_text,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
            completion_tx,
            lifecycle: LifecycleBus::new(),
        }
    }

    /// Apply an operation to the engine and publish the resulting snapshot
    pub fn update_timer<F, R>(&self, action: Option<&str>, op: F) -> Result<(R, TimerSnapshot), String>
    where
        F: FnOnce(&mut TimerEngine) -> R,
    {
        let mut engine = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        let result = op(&mut *engine);
        let snapshot = engine.snapshot();
        drop(engine); // Release the lock early

        if let Some(action) = action {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        self.set_status_text(snapshot.status);

        // send_if_modified keeps watchers quiet when nothing moved
        self.timer_update_tx.send_if_modified(|current| {
            if *current != snapshot {
                *current = snapshot.clone();
                true
            } else {
                false
            }
        });

        Ok((result, snapshot))
    }

    /// Start or resume the countdown
    pub fn start_timer(&self) -> Result<TimerSnapshot, String> {
        let (started, snapshot) = self.update_timer(Some("start"), |t| t.start())?;
        if started {
            info!("Timer running, {}s left", snapshot.remaining_seconds);
        }
        Ok(snapshot)
    }

    /// Pause the countdown
    pub fn pause_timer(&self) -> Result<TimerSnapshot, String> {
        let (paused, snapshot) = self.update_timer(Some("pause"), |t| t.pause())?;
        if paused {
            info!("Timer paused, {}s left", snapshot.remaining_seconds);
        }
        Ok(snapshot)
    }

    /// Reset to the full duration and run
    pub fn restart_timer(&self) -> Result<TimerSnapshot, String> {
        let ((), snapshot) = self.update_timer(Some("restart"), |t| t.restart())?;
        Ok(snapshot)
    }

    /// Feed one tick from a schedule created under `generation`
    pub fn tick_timer(&self, generation: u64) -> Result<TickOutcome, String> {
        self.update_timer(None, |t| t.tick(generation))
            .map(|(outcome, _)| outcome)
    }

    /// Apply a lifecycle transition to the timer
    pub fn apply_lifecycle(&self, event: LifecycleEvent) -> Result<TickOutcome, String> {
        let (outcome, snapshot) = self.update_timer(Some(event.as_str()), |t| t.on_lifecycle(event))?;
        if outcome == TickOutcome::Completed {
            info!("Countdown completed on {}", event.as_str());
        } else if event == LifecycleEvent::Foreground && snapshot.is_running() {
            info!("Resynced on foreground, {}s left", snapshot.remaining_seconds);
        }
        Ok(outcome)
    }

    /// Get current timer snapshot
    pub fn get_timer_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.timer.lock()
            .map(|t| t.snapshot())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Frame to draw right now: continuous progress plus current digits
    pub fn current_frame(&self) -> Result<RingFrame, String> {
        self.timer.lock()
            .map(|t| RingFrame {
                progress: t.animated_progress(),
                remaining_seconds: t.remaining_seconds(),
            })
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    pub fn completions(&self) -> Result<u64, String> {
        self.timer.lock()
            .map(|t| t.completions())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    pub fn subscribe_completions(&self) -> broadcast::Receiver<CompletionEvent> {
        self.completion_tx.subscribe()
    }

    pub fn get_status_text(&self) -> String {
        self.status_text.lock()
            .map(|t| t.clone())
            .unwrap_or_else(|e| {
                warn!("Status text lock poisoned: {}", e);
                e.into_inner().clone()
            })
    }

    fn set_status_text(&self, status: TimerStatus) {
        let text = match status {
            TimerStatus::Ready => STATUS_READY,
            TimerStatus::Running => STATUS_RUNNING,
            TimerStatus::Paused => STATUS_PAUSED,
            TimerStatus::Finished => STATUS_DONE,
        };
        if let Ok(mut current) = self.status_text.lock() {
            if *current != text {
                *current = text.to_string();
            }
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::clock::ManualClock;

    fn app(duration: u64) -> (AppState, ManualClock) {
        let clock = ManualClock::default();
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            duration,
            RingGeometry::default(),
            Arc::new(clock.clone()),
        );
        (state, clock)
    }

    #[test]
    fn control_calls_publish_snapshots() {
        let (state, clock) = app(10);
        let rx = state.subscribe_snapshots();
        assert_eq!(rx.borrow().status, TimerStatus::Ready);

        state.start_timer().unwrap();
        assert_eq!(rx.borrow().status, TimerStatus::Running);
        assert_eq!(state.get_status_text(), "Running");

        clock.advance_secs(3);
        let snapshot = state.pause_timer().unwrap();
        assert_eq!(snapshot.remaining_seconds, 7);
        assert_eq!(rx.borrow().remaining_seconds, 7);
        assert_eq!(state.get_status_text(), "Paused");

        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("pause"));
        assert!(at.is_some());
    }

    #[test]
    fn completion_updates_status_and_notifies() {
        let (state, clock) = app(2);
        let mut completions = state.subscribe_completions();
        let snapshot = state.start_timer().unwrap();

        clock.advance_secs(2);
        let outcome = state.tick_timer(snapshot.generation).unwrap();
        assert_eq!(outcome, TickOutcome::Completed);
        assert_eq!(state.get_status_text(), "Time's up!");
        assert_eq!(completions.try_recv().unwrap().generation, snapshot.generation);
        assert!(completions.try_recv().is_err());
        assert_eq!(state.completions().unwrap(), 1);
    }

    #[test]
    fn current_frame_follows_animation() {
        let (state, clock) = app(10);
        state.start_timer().unwrap();
        clock.advance_millis(2_500);
        let frame = state.current_frame().unwrap();
        assert!((frame.progress - 0.75).abs() < 1e-9);
        // Digits only move on ticks
        assert_eq!(frame.remaining_seconds, 10);
    }

    #[test]
    fn lifecycle_completes_expired_countdown() {
        let (state, clock) = app(5);
        state.start_timer().unwrap();
        state.apply_lifecycle(LifecycleEvent::Background).unwrap();
        clock.advance_secs(60);
        let outcome = state.apply_lifecycle(LifecycleEvent::Foreground).unwrap();
        assert_eq!(outcome, TickOutcome::Completed);
        assert_eq!(state.get_timer_snapshot().unwrap().status, TimerStatus::Finished);
    }
}
