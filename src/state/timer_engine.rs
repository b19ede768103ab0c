//! Deadline-based countdown engine
//!
//! Remaining time is always derived from an absolute deadline and the current
//! clock reading, never by decrementing a counter. Every operation that sets up
//! or tears down a countdown bumps the generation, so ticks scheduled under an
//! older countdown are ignored.

use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::services::lifecycle::LifecycleEvent;
use super::{
    animation::ProgressAnimation,
    clock::{seconds_until, Clock},
    timer_state::{CompletionEvent, TickOutcome, TimerSnapshot, TimerStatus},
};

/// Longest countdown accepted, one hundred years
pub const MAX_DURATION_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Invoked once for every countdown that reaches zero
pub type CompletionCallback = Box<dyn FnMut(&CompletionEvent) + Send>;

pub struct TimerEngine {
    clock: Arc<dyn Clock>,
    total_duration_seconds: u64,
    remaining_seconds: u64,
    status: TimerStatus,
    deadline: Option<DateTime<Utc>>,
    generation: u64,
    animation: ProgressAnimation,
    on_complete: CompletionCallback,
    backgrounded_at: Option<DateTime<Utc>>,
    completions: u64,
}

impl TimerEngine {
    /// Create a timer in `Ready` with the full duration remaining
    pub fn new(
        total_duration_seconds: u64,
        clock: Arc<dyn Clock>,
        on_complete: impl FnMut(&CompletionEvent) + Send + 'static,
    ) -> Self {
        let total = match total_duration_seconds {
            0 => {
                warn!("Timer duration must be positive, using 1 second");
                1
            }
            secs if secs > MAX_DURATION_SECS => {
                warn!("Timer duration {}s too long, using {}s", secs, MAX_DURATION_SECS);
                MAX_DURATION_SECS
            }
            secs => secs,
        };

        Self {
            clock,
            total_duration_seconds: total,
            remaining_seconds: total,
            status: TimerStatus::Ready,
            deadline: None,
            generation: 0,
            animation: ProgressAnimation::frozen(1.0),
            on_complete: Box::new(on_complete),
            backgrounded_at: None,
            completions: 0,
        }
    }

    /// Begin or resume counting down. Returns whether the call had an effect.
    ///
    /// Only valid from `Ready` or `Paused` with time left; a finished timer
    /// stays finished until `restart`.
    pub fn start(&mut self) -> bool {
        match self.status {
            TimerStatus::Ready | TimerStatus::Paused if self.remaining_seconds > 0 => {
                let now = self.clock.now();
                self.begin_countdown(now);
                info!(
                    "Timer started with {}s remaining (generation {})",
                    self.remaining_seconds, self.generation
                );
                true
            }
            status => {
                debug!("start() ignored in {} state", status);
                false
            }
        }
    }

    /// Freeze the countdown at its current remaining time.
    /// If the deadline has already passed, the countdown completes instead.
    pub fn pause(&mut self) -> bool {
        let Some(deadline) = self.deadline.filter(|_| self.status == TimerStatus::Running) else {
            debug!("pause() ignored in {} state", self.status);
            return false;
        };

        let now = self.clock.now();
        let remaining = seconds_until(deadline, now);
        if remaining == 0 {
            // The deadline passed before anyone noticed
            self.complete(now);
            return true;
        }

        self.remaining_seconds = remaining;
        self.deadline = None;
        self.status = TimerStatus::Paused;
        self.generation += 1;
        self.animation = ProgressAnimation::frozen(self.progress_fraction());
        info!("Timer paused with {}s remaining", remaining);
        true
    }

    /// Reset to the full duration and start counting down, from any state
    pub fn restart(&mut self) {
        let now = self.clock.now();
        self.remaining_seconds = self.total_duration_seconds;
        self.begin_countdown(now);
        info!(
            "Timer restarted for {}s (generation {})",
            self.total_duration_seconds, self.generation
        );
    }

    /// Periodic tick from a schedule created under `generation`
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation || self.status != TimerStatus::Running {
            return TickOutcome::Stale;
        }
        self.reconcile()
    }

    /// Apply an application lifecycle transition
    pub fn on_lifecycle(&mut self, event: LifecycleEvent) -> TickOutcome {
        match event {
            LifecycleEvent::Background => {
                self.backgrounded_at = Some(self.clock.now());
                debug!("Entered background in {} state", self.status);
                TickOutcome::Unchanged
            }
            LifecycleEvent::Foreground => {
                if let Some(since) = self.backgrounded_at.take() {
                    let away = self.clock.now() - since;
                    debug!("Returned to foreground after {}ms", away.num_milliseconds());
                }
                if self.status != TimerStatus::Running {
                    return TickOutcome::Stale;
                }
                let outcome = self.reconcile();
                if outcome == TickOutcome::Completed {
                    info!("Countdown expired while in background");
                }
                outcome
            }
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.total_duration_seconds
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of countdowns that have completed on this timer
    pub fn completions(&self) -> u64 {
        self.completions
    }

    /// Fraction of the countdown left, as shown by the digits
    pub fn progress_fraction(&self) -> f64 {
        self.remaining_seconds as f64 / self.total_duration_seconds as f64
    }

    /// Continuous progress for the frame being drawn now
    pub fn animated_progress(&self) -> f64 {
        self.animation.sample(self.clock.now())
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.status,
            total_duration_seconds: self.total_duration_seconds,
            remaining_seconds: self.remaining_seconds,
            progress_fraction: self.progress_fraction(),
            deadline: self.deadline,
            generation: self.generation,
        }
    }

    fn begin_countdown(&mut self, now: DateTime<Utc>) {
        let deadline = i64::try_from(self.remaining_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.deadline = Some(deadline);
        self.status = TimerStatus::Running;
        self.generation += 1;
        self.animation = ProgressAnimation::countdown(
            self.progress_fraction(),
            now,
            self.remaining_seconds,
        );
    }

    /// Recompute remaining time from the deadline while running
    fn reconcile(&mut self) -> TickOutcome {
        let Some(deadline) = self.deadline else {
            return TickOutcome::Stale;
        };

        let now = self.clock.now();
        let remaining = seconds_until(deadline, now);
        if remaining == 0 {
            self.complete(now);
            return TickOutcome::Completed;
        }
        if remaining != self.remaining_seconds {
            self.remaining_seconds = remaining;
            return TickOutcome::Updated(remaining);
        }
        TickOutcome::Unchanged
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        if self.status != TimerStatus::Running {
            return;
        }

        let event = CompletionEvent {
            generation: self.generation,
            total_duration_seconds: self.total_duration_seconds,
            completed_at: now,
        };

        self.remaining_seconds = 0;
        self.deadline = None;
        self.status = TimerStatus::Finished;
        self.generation += 1;
        self.animation = ProgressAnimation::frozen(0.0);
        self.completions += 1;

        info!("Timer finished after {}s", self.total_duration_seconds);
        (self.on_complete)(&event);
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("total_duration_seconds", &self.total_duration_seconds)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("status", &self.status)
            .field("deadline", &self.deadline)
            .field("generation", &self.generation)
            .field("animation", &self.animation)
            .field("completions", &self.completions)
            .finish_non_exhaustive()
    }
}
