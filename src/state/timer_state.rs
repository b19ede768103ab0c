//! Timer status and snapshot structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a countdown is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Ready,
    Running,
    Paused,
    Finished,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of a timer, published to renderers and the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub total_duration_seconds: u64,
    pub remaining_seconds: u64,
    pub progress_fraction: f64,
    pub deadline: Option<DateTime<Utc>>,
    pub generation: u64,
}

impl TimerSnapshot {
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }
}

/// Notification that a countdown reached zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Generation of the countdown that completed
    pub generation: u64,
    pub total_duration_seconds: u64,
    pub completed_at: DateTime<Utc>,
}

/// Result of feeding one tick into the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick belonged to a superseded schedule, or the timer is not running
    Stale,
    /// Displayed seconds did not change
    Unchanged,
    /// Displayed seconds changed to the contained value
    Updated(u64),
    /// Countdown reached zero on this tick
    Completed,
}
