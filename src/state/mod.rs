//! State management module
//!
//! This module contains the countdown engine, its clock, and the host state
//! that publishes timer updates.

pub mod animation;
pub mod app_state;
pub mod clock;
pub mod timer_engine;
pub mod timer_state;

// Re-export main types
pub use animation::ProgressAnimation;
pub use app_state::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use timer_engine::{TimerEngine, MAX_DURATION_SECS};
pub use timer_state::{CompletionEvent, TickOutcome, TimerSnapshot, TimerStatus};
