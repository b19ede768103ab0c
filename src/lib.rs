//! Ring Timer - a deadline-based countdown timer with an animated progress ring
//!
//! The timer derives its remaining time from an absolute deadline, so delayed
//! or skipped ticks (for example while the app is in the background) never
//! cause drift, and completion fires exactly once per countdown.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerEngine, TimerSnapshot, TimerStatus};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
