//! Utility functions module
//!
//! This module contains process-level helpers used by the binary.

pub mod signals;

// Re-export main functions
pub use signals::{lifecycle_signal_task, shutdown_signal};
