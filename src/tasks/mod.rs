//! Background tasks module
//!
//! This module contains the tasks that drive the timer alongside the HTTP server.

pub mod lifecycle_reconcile;
pub mod timer_tick;

// Re-export main functions
pub use lifecycle_reconcile::lifecycle_reconcile_task;
pub use timer_tick::timer_tick_task;
