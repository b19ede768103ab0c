//! Timer collaborators module
//!
//! This module contains the pieces the timer talks to but does not own: the
//! application lifecycle source and the ring renderer.

pub mod lifecycle;
pub mod ring;

// Re-export main types
pub use lifecycle::{LifecycleBus, LifecycleEvent, LifecycleSubscription};
pub use ring::{RingFrame, RingGeometry, RingRenderer, SvgRingRenderer};
