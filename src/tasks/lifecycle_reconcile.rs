//! Foreground reconciliation background task

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::state::{AppState, TickOutcome};

/// Background task that forwards lifecycle transitions to the timer.
///
/// Ticks may not run at all while the app is in the background, so entering
/// the foreground resyncs the countdown against its deadline right away.
pub async fn lifecycle_reconcile_task(state: Arc<AppState>) {
    info!("Starting lifecycle reconcile task");

    let mut events = state.lifecycle.subscribe();

    while let Some(event) = events.recv().await {
        match state.apply_lifecycle(event) {
            Ok(TickOutcome::Completed) => {
                info!("Countdown finished while in background");
            }
            Ok(outcome) => {
                debug!("Lifecycle {} applied: {:?}", event.as_str(), outcome);
            }
            Err(e) => {
                warn!("Failed to apply lifecycle event {}: {}", event.as_str(), e);
            }
        }
    }

    info!("Lifecycle reconcile task stopped");
}
