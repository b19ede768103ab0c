//! Tick driver background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::{AppState, TickOutcome, TimerSnapshot};

/// Background task that ticks the timer while it is running.
///
/// Each run of the countdown gets its own tick schedule tagged with the
/// generation it started under. The schedule ends as soon as a newer
/// generation is published, so a superseded schedule never touches the timer.
pub async fn timer_tick_task(state: Arc<AppState>, tick_interval: Duration) {
    info!("Starting timer tick task ({}ms interval)", tick_interval.as_millis());

    let mut snapshot_rx = state.subscribe_snapshots();

    loop {
        let current = snapshot_rx.borrow_and_update().clone();

        if current.is_running() {
            if !run_schedule(&state, &mut snapshot_rx, current.generation, tick_interval).await {
                break;
            }
            continue;
        }

        // Wait for a state change notification
        if snapshot_rx.changed().await.is_err() {
            break;
        }
    }

    info!("Timer tick task stopped");
}

/// Tick until the countdown under `generation` ends. Returns false when the
/// task should stop: the snapshot channel closed or the timer is unreachable.
async fn run_schedule(
    state: &AppState,
    snapshot_rx: &mut watch::Receiver<TimerSnapshot>,
    generation: u64,
    tick_interval: Duration,
) -> bool {
    debug!("Tick schedule for generation {} started", generation);

    let mut ticker = interval(tick_interval);
    // Late ticks are harmless; the deadline decides, not the tick count
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match state.tick_timer(generation) {
                    Ok(TickOutcome::Updated(remaining)) => {
                        debug!("{}s remaining", remaining);
                    }
                    Ok(TickOutcome::Unchanged) => {}
                    Ok(TickOutcome::Completed) => {
                        info!("Countdown generation {} completed", generation);
                        return true;
                    }
                    Ok(TickOutcome::Stale) => {
                        debug!("Tick schedule for generation {} superseded", generation);
                        return true;
                    }
                    Err(e) => {
                        error!("Failed to tick timer, stopping tick task: {}", e);
                        return false;
                    }
                }
            }

            changed = snapshot_rx.changed() => {
                if changed.is_err() {
                    return false;
                }
                let latest = snapshot_rx.borrow().generation;
                if latest != generation {
                    debug!("Cancelling tick schedule {} for generation {}", generation, latest);
                    return true;
                }
            }
        }
    }
}
