//! Unix signal handling: graceful shutdown and process resume

use futures::stream::StreamExt;
use signal_hook::consts::{SIGCONT, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{info, warn};

use crate::services::lifecycle::{LifecycleBus, LifecycleEvent};

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to register shutdown signals: {}, falling back to Ctrl+C", e);
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
            }
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Publish `Foreground` every time the process is continued after a stop
/// (SIGCONT, e.g. `fg` after Ctrl+Z). Runs until the signal stream ends.
pub async fn lifecycle_signal_task(bus: LifecycleBus) -> std::io::Result<()> {
    let mut signals = Signals::new([SIGCONT])?;
    info!("Listening for SIGCONT as foreground transition");

    while let Some(signal) = signals.next().await {
        if signal == SIGCONT {
            info!("Process resumed, entering foreground");
            bus.publish(LifecycleEvent::Foreground);
        }
    }

    Ok(())
}
