//! Ring Timer - a countdown timer with an animated progress ring
//!
//! This is the main entry point: it hosts one timer behind an HTTP control
//! surface and drives it with background tasks.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use ring_timer::{
    config::Config,
    state::{AppState, SystemClock},
    api::create_router,
    tasks::{lifecycle_reconcile_task, timer_tick_task},
    utils::{lifecycle_signal_task, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("ring_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting ring-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s, tick={}ms",
          config.host, config.port, config.duration, config.tick_ms);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.duration,
        config.ring_geometry(),
        Arc::new(SystemClock),
    ));

    // Drive the countdown while it runs
    let tick_state = Arc::clone(&state);
    let tick_interval = config.tick_interval();
    tokio::spawn(async move {
        timer_tick_task(tick_state, tick_interval).await;
    });

    // Resync on foreground transitions
    let lifecycle_state = Arc::clone(&state);
    tokio::spawn(async move {
        lifecycle_reconcile_task(lifecycle_state).await;
    });

    let bus = state.lifecycle.clone();
    tokio::spawn(async move {
        if let Err(e) = lifecycle_signal_task(bus).await {
            warn!("SIGCONT listener unavailable: {}", e);
        }
    });

    // Report completions the way the host screen would prompt the user
    let mut completions = state.subscribe_completions();
    tokio::spawn(async move {
        while let Ok(event) = completions.recv().await {
            info!("Time's up! {}s countdown finished at {}",
                  event.total_duration_seconds, event.completed_at);
        }
    });

    if config.autostart {
        if let Err(e) = state.start_timer() {
            tracing::error!("Failed to autostart timer: {}", e);
        }
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer                - Timer status");
    info!("  POST /timer/start          - Start or resume");
    info!("  POST /timer/pause          - Pause");
    info!("  POST /timer/restart        - Restart from full duration");
    info!("  GET  /timer/ring.svg       - Progress ring");
    info!("  POST /lifecycle/:event     - foreground | background");
    info!("  GET  /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
