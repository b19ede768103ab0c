//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use crate::{
    services::{
        lifecycle::LifecycleEvent,
        ring::{RingRenderer, SvgRingRenderer},
    },
    state::{AppState, TimerSnapshot},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

fn control_response(
    action: &str,
    result: Result<TimerSnapshot, String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(snapshot) => {
            info!("{} endpoint called - timer {}", action, snapshot.status);
            let message = format!("Timer {}, {}s remaining", snapshot.status, snapshot.remaining_seconds);
            Ok(Json(ApiResponse::new(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("start", state.start_timer())
}

/// Handle POST /timer/pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("pause", state.pause_timer())
}

/// Handle POST /timer/restart - Reset to the full duration and run
pub async fn restart_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response("restart", state.restart_timer())
}

/// Handle GET /timer - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = state.get_timer_snapshot().map_err(|e| {
        error!("Failed to get timer snapshot: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let frame = state.current_frame().map_err(|e| {
        error!("Failed to sample ring frame: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let completions = state.completions().map_err(|e| {
        error!("Failed to read completion count: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        animated_progress: frame.progress,
        status_text: state.get_status_text(),
        completions,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /timer/ring.svg - Draw the ring for the current frame
pub async fn ring_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.current_frame() {
        Ok(frame) => {
            let svg = SvgRingRenderer::new(state.ring_geometry).draw(&frame);
            ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
        }
        Err(e) => {
            error!("Failed to sample ring frame: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle POST /lifecycle/:event - Report a foreground/background transition
pub async fn lifecycle_handler(
    State(state): State<Arc<AppState>>,
    Path(event_name): Path<String>,
) -> Response {
    let Some(event) = LifecycleEvent::from_name(&event_name) else {
        let body = ErrorResponse::new(format!("Unknown lifecycle event: {}", event_name));
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };

    // Apply here so the response reflects the reconciled timer
    let outcome = match state.apply_lifecycle(event) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Failed to apply lifecycle event: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    info!("Lifecycle endpoint called - {} ({:?})", event.as_str(), outcome);

    match state.get_timer_snapshot() {
        Ok(snapshot) => {
            Json(ApiResponse::new(format!("Entered {}", event.as_str()), snapshot)).into_response()
        }
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
