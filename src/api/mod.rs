//! HTTP API module
//!
//! The host screen: control buttons, status view, and ring view as endpoints.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer", get(status_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/restart", post(restart_handler))
        .route("/timer/ring.svg", get(ring_handler))
        .route("/lifecycle/:event", post(lifecycle_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{
        services::ring::RingGeometry,
        state::{ManualClock, TimerStatus},
        tasks::lifecycle_reconcile_task,
    };
    use super::responses::{ApiResponse, StatusResponse};

    fn test_state(duration: u64) -> (Arc<AppState>, ManualClock) {
        let clock = ManualClock::default();
        let state = AppState::new(
            20554,
            "127.0.0.1".to_string(),
            duration,
            RingGeometry::default(),
            Arc::new(clock.clone()),
        );
        (Arc::new(state), clock)
    }

    async fn call(state: &Arc<AppState>, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = create_router(Arc::clone(state)).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn start_pause_restart_flow() {
        let (state, clock) = test_state(10);

        let (status, body) = call(&state, "POST", "/timer/start").await;
        assert_eq!(status, StatusCode::OK);
        let response: ApiResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.timer.status, TimerStatus::Running);
        assert_eq!(response.status, "running");

        clock.advance_secs(3);
        let (_, body) = call(&state, "POST", "/timer/pause").await;
        let response: ApiResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.timer.status, TimerStatus::Paused);
        assert_eq!(response.timer.remaining_seconds, 7);

        let (_, body) = call(&state, "POST", "/timer/restart").await;
        let response: ApiResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.timer.remaining_seconds, 10);
        assert_eq!(response.timer.progress_fraction, 1.0);
    }

    #[tokio::test]
    async fn status_reports_frame_and_text() {
        let (state, _) = test_state(30);
        let (status, body) = call(&state, "GET", "/timer").await;
        assert_eq!(status, StatusCode::OK);
        let response: StatusResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.timer.status, TimerStatus::Ready);
        assert_eq!(response.animated_progress, 1.0);
        assert_eq!(response.status_text, "Ready");
        assert_eq!(response.completions, 0);
    }

    #[tokio::test]
    async fn ring_is_svg() {
        let (state, _) = test_state(30);
        let (status, body) = call(&state, "GET", "/timer/ring.svg").await;
        assert_eq!(status, StatusCode::OK);
        let svg = String::from_utf8(body).unwrap();
        assert!(svg.contains(">30</text>"));
    }

    #[tokio::test]
    async fn background_then_foreground_completes() {
        let (state, clock) = test_state(5);
        call(&state, "POST", "/timer/start").await;
        call(&state, "POST", "/lifecycle/background").await;
        clock.advance_secs(10);

        let (status, body) = call(&state, "POST", "/lifecycle/foreground").await;
        assert_eq!(status, StatusCode::OK);
        let response: ApiResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.timer.status, TimerStatus::Finished);
        assert_eq!(state.completions().unwrap(), 1);
    }

    #[tokio::test]
    async fn foreground_response_is_reconciled_with_listener_running() {
        let (state, clock) = test_state(5);
        let listener = Arc::clone(&state);
        tokio::spawn(async move { lifecycle_reconcile_task(listener).await });
        while state.lifecycle.subscriber_count() == 0 {
            tokio::task::yield_now().await;
        }

        call(&state, "POST", "/timer/start").await;
        clock.advance_secs(10);

        let (status, body) = call(&state, "POST", "/lifecycle/foreground").await;
        assert_eq!(status, StatusCode::OK);
        let response: ApiResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.status, "finished");
        assert_eq!(response.timer.status, TimerStatus::Finished);
        assert_eq!(response.timer.remaining_seconds, 0);

        tokio::task::yield_now().await;
        assert_eq!(state.completions().unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_lifecycle_event_is_rejected() {
        let (state, _) = test_state(5);
        let (status, _) = call(&state, "POST", "/lifecycle/hibernate").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (state, _) = test_state(5);
        let (status, _) = call(&state, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
