//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::Json,
};
use tracing::{info, warn};

use crate::{
    clock::Clock,
    error::TimerError,
    state::{AppState, CustomDuration, MainTimerState, PushCycleState},
    store::TimerStore,
};
use super::responses::{ApiError, CommandResponse, HealthResponse, MessageResponse, StatusResponse};

/// Header carrying the admin secret
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

type ApiResult<T> = Result<Json<T>, ApiError>;

fn admin_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(ADMIN_KEY_HEADER).and_then(|value| value.to_str().ok())
}

/// Handle POST /admin/login - Check the admin key
pub async fn login_handler<S: TimerStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> ApiResult<MessageResponse> {
    state.authorize(admin_key(&headers))?;
    info!("Admin key accepted");
    Ok(Json(MessageResponse::ok("Admin access granted")))
}

/// Handle POST /admin/start - Start the countdown
pub async fn start_handler<S: TimerStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> ApiResult<CommandResponse<MainTimerState>> {
    state.authorize(admin_key(&headers))?;
    let outcome = state.service.start().await?;
    state.record_action("start");
    info!("Start endpoint called (applied={})", outcome.applied);
    let message = if outcome.applied { "Timer started" } else { "Timer already running" };
    Ok(Json(CommandResponse::new(message, outcome)))
}

/// Handle POST /admin/stop - Pause the countdown
pub async fn stop_handler<S: TimerStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> ApiResult<CommandResponse<MainTimerState>> {
    state.authorize(admin_key(&headers))?;
    let outcome = state.service.stop().await?;
    state.record_action("stop");
    info!("Stop endpoint called (applied={})", outcome.applied);
    let message = if outcome.applied { "Timer stopped" } else { "Timer already stopped" };
    Ok(Json(CommandResponse::new(message, outcome)))
}

/// Handle POST /admin/reset - Back to a fresh 24 hours
pub async fn reset_handler<S: TimerStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> ApiResult<CommandResponse<MainTimerState>> {
    state.authorize(admin_key(&headers))?;
    let outcome = state.service.reset().await?;
    state.record_action("reset");
    info!("Reset endpoint called");
    Ok(Json(CommandResponse::new("Timer reset", outcome)))
}

/// Handle POST /admin/custom - Set a custom stopped duration
///
/// The key is checked before the body is looked at.
pub async fn custom_handler<S: TimerStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    body: Result<Json<CustomDuration>, JsonRejection>,
) -> ApiResult<CommandResponse<MainTimerState>> {
    state.authorize(admin_key(&headers))?;
    let Json(duration) = body.map_err(|rejection| {
        warn!("Custom timer body rejected: {}", rejection.body_text());
        TimerError::InvalidInput(rejection.body_text())
    })?;
    let outcome = state.service.set_custom(duration).await.map_err(|e| {
        warn!("Custom timer rejected: {}", e);
        e
    })?;
    state.record_action("custom");
    let message = format!(
        "Timer set to {}h {}m {}s. Press Start to begin.",
        duration.hours, duration.minutes, duration.seconds
    );
    Ok(Json(CommandResponse::new(message, outcome)))
}

/// Handle POST /admin/push-cycle/reset - Open the next push window
pub async fn push_cycle_reset_handler<S: TimerStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> ApiResult<CommandResponse<PushCycleState>> {
    state.authorize(admin_key(&headers))?;
    let outcome = state.service.reset_push_cycle().await?;
    state.record_action("push-cycle-reset");
    let message = format!("Push cycle advanced to push #{}", outcome.state.push_number);
    Ok(Json(CommandResponse::new(message, outcome)))
}

/// Handle GET /timer - Stored main timer record
pub async fn timer_handler<S: TimerStore>(State(state): State<Arc<AppState<S>>>) -> ApiResult<MainTimerState> {
    Ok(Json(state.service.read_main().await?))
}

/// Handle GET /push-cycle - Stored push cycle record
pub async fn push_cycle_handler<S: TimerStore>(State(state): State<Arc<AppState<S>>>) -> ApiResult<PushCycleState> {
    let now = state.service.clock().now_ms();
    let cycle = state
        .service
        .read_push_cycle()
        .await?
        .unwrap_or_else(|| PushCycleState::fresh(now));
    Ok(Json(cycle))
}

/// Handle GET /status - Live countdowns from the last known state
pub async fn status_handler<S: TimerStore>(State(state): State<Arc<AppState<S>>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();
    Json(StatusResponse {
        countdown: state.countdown.current(),
        push_reminder: state.push_reminder.current(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
