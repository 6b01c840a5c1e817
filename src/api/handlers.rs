//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    error::ClockError,
    render::Ring,
    state::{AppState, Phase},
};
use super::responses::{ClockResponse, ErrorResponse, HealthResponse, StatusResponse};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(e: ClockError) -> ApiError {
    let status = match e {
        ClockError::InvalidInput { .. } => {
            warn!("Rejected request: {}", e);
            StatusCode::BAD_REQUEST
        }
        ClockError::PersistenceUnavailable(_) | ClockError::StateLock(_) => {
            error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::new(e.to_string())))
}

/// Minutes as typed into a duration field, either text or a JSON number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MinutesInput {
    Text(String),
    Number(serde_json::Number),
}

impl MinutesInput {
    fn as_text(&self) -> String {
        match self {
            MinutesInput::Text(text) => text.clone(),
            MinutesInput::Number(number) => number.to_string(),
        }
    }
}

/// Body of PUT /duration/:phase
#[derive(Debug, Clone, Deserialize)]
pub struct DurationRequest {
    pub minutes: MinutesInput,
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ClockResponse>, ApiError> {
    let clock = state.start().map_err(api_error)?;
    info!("Start endpoint called - {} phase running", clock.state.phase);
    Ok(Json(ClockResponse::new("Clock started".to_string(), clock)))
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ClockResponse>, ApiError> {
    let clock = state.pause().map_err(api_error)?;
    info!("Pause endpoint called - {} remaining", clock.label);
    Ok(Json(ClockResponse::new("Clock paused".to_string(), clock)))
}

/// Handle POST /reset - Return to a paused, full work phase
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ClockResponse>, ApiError> {
    let clock = state.reset().map_err(api_error)?;
    info!("Reset endpoint called");
    Ok(Json(ClockResponse::new("Clock reset".to_string(), clock)))
}

/// Handle PUT /duration/:phase - Retune a phase length in minutes
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ClockResponse>, ApiError> {
    let phase: Phase = phase.parse().map_err(api_error)?;
    let minutes = request.minutes.as_text();

    let clock = state.set_duration(phase, &minutes).map_err(api_error)?;
    info!("Duration endpoint called - {} set to {} minutes", phase, minutes.trim());
    Ok(Json(ClockResponse::new(
        format!("{} duration set to {} minutes", phase, minutes.trim()),
        clock,
    )))
}

/// Handle GET /clock - Return the current read model and clock state
pub async fn clock_handler(State(state): State<Arc<AppState>>) -> Result<Json<ClockResponse>, ApiError> {
    let clock = state.clock_view().map_err(api_error)?;
    Ok(Json(ClockResponse::new(clock.label.clone(), clock)))
}

/// Handle GET /status - Return clock and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let clock = state.clock_view().map_err(api_error)?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        ring: Ring::from(&clock.read_model),
        clock,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
