//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    display::{CountdownDisplay, PushReminderDisplay},
    error::TimerError,
    sync::CommandOutcome,
};

/// Response for admin commands, carrying the record after the command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse<T> {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// False when the command changed nothing
    pub applied: bool,
    pub state: T,
}

impl<T> CommandResponse<T> {
    pub fn new(message: impl Into<String>, outcome: CommandOutcome<T>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            applied: outcome.applied,
            state: outcome.state,
        }
    }
}

/// Plain acknowledgement or error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new("ok", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", message)
    }

    fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Live view of both countdowns plus server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownDisplay,
    pub push_reminder: PushReminderDisplay,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// A [`TimerError`] rendered as an HTTP error
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            TimerError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TimerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TimerError::AuthMismatch => StatusCode::UNAUTHORIZED,
            TimerError::MalformedRecord { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<TimerError> for ApiError {
    fn from(err: TimerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(MessageResponse::error(self.0.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        let cases = [
            (TimerError::StoreUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (TimerError::invalid_duration(), StatusCode::BAD_REQUEST),
            (TimerError::AuthMismatch, StatusCode::UNAUTHORIZED),
            (
                TimerError::MalformedRecord {
                    record: "timer",
                    reason: "bad".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status_code(), expected);
        }
    }

    #[test]
    fn command_response_carries_outcome() {
        let response = CommandResponse::new(
            "done",
            CommandOutcome {
                state: 5u32,
                applied: false,
            },
        );
        assert_eq!(response.status, "ok");
        assert!(!response.applied);
        assert_eq!(response.state, 5);
    }
}
