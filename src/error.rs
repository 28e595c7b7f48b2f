//! Error types shared by the synchronization service and the API

use thiserror::Error;

use crate::store::StoreError;

/// Result type for timer operations.
pub type TimerResult<T> = Result<T, TimerError>;

/// Message shown when a custom duration adds up to nothing.
pub const INVALID_DURATION_MESSAGE: &str = "Please enter a valid time greater than 0.";

/// Message shown when the admin key does not match.
pub const AUTH_MISMATCH_MESSAGE: &str = "Wrong key. Try again.";

/// Errors surfaced by timer commands and subscriptions
#[derive(Error, Debug)]
pub enum TimerError {
    /// The backing store could not be read, written or subscribed to.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A command was given input that produces no valid state.
    #[error("{0}")]
    InvalidInput(String),

    /// The admin key did not match the configured hash.
    #[error("{}", AUTH_MISMATCH_MESSAGE)]
    AuthMismatch,

    /// A stored record does not have the expected shape.
    #[error("malformed {record} record: {reason}")]
    MalformedRecord {
        record: &'static str,
        reason: String,
    },
}

impl TimerError {
    /// Rejection for a custom duration that is zero, negative or too large
    pub fn invalid_duration() -> Self {
        Self::InvalidInput(INVALID_DURATION_MESSAGE.to_string())
    }

    /// Whether the failure leaves the caller's last-known state usable
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::MalformedRecord { .. })
    }
}

impl From<StoreError> for TimerError {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_become_unavailable() {
        let err: TimerError = StoreError::Offline.into();
        assert!(matches!(err, TimerError::StoreUnavailable(_)));
        assert!(err.is_store_failure());
    }

    #[test]
    fn user_facing_messages() {
        assert_eq!(TimerError::AuthMismatch.to_string(), "Wrong key. Try again.");
        assert_eq!(
            TimerError::invalid_duration().to_string(),
            "Please enter a valid time greater than 0."
        );
        assert!(!TimerError::AuthMismatch.is_store_failure());
    }

    #[test]
    fn malformed_record_names_the_record() {
        let err = TimerError::MalformedRecord {
            record: "timer",
            reason: "expected an object".into(),
        };
        assert_eq!(err.to_string(), "malformed timer record: expected an object");
    }
}
