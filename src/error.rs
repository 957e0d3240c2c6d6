// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use crate::scheduling::ScheduleConflict;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PortalError>;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid email or password")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Unknown user role: {0}")]
    UnknownRole(String),

    #[error("Scheduling conflict: {0}")]
    Schedule(#[from] ScheduleConflict),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PortalError {
    pub fn not_found(what: impl Into<String>) -> Self {
        PortalError::NotFound(what.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortalError::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        PortalError::Forbidden(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unauthorized_message_is_generic() {
        assert_eq!(
            PortalError::Unauthorized.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_schedule_conflict_converts() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let err: PortalError = ScheduleConflict::DailyLimitReached { date, limit: 2 }.into();
        assert!(matches!(err, PortalError::Schedule(_)));
        assert!(err.to_string().contains("2025-03-04"));
    }
}
