//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::archive::ArchiveError;
use crate::calculator::CalculatorError;
use crate::services::SimulationError;
use crate::session::SessionError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers. Every error surfaces to the
/// user as a visible notification; nothing is swallowed.
#[derive(Debug)]
pub enum AppError {
    /// Target or resource not found
    NotFound(String),
    /// Target name matches several planets; caller must disambiguate
    Ambiguous { name: String, candidates: Vec<String> },
    /// Malformed request
    BadRequest(String),
    /// Action attempted before its prerequisite state exists
    InvalidState(String),
    /// Simulation requested with required fields unset
    IncompleteConfig(Vec<String>),
    /// Archive or calculator unreachable/failed
    External(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::Ambiguous { name, candidates } => (
                StatusCode::CONFLICT,
                ApiError::new(
                    "AMBIGUOUS_TARGET",
                    format!("target name '{}' matches several planets", name),
                )
                .with_details(candidates.join(", ")),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::InvalidState(msg) => {
                (StatusCode::CONFLICT, ApiError::new("INVALID_STATE", msg))
            }
            AppError::IncompleteConfig(missing) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("INCOMPLETE_CONFIG", "configuration is incomplete")
                    .with_details(missing.join(", ")),
            ),
            AppError::External(msg) => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("EXTERNAL_SERVICE", msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::NotFound(name) => {
                AppError::NotFound(format!("target '{}' not found", name))
            }
            ArchiveError::Ambiguous { name, candidates } => {
                AppError::Ambiguous { name, candidates }
            }
            ArchiveError::Service(msg) => AppError::External(msg),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidState(msg) => AppError::InvalidState(msg),
            SessionError::IncompleteConfig { missing } => AppError::IncompleteConfig(missing),
        }
    }
}

impl From<CalculatorError> for AppError {
    fn from(err: CalculatorError) -> Self {
        AppError::External(err.to_string())
    }
}

impl From<SimulationError> for AppError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Session(e) => e.into(),
            SimulationError::Calculator(e) => e.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_errors_map_to_codes() {
        let not_found: AppError = ArchiveError::NotFound("X b".to_string()).into();
        assert!(matches!(not_found, AppError::NotFound(_)));

        let ambiguous: AppError = ArchiveError::Ambiguous {
            name: "X".to_string(),
            candidates: vec!["X b".to_string(), "X c".to_string()],
        }
        .into();
        assert!(matches!(ambiguous, AppError::Ambiguous { .. }));

        let service: AppError = ArchiveError::Service("boom".to_string()).into();
        assert!(matches!(service, AppError::External(_)));
    }

    #[test]
    fn test_session_errors_map_to_codes() {
        let invalid: AppError = SessionError::InvalidState("no target".to_string()).into();
        assert!(matches!(invalid, AppError::InvalidState(_)));

        let incomplete: AppError = SessionError::IncompleteConfig {
            missing: vec!["sed".to_string()],
        }
        .into();
        assert!(matches!(incomplete, AppError::IncompleteConfig(_)));
    }
}
