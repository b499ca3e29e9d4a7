use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy of the lifecycle engine. All variants are local,
/// synchronous and recoverable by the caller; on error the prior state is
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed period bounds (absent or unparseable date).
    #[error("invalid period range: {0}")]
    InvalidRange(String),

    /// The actor's role or ownership disallows the action entirely.
    #[error("{0}")]
    ForbiddenTransition(&'static str),

    /// The action exists but is not valid from the current status.
    #[error("{0}")]
    InvalidStateTransition(&'static str),

    /// Reject was requested without a non-empty reason.
    #[error("a rejection reason is required")]
    MissingReason,

    /// Directory add/update failed validation.
    #[error("{0}")]
    InvalidUser(String),

    #[error("{0} not found")]
    NotFound(&'static str),
}

impl actix_web::ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::InvalidRange(_)
            | EngineError::MissingReason
            | EngineError::InvalidUser(_) => StatusCode::BAD_REQUEST,
            EngineError::ForbiddenTransition(_) => StatusCode::FORBIDDEN,
            EngineError::InvalidStateTransition(_) => StatusCode::CONFLICT,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
