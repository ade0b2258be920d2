use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use market_core::DomainError;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidCredential => {
                ApiError::Unauthorized("Invalid username or credential".to_string())
            }
            DomainError::NoSession => ApiError::Unauthorized("No active session".to_string()),
            DomainError::SessionExpired => ApiError::SessionExpired,
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::UsernameTaken(name) => {
                ApiError::Conflict(format!("Username already exists: {}", name))
            }
            DomainError::WeakCredential(msg)
            | DomainError::BadRequest(msg)
            | DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            DomainError::StorageFailure(msg) => ApiError::StorageFailure(msg),
            DomainError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) | ApiError::SessionExpired => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::StorageFailure(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                ("UNAUTHORIZED", msg)
            }
            ApiError::SessionExpired => {
                tracing::debug!("Session expired");
                ("SESSION_EXPIRED", "Session expired".to_string())
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                ("FORBIDDEN", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                ("NOT_FOUND", msg)
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                ("BAD_REQUEST", msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                ("CONFLICT", msg)
            }
            ApiError::RateLimited => {
                tracing::warn!("Rate limit exceeded");
                ("RATE_LIMITED", "Too many attempts, try again later".to_string())
            }
            // details stay in the log
            ApiError::StorageFailure(msg) => {
                tracing::error!("Storage failure: {}", msg);
                ("STORAGE_FAILURE", "Storage failure".to_string())
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::InvalidCredential, StatusCode::UNAUTHORIZED),
            (DomainError::NoSession, StatusCode::UNAUTHORIZED),
            (DomainError::SessionExpired, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DomainError::UsernameTaken("x".into()), StatusCode::CONFLICT),
            (DomainError::WeakCredential("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::ValidationError("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::StorageFailure("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).status(), status);
        }
    }

    #[test]
    fn test_storage_failure_hides_detail() {
        let response = ApiError::StorageFailure("relation game_items missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
