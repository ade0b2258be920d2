//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Unknown username or wrong credential. Deliberately does not say which.
    #[error("Invalid username or credential")]
    InvalidCredential,

    #[error("No active session")]
    NoSession,

    #[error("Session expired")]
    SessionExpired,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Credential rejected: {0}")]
    WeakCredential(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl DomainError {
    /// True for the errors the session gate produces.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidCredential | DomainError::NoSession | DomainError::SessionExpired
        )
    }
}
