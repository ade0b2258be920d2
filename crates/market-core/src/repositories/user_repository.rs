//! User repository trait (port)

use async_trait::async_trait;
use crate::domain::{NewUser, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    /// Fails with `UsernameTaken` when the username already exists.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
}
