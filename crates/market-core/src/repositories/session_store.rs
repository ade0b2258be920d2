//! Session store trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::Session;
use crate::error::DomainError;

/// Holds one record per live session, keyed by `Session::id` (token digest).
///
/// Implementations must make each operation atomic per key. `get` may return
/// a record that is already past `expires_at`; deciding what that means is
/// the gate's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fails if a record with the same id already exists.
    async fn create(&self, session: &Session) -> Result<(), DomainError>;
    async fn get(&self, id: &str) -> Result<Option<Session>, DomainError>;
    /// Removing an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    /// Drops every session expired at `now`, returning how many were removed.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
