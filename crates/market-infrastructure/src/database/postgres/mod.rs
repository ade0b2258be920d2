//! PostgreSQL repository implementations

pub mod user_repo_impl;
pub mod product_repo_impl;
pub mod order_repo_impl;

pub use user_repo_impl::PgUserRepository;
pub use product_repo_impl::PgProductRepository;
pub use order_repo_impl::PgOrderRepository;

use market_core::error::DomainError;
use tracing::error;

/// Logs the driver error and hides it behind `StorageFailure`.
pub(crate) fn storage_failure(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::StorageFailure(format!("database error {}", context))
}
