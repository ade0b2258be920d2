//! Order repository trait (port)

use async_trait::async_trait;
use crate::domain::{Order, OrderDraft};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, draft: &OrderDraft, buyer_username: &str) -> Result<Order, DomainError>;
    async fn find_by_seller(&self, seller_username: &str) -> Result<Vec<Order>, DomainError>;
    /// Returns the deleted row, `None` when nothing matched.
    async fn delete(&self, seller_username: &str, id: i64) -> Result<Option<Order>, DomainError>;
}
