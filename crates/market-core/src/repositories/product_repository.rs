//! Product repository trait (port)

use async_trait::async_trait;
use crate::domain::{Product, ProductChanges, ProductDraft, ProductUpdate};
use crate::error::DomainError;

/// Every statement that touches a seller's listing is scoped by
/// `seller_username` as well as by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, draft: &ProductDraft, item_image: &str) -> Result<Product, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;
    async fn find_by_seller(&self, seller_username: &str) -> Result<Vec<Product>, DomainError>;
    async fn find_by_seller_and_id(
        &self,
        seller_username: &str,
        id: i64,
    ) -> Result<Option<Product>, DomainError>;
    async fn find_by_game(&self, game_name: &str) -> Result<Vec<Product>, DomainError>;
    async fn list_games(&self) -> Result<Vec<String>, DomainError>;
    /// `None` when no row matched. `item_image` replaces the stored image when
    /// set. The previous image name is read under the same row lock as the
    /// write, so concurrent edits each see the image they displaced.
    async fn update(
        &self,
        seller_username: &str,
        id: i64,
        changes: &ProductChanges,
        item_image: Option<String>,
    ) -> Result<Option<ProductUpdate>, DomainError>;
    /// Returns the deleted row, `None` when nothing matched.
    async fn delete(&self, seller_username: &str, id: i64) -> Result<Option<Product>, DomainError>;
}
