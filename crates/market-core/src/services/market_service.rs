// ============================================================================
// Market Core - Market Service
// File: crates/market-core/src/services/market_service.rs
// ============================================================================
//! Listings and orders. Every operation scoped to a seller or buyer runs the
//! role and ownership checks before touching storage.

use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{
    Identity, ImageUpload, Order, OrderDraft, Product, ProductChanges, ProductDraft, Role,
};
use crate::error::DomainError;
use crate::repositories::{ImageStorage, OrderRepository, ProductRepository};
use crate::services::auth_service::{require_owner, require_role};

pub struct MarketService {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    images: Arc<dyn ImageStorage>,
}

impl MarketService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        images: Arc<dyn ImageStorage>,
    ) -> Self {
        Self { products, orders, images }
    }

    // --- buyer browsing -----------------------------------------------------

    pub async fn list_games(&self) -> Result<Vec<String>, DomainError> {
        self.products.list_games().await
    }

    pub async fn game_products(&self, game_name: &str) -> Result<Vec<Product>, DomainError> {
        self.products.find_by_game(game_name).await
    }

    pub async fn product(&self, id: i64) -> Result<Product, DomainError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("product {}", id)))
    }

    pub async fn place_order(
        &self,
        identity: &Identity,
        draft: OrderDraft,
    ) -> Result<Order, DomainError> {
        require_role(identity, Role::Buyer)?;
        draft.validate()?;

        let order = self.orders.create(&draft, &identity.username).await?;
        info!(
            "Order {} placed by {} for seller {}",
            order.id, order.buyer_username, order.seller_username
        );
        Ok(order)
    }

    // --- seller scope -------------------------------------------------------

    fn require_seller(identity: &Identity, seller_username: &str) -> Result<(), DomainError> {
        require_role(identity, Role::Seller)?;
        require_owner(identity, seller_username)
    }

    pub async fn seller_products(
        &self,
        identity: &Identity,
        seller_username: &str,
    ) -> Result<Vec<Product>, DomainError> {
        Self::require_seller(identity, seller_username)?;
        self.products.find_by_seller(seller_username).await
    }

    pub async fn seller_orders(
        &self,
        identity: &Identity,
        seller_username: &str,
    ) -> Result<Vec<Order>, DomainError> {
        Self::require_seller(identity, seller_username)?;
        self.orders.find_by_seller(seller_username).await
    }

    pub async fn seller_product(
        &self,
        identity: &Identity,
        seller_username: &str,
        id: i64,
    ) -> Result<Product, DomainError> {
        Self::require_seller(identity, seller_username)?;
        self.products
            .find_by_seller_and_id(seller_username, id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("product {}", id)))
    }

    /// Stores the image, then inserts the row. A failed insert removes the
    /// image it just wrote.
    pub async fn create_product(
        &self,
        identity: &Identity,
        draft: ProductDraft,
        image: ImageUpload,
    ) -> Result<Product, DomainError> {
        Self::require_seller(identity, &draft.seller_username)?;
        draft.validate()?;
        image.check()?;

        let file_name = self.images.store(&image).await?;
        match self.products.create(&draft, &file_name).await {
            Ok(product) => {
                info!(
                    "Product {} listed by {} (image: {})",
                    product.id, product.seller_username, product.item_image
                );
                Ok(product)
            }
            Err(e) => {
                self.discard_image(&file_name).await;
                Err(e)
            }
        }
    }

    /// Only the caller's own listing can be edited. Without a new image the
    /// stored one is kept.
    pub async fn edit_product(
        &self,
        identity: &Identity,
        id: i64,
        changes: ProductChanges,
        image: Option<ImageUpload>,
    ) -> Result<Product, DomainError> {
        require_role(identity, Role::Seller)?;
        changes.validate()?;
        if let Some(image) = &image {
            image.check()?;
        }

        let seller = identity.username.as_str();
        let new_image = match &image {
            Some(image) => Some(self.images.store(image).await?),
            None => None,
        };

        let update = match self.products.update(seller, id, &changes, new_image.clone()).await {
            Ok(Some(update)) => update,
            Ok(None) => {
                if let Some(name) = &new_image {
                    self.discard_image(name).await;
                }
                return Err(DomainError::NotFound(format!("product {}", id)));
            }
            Err(e) => {
                if let Some(name) = &new_image {
                    self.discard_image(name).await;
                }
                return Err(e);
            }
        };

        if update.previous_image != update.product.item_image {
            self.discard_image(&update.previous_image).await;
        }

        info!("Product {} updated by {}", id, seller);
        Ok(update.product)
    }

    pub async fn remove_product(
        &self,
        identity: &Identity,
        seller_username: &str,
        id: i64,
    ) -> Result<Product, DomainError> {
        Self::require_seller(identity, seller_username)?;

        let removed = self
            .products
            .delete(seller_username, id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("product {}", id)))?;

        self.discard_image(&removed.item_image).await;
        info!("Product {} removed by {}", id, seller_username);
        Ok(removed)
    }

    pub async fn remove_order(
        &self,
        identity: &Identity,
        seller_username: &str,
        id: i64,
    ) -> Result<Order, DomainError> {
        Self::require_seller(identity, seller_username)?;

        let removed = self
            .orders
            .delete(seller_username, id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("order {}", id)))?;

        info!("Order {} removed by {}", id, seller_username);
        Ok(removed)
    }

    // Image cleanup never fails the request.
    async fn discard_image(&self, file_name: &str) {
        if let Err(e) = self.images.remove(file_name).await {
            warn!("Failed to remove image {}: {}", file_name, e);
        }
    }
}
