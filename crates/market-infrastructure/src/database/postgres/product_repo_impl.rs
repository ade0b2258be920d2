// ============================================================================
// Market Infrastructure - PostgreSQL Product Repository
// File: crates/market-infrastructure/src/database/postgres/product_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use market_core::domain::{Product, ProductChanges, ProductDraft, ProductUpdate};
use market_core::error::DomainError;
use market_core::repositories::ProductRepository;

use super::storage_failure;

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    pub id: i64,
    pub game_name: String,
    pub seller_username: String,
    pub seller_email: String,
    pub seller_phonenumber: Option<String>,
    pub item_price: i64,
    pub item_title: String,
    pub item_description: Option<String>,
    pub item_image: String,
    pub item_stock: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            game_name: row.game_name,
            seller_username: row.seller_username,
            seller_email: row.seller_email,
            seller_phonenumber: row.seller_phonenumber,
            item_price: row.item_price,
            item_title: row.item_title,
            item_description: row.item_description,
            item_image: row.item_image,
            item_stock: row.item_stock,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct UpdatedProductRow {
    #[sqlx(flatten)]
    pub product: ProductRow,
    pub previous_image: String,
}

const PRODUCT_COLUMNS: &str = "id, game_name, seller_username, seller_email, seller_phonenumber, \
     item_price, item_title, item_description, item_image, item_stock, created_at";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, draft: &ProductDraft, item_image: &str) -> Result<Product, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO game_items (
                game_name, seller_username, seller_email, seller_phonenumber,
                item_price, item_title, item_description, item_image, item_stock
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let row: ProductRow = sqlx::query_as(&sql)
            .bind(&draft.game_name)
            .bind(&draft.seller_username)
            .bind(&draft.seller_email)
            .bind(&draft.seller_phonenumber)
            .bind(draft.item_price)
            .bind(&draft.item_title)
            .bind(&draft.item_description)
            .bind(item_image)
            .bind(draft.item_stock)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_failure("inserting product", e))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM game_items WHERE id = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_failure("finding product", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_seller(&self, seller_username: &str) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM game_items WHERE seller_username = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(seller_username)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_failure("listing seller products", e))?;

        debug!("Found {} products for seller {}", rows.len(), seller_username);
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_seller_and_id(
        &self,
        seller_username: &str,
        id: i64,
    ) -> Result<Option<Product>, DomainError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM game_items WHERE seller_username = $1 AND id = $2"
        );
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(seller_username)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_failure("finding seller product", e))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_game(&self, game_name: &str) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM game_items WHERE game_name = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(game_name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_failure("listing game products", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_games(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT game_name FROM game_items ORDER BY game_name"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_failure("listing games", e))
    }

    async fn update(
        &self,
        seller_username: &str,
        id: i64,
        changes: &ProductChanges,
        item_image: Option<String>,
    ) -> Result<Option<ProductUpdate>, DomainError> {
        // FOR UPDATE makes a concurrent edit wait and then read this write's image.
        let sql = r#"
            WITH previous AS (
                SELECT id, item_image
                FROM game_items
                WHERE seller_username = $1 AND id = $2
                FOR UPDATE
            )
            UPDATE game_items AS g
            SET
                game_name = $3,
                seller_email = $4,
                item_price = $5,
                item_title = $6,
                item_description = $7,
                item_stock = $8,
                item_image = COALESCE($9, g.item_image)
            FROM previous
            WHERE g.id = previous.id
            RETURNING
                g.id, g.game_name, g.seller_username, g.seller_email, g.seller_phonenumber,
                g.item_price, g.item_title, g.item_description, g.item_image, g.item_stock,
                g.created_at, previous.item_image AS previous_image
            "#;

        let row: Option<UpdatedProductRow> = sqlx::query_as(sql)
            .bind(seller_username)
            .bind(id)
            .bind(&changes.game_name)
            .bind(&changes.seller_email)
            .bind(changes.item_price)
            .bind(&changes.item_title)
            .bind(&changes.item_description)
            .bind(changes.item_stock)
            .bind(item_image)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_failure("updating product", e))?;

        Ok(row.map(|row| ProductUpdate {
            product: row.product.into(),
            previous_image: row.previous_image,
        }))
    }

    async fn delete(&self, seller_username: &str, id: i64) -> Result<Option<Product>, DomainError> {
        let sql = format!(
            "DELETE FROM game_items WHERE seller_username = $1 AND id = $2 RETURNING {PRODUCT_COLUMNS}"
        );
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(seller_username)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_failure("deleting product", e))?;

        Ok(row.map(Into::into))
    }
}
