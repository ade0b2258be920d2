// ============================================================================
// Market Infrastructure - PostgreSQL Order Repository
// File: crates/market-infrastructure/src/database/postgres/order_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;

use market_core::domain::{Order, OrderDraft};
use market_core::error::DomainError;
use market_core::repositories::OrderRepository;

use super::storage_failure;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    pub id: i64,
    pub seller_username: String,
    pub seller_email: String,
    pub buyer_username: String,
    pub buyer_email: String,
    pub item_title: String,
    pub game_name: String,
    pub item_quantity: i32,
    pub item_price: i64,
    pub buyer_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            seller_username: row.seller_username,
            seller_email: row.seller_email,
            buyer_username: row.buyer_username,
            buyer_email: row.buyer_email,
            item_title: row.item_title,
            game_name: row.game_name,
            item_quantity: row.item_quantity,
            item_price: row.item_price,
            buyer_note: row.buyer_note,
            created_at: row.created_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, seller_username, seller_email, buyer_username, buyer_email, \
     item_title, game_name, item_quantity, item_price, buyer_note, created_at";

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, draft: &OrderDraft, buyer_username: &str) -> Result<Order, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO orders (
                seller_username, seller_email, buyer_username, buyer_email,
                item_title, game_name, item_quantity, item_price, buyer_note
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let row: OrderRow = sqlx::query_as(&sql)
            .bind(&draft.seller_username)
            .bind(&draft.seller_email)
            .bind(buyer_username)
            .bind(&draft.buyer_email)
            .bind(&draft.item_title)
            .bind(&draft.game_name)
            .bind(draft.item_quantity)
            .bind(draft.item_price)
            .bind(&draft.buyer_note)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_failure("inserting order", e))?;

        info!("Order {} placed by {} with {}", row.id, row.buyer_username, row.seller_username);
        Ok(row.into())
    }

    async fn find_by_seller(&self, seller_username: &str) -> Result<Vec<Order>, DomainError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE seller_username = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(seller_username)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_failure("listing seller orders", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, seller_username: &str, id: i64) -> Result<Option<Order>, DomainError> {
        let sql = format!(
            "DELETE FROM orders WHERE seller_username = $1 AND id = $2 RETURNING {ORDER_COLUMNS}"
        );
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(seller_username)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_failure("deleting order", e))?;

        Ok(row.map(Into::into))
    }
}
