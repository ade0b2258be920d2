// ============================================================================
// Market Core - Order Entity
// File: crates/market-core/src/domain/order.rs
// Description: Purchase request placed by a buyer against a seller
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
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

/// Order as submitted by the buyer. The buyer's username is not part of it;
/// it always comes from the authenticated identity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderDraft {
    #[validate(length(min = 1, max = 32, message = "Seller username is required"))]
    pub seller_username: String,

    #[validate(email(message = "Invalid seller email"))]
    pub seller_email: String,

    #[validate(email(message = "Invalid buyer email"))]
    pub buyer_email: String,

    #[validate(length(min = 1, max = 200, message = "Item title is required"))]
    pub item_title: String,

    #[validate(length(min = 1, max = 100, message = "Game name is required"))]
    pub game_name: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub item_quantity: i32,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub item_price: i64,

    #[validate(length(max = 1000, message = "Note too long"))]
    pub buyer_note: Option<String>,
}
