//! Order placement and seller order management

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use market_core::domain::{Identity, Order, OrderDraft};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/makeorder
///
/// The buyer is whoever holds the session; the body cannot name one.
pub async fn make_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(draft): ApiJson<OrderDraft>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), ApiError> {
    let order = state.market.place_order(&identity, draft).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

/// GET /api/sellerorders/{seller_username}
pub async fn seller_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(seller_username): Path<String>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let orders = state.market.seller_orders(&identity, &seller_username).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// DELETE /api/removeorder/{seller_username}/{order_id}
pub async fn remove_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((seller_username, order_id)): Path<(String, i64)>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let removed = state
        .market
        .remove_order(&identity, &seller_username, order_id)
        .await?;
    Ok(Json(ApiResponse::success(removed)))
}
