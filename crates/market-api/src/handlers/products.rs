// ============================================================================
// Market API - Product Handlers
// File: crates/market-api/src/handlers/products.rs
// ============================================================================
//! Buyer browsing and seller listing management

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use market_core::domain::{Identity, Product};

use crate::error::ApiError;
use crate::forms::ProductForm;
use crate::response::ApiResponse;
use crate::state::AppState;

type ProductResult = Result<Json<ApiResponse<Product>>, ApiError>;
type ProductListResult = Result<Json<ApiResponse<Vec<Product>>>, ApiError>;

/// GET /api/games
pub async fn list_games(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let games = state.market.list_games().await?;
    Ok(Json(ApiResponse::success(games)))
}

/// GET /api/games/{game_name}
pub async fn game_products(
    State(state): State<AppState>,
    Path(game_name): Path<String>,
) -> ProductListResult {
    let products = state.market.game_products(&game_name).await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/product/{product_id}
pub async fn product_detail(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ProductResult {
    let product = state.market.product(product_id).await?;
    Ok(Json(ApiResponse::success(product)))
}

/// GET /api/sellerproducts/{seller_username}
pub async fn seller_products(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(seller_username): Path<String>,
) -> ProductListResult {
    let products = state.market.seller_products(&identity, &seller_username).await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/getsellerproduct/{seller_username}/{product_id}
pub async fn seller_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((seller_username, product_id)): Path<(String, i64)>,
) -> ProductResult {
    let product = state
        .market
        .seller_product(&identity, &seller_username, product_id)
        .await?;
    Ok(Json(ApiResponse::success(product)))
}

/// POST /api/sellItem (multipart)
pub async fn sell_item(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let (draft, image) = ProductForm::read(multipart).await?.into_draft()?;
    let product = state.market.create_product(&identity, draft, image).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

/// POST /api/editproduct/{product_id} (multipart, image optional)
pub async fn edit_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(product_id): Path<i64>,
    multipart: Multipart,
) -> ProductResult {
    let (changes, image) = ProductForm::read(multipart).await?.into_changes()?;
    let product = state
        .market
        .edit_product(&identity, product_id, changes, image)
        .await?;
    Ok(Json(ApiResponse::success(product)))
}

/// DELETE /api/removeproduct/{seller_username}/{product_id}
pub async fn remove_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((seller_username, product_id)): Path<(String, i64)>,
) -> ProductResult {
    let removed = state
        .market
        .remove_product(&identity, &seller_username, product_id)
        .await?;
    Ok(Json(ApiResponse::success(removed)))
}
