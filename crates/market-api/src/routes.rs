//! API router

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{auth, health, orders, products};
use crate::metrics::track_http;
use crate::middleware::{limit_by_client_ip, require_session};
use crate::state::AppState;

/// All `/api`, health, and metrics routes. Static files, CORS, tracing, and
/// the body limit are layered on by the server.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/logout", post(auth::logout))
        .route("/api/games", get(products::list_games))
        .route("/api/games/{game_name}", get(products::game_products))
        .route("/api/product/{product_id}", get(products::product_detail));

    let credentials = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/register", post(auth::register))
        .route_layer(from_fn_with_state(state.clone(), limit_by_client_ip));

    let authenticated = Router::new()
        .route("/api/session", get(auth::current_session))
        .route("/api/makeorder", post(orders::make_order))
        .route("/api/sellerproducts/{seller_username}", get(products::seller_products))
        .route("/api/sellerorders/{seller_username}", get(orders::seller_orders))
        .route("/api/sellItem", post(products::sell_item))
        .route(
            "/api/getsellerproduct/{seller_username}/{product_id}",
            get(products::seller_product),
        )
        .route("/api/editproduct/{product_id}", post(products::edit_product))
        .route(
            "/api/removeproduct/{seller_username}/{product_id}",
            delete(products::remove_product),
        )
        .route(
            "/api/removeorder/{seller_username}/{order_id}",
            delete(orders::remove_order),
        )
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let ops = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics));

    Router::new()
        .merge(public)
        .merge(credentials)
        .merge(authenticated)
        .merge(ops)
        .layer(from_fn_with_state(state.clone(), track_http))
        .with_state(state)
}
