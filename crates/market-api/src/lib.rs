//! # Market API
//!
//! HTTP handlers, middleware, and the router for the marketplace.

pub mod error;
pub mod extract;
pub mod forms;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
