//! Domain services (business logic)

pub mod auth_service;
pub mod market_service;

pub use auth_service::{authorize, require_owner, require_role, AuthService, Registration};
pub use market_service::MarketService;
