//! # Market Core - Domain Module
//! 
//! Domain entities for the marketplace.

pub mod identity;
pub mod session;
pub mod user;
pub mod product;
pub mod order;

// Re-export all entities and enums
pub use identity::{Identity, Role};
pub use session::{IssuedSession, Session};
pub use user::{NewUser, User};
pub use product::{ImageFormat, ImageUpload, Product, ProductChanges, ProductDraft, ProductUpdate};
pub use order::{Order, OrderDraft};
