//! Repository traits (ports)

pub mod user_repository;
pub mod product_repository;
pub mod order_repository;
pub mod session_store;
pub mod image_storage;

pub use user_repository::UserRepository;
pub use product_repository::ProductRepository;
pub use order_repository::OrderRepository;
pub use session_store::SessionStore;
pub use image_storage::ImageStorage;

#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use session_store::MockSessionStore;
#[cfg(test)]
pub use image_storage::MockImageStorage;
