//! # Market Infrastructure
//! 
//! Database, session store, and file storage implementations (adapters).

pub mod database;
pub mod session;
pub mod storage;

pub use database::{create_pool, run_migrations, PgOrderRepository, PgProductRepository, PgUserRepository};
pub use session::{MemorySessionStore, RedisSessionStore};
pub use storage::LocalImageStorage;
