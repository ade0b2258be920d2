//! Readiness probes for the server's external dependencies

use async_trait::async_trait;
use market_api::health::ReadinessCheck;
use market_infrastructure::database::ping;
use market_infrastructure::RedisSessionStore;
use sqlx::PgPool;

pub struct PostgresReadiness {
    pool: PgPool,
}

impl PostgresReadiness {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadinessCheck for PostgresReadiness {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn check(&self) -> Result<(), String> {
        ping(&self.pool).await.map_err(|e| e.to_string())
    }
}

pub struct RedisReadiness {
    store: RedisSessionStore,
}

impl RedisReadiness {
    pub fn new(store: RedisSessionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReadinessCheck for RedisReadiness {
    fn name(&self) -> &str {
        "redis"
    }

    async fn check(&self) -> Result<(), String> {
        self.store.ping().await.map_err(|e| e.to_string())
    }
}
