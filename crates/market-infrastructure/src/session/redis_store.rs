//! Redis-backed session store
//!
//! Key layout: `market:session:{digest}` holding the session as JSON. Keys
//! carry a Redis TTL of the remaining lifetime plus a short grace period, so
//! a lookup just after expiry still finds the record and the gate can report
//! `SessionExpired` instead of `NoSession`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::redis::{cmd, AsyncCommands};
use deadpool_redis::{Config, Connection, Pool, Runtime};
use tracing::{debug, error, info};

use market_core::domain::Session;
use market_core::error::DomainError;
use market_core::repositories::SessionStore;

const KEY_PREFIX: &str = "market:session:";
const EXPIRED_GRACE_SECS: i64 = 300;
const SCAN_BATCH: usize = 200;

#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `url`. No connection is opened until first use.
    pub fn connect(url: &str, max_connections: usize) -> Result<Self, DomainError> {
        let mut config = Config::from_url(url);
        config.pool = Some(deadpool_redis::PoolConfig::new(max_connections));
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DomainError::InternalError(format!("redis pool: {}", e)))?;

        info!("Redis session store configured");
        Ok(Self::new(pool))
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| redis_failure("PING", e))
    }

    fn key(id: &str) -> String {
        format!("{}{}", KEY_PREFIX, id)
    }

    async fn conn(&self) -> Result<Connection, DomainError> {
        self.pool.get().await.map_err(|e| {
            error!("Redis pool error: {}", e);
            DomainError::StorageFailure("session store unavailable".to_string())
        })
    }
}

fn redis_failure(op: &str, e: deadpool_redis::redis::RedisError) -> DomainError {
    error!("Redis {} failed: {}", op, e);
    DomainError::StorageFailure(format!("session store {} failed", op))
}

fn decode(json: &str) -> Result<Session, DomainError> {
    serde_json::from_str(json).map_err(|e| {
        error!("Corrupt session record: {}", e);
        DomainError::StorageFailure("corrupt session record".to_string())
    })
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        let json = serde_json::to_string(session)
            .map_err(|e| DomainError::InternalError(format!("session encode: {}", e)))?;
        let ttl = (session.remaining_seconds() + EXPIRED_GRACE_SECS).max(1);

        let mut conn = self.conn().await?;
        let stored: Option<String> = cmd("SET")
            .arg(Self::key(&session.id))
            .arg(json)
            .arg("NX")
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_failure("SET", e))?;

        match stored {
            Some(_) => Ok(()),
            None => {
                error!("Session id collision, refusing to overwrite");
                Err(DomainError::InternalError("session id collision".to_string()))
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Session>, DomainError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(Self::key(id))
            .await
            .map_err(|e| redis_failure("GET", e))?;

        value.as_deref().map(decode).transpose()
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        let removed: usize = conn
            .del(Self::key(id))
            .await
            .map_err(|e| redis_failure("DEL", e))?;

        debug!("Session delete removed {} key(s)", removed);
        Ok(())
    }

    /// Redis drops keys on its own after the grace period; this only clears
    /// records that are expired but still inside it.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut conn = self.conn().await?;
        let pattern = format!("{}*", KEY_PREFIX);
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| redis_failure("SCAN", e))?;

            for key in keys {
                let value: Option<String> = conn
                    .get(&key)
                    .await
                    .map_err(|e| redis_failure("GET", e))?;
                let expired = match value.as_deref().map(decode) {
                    Some(Ok(session)) => session.is_expired_at(now),
                    // unreadable records are dropped too
                    Some(Err(_)) => true,
                    None => false,
                };
                if expired {
                    let n: usize = conn
                        .del(&key)
                        .await
                        .map_err(|e| redis_failure("DEL", e))?;
                    removed += n;
                }
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_prefixed() {
        assert_eq!(RedisSessionStore::key("abc"), "market:session:abc");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("{not json"), Err(DomainError::StorageFailure(_))));
    }

    #[tokio::test]
    async fn test_connect_does_not_dial() {
        let store = RedisSessionStore::connect("redis://127.0.0.1:6399", 4);
        assert!(store.is_ok());
    }
}
