//! In-process session store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

use market_core::domain::Session;
use market_core::error::DomainError;
use market_core::repositories::SessionStore;

/// Thread-safe session map keyed by token digest.
///
/// Sessions are lost on restart. Every operation locks a single shard, so
/// concurrent logins, lookups, and logouts never block each other across keys.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        info!("Initializing in-memory session store");
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        match self.sessions.entry(session.id.clone()) {
            Entry::Occupied(_) => {
                error!("Session id collision, refusing to overwrite");
                Err(DomainError::InternalError("session id collision".to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                debug!("Stored session for {}", session.identity.username);
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        if let Some((_, session)) = self.sessions.remove(id) {
            debug!("Removed session for {}", session.identity.username);
        }
        Ok(())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let live = !session.is_expired_at(now);
            if !live {
                removed += 1;
            }
            live
        });
        Ok(removed)
    }
}
