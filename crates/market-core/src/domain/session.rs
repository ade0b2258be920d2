// ============================================================================
// Market Core - Session Entity
// File: crates/market-core/src/domain/session.rs
// Description: Server-held session bound to an opaque cookie token
// ============================================================================

use chrono::{DateTime, Duration, Utc};
use market_security::SessionToken;
use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// Session record as held by a session store.
///
/// `id` is the digest of the client token, never the token itself. Expiry is
/// absolute: `expires_at` is fixed when the session is created and nothing
/// extends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, identity: Identity, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            identity,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Seconds left before expiry, zero once expired.
    pub fn remaining_seconds(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

/// Result of a successful login: the token goes to the client cookie, the
/// session is what the store now holds.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub session: Session,
}
