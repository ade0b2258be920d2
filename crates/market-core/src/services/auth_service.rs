// ============================================================================
// Market Core - Authentication Service
// File: crates/market-core/src/services/auth_service.rs
// ============================================================================
//! Session gate: login, authenticate, logout, expiry sweep, and the
//! ownership checks every seller/buyer-scoped operation goes through.

use std::sync::Arc;
use chrono::{Duration, Utc};
use market_security::{PasswordError, PasswordService, SessionToken};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::{Identity, IssuedSession, NewUser, Role, Session};
use crate::error::DomainError;
use crate::repositories::{SessionStore, UserRepository};

/// Authentication gate backed by an injected session store.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
}

/// Registration payload after transport decoding.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub credential: String,
    pub role: Role,
    pub phone_number: Option<String>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        session_ttl_seconds: i64,
    ) -> Self {
        Self {
            users,
            sessions,
            session_ttl: Duration::seconds(session_ttl_seconds),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Verify the credential and mint a fresh session.
    pub async fn login(
        &self,
        username: &str,
        credential: &str,
    ) -> Result<IssuedSession, DomainError> {
        info!("Login attempt for user: {}", username);

        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            PasswordService::verify_decoy(credential);
            warn!("Login failed: unknown user: {}", username);
            return Err(DomainError::InvalidCredential);
        };

        let valid = PasswordService::verify(credential, &user.password_hash)
            .map_err(|e| {
                error!("Stored hash for {} is unreadable: {}", user.username, e);
                DomainError::InvalidCredential
            })?;

        if !valid {
            warn!("Login failed: invalid credential for: {}", user.username);
            return Err(DomainError::InvalidCredential);
        }

        let token = SessionToken::generate();
        let session = Session::new(token.digest(), user.identity(), self.session_ttl);
        self.sessions.create(&session).await?;

        info!(
            "Login successful for: {} (role: {}, expires: {})",
            user.username,
            user.role.as_str(),
            session.expires_at
        );

        Ok(IssuedSession { token, session })
    }

    /// Create a buyer or seller account. Does not log the user in.
    pub async fn register(&self, registration: Registration) -> Result<Identity, DomainError> {
        info!("Registration attempt for user: {}", registration.username);

        PasswordService::check_strength(
            &registration.credential,
            &[registration.username.as_str(), registration.email.as_str()],
        )
        .map_err(|e| match e {
            PasswordError::HashError(msg) => DomainError::InternalError(msg),
            other => DomainError::WeakCredential(other.to_string()),
        })?;

        if self.users.find_by_username(registration.username.trim()).await?.is_some() {
            warn!("Registration failed: username exists: {}", registration.username);
            return Err(DomainError::UsernameTaken(registration.username));
        }

        let password_hash = PasswordService::hash(&registration.credential)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let new_user = NewUser::new(
            registration.username,
            registration.email,
            password_hash,
            registration.role,
            registration.phone_number,
        )?;

        let user = self.users.create(&new_user).await?;
        info!("Registration successful for: {}", user.username);

        Ok(user.identity())
    }

    /// Resolve a cookie token to its live session.
    ///
    /// An expired record is deleted on sight, so the token can never become
    /// valid again and later calls see `NoSession`.
    pub async fn authenticate(&self, token: &str) -> Result<Session, DomainError> {
        let token = SessionToken::parse(token).ok_or(DomainError::NoSession)?;

        let session = self.sessions.get(&token.digest()).await?
            .ok_or(DomainError::NoSession)?;

        if session.is_expired() {
            debug!("Session for {} expired at {}", session.identity.username, session.expires_at);
            self.sessions.delete(&session.id).await?;
            return Err(DomainError::SessionExpired);
        }

        Ok(session)
    }

    /// Idempotent: unknown or malformed tokens are not an error.
    pub async fn logout(&self, token: &str) -> Result<(), DomainError> {
        match SessionToken::parse(token) {
            Some(token) => self.sessions.delete(&token.digest()).await,
            None => Ok(()),
        }
    }

    pub async fn sweep_expired(&self) -> Result<usize, DomainError> {
        let removed = self.sessions.sweep_expired(Utc::now()).await?;
        if removed > 0 {
            info!("Swept {} expired sessions", removed);
        }
        Ok(removed)
    }

    /// Background task running `sweep_expired` every `every`.
    pub fn spawn_sweeper(self: Arc<Self>, every: std::time::Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep_expired().await {
                    error!("Session sweep failed: {}", e);
                }
            }
        })
    }
}

/// True when `identity` may act on resources owned by `owner_username`.
pub fn authorize(identity: &Identity, owner_username: &str) -> bool {
    identity.username == owner_username
}

pub fn require_owner(identity: &Identity, owner_username: &str) -> Result<(), DomainError> {
    if authorize(identity, owner_username) {
        Ok(())
    } else {
        warn!(
            "Authorization denied: {} attempted to act on resources of {}",
            identity.username, owner_username
        );
        Err(DomainError::Forbidden(format!(
            "{} may not act on behalf of {}",
            identity.username, owner_username
        )))
    }
}

pub fn require_role(identity: &Identity, role: Role) -> Result<(), DomainError> {
    if identity.role == role {
        Ok(())
    } else {
        warn!("Authorization denied: {} is not a {}", identity.username, role.as_str());
        Err(DomainError::Forbidden(format!("{} role required", role.as_str())))
    }
}
