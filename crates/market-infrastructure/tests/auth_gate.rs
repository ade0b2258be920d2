//! Session gate behaviour against the in-memory store.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use market_core::domain::{Identity, NewUser, Role, Session, User};
use market_core::error::DomainError;
use market_core::repositories::{SessionStore, UserRepository};
use market_core::services::AuthService;
use market_infrastructure::MemorySessionStore;
use market_security::{PasswordService, SessionToken};

const PASSWORD: &str = "violet-tractor-moonlit-47";

#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUsers {
    fn with(accounts: &[(&str, Role)]) -> Self {
        let repo = Self::default();
        {
            let mut users = repo.users.lock().unwrap();
            for (i, (username, role)) in accounts.iter().enumerate() {
                users.insert(
                    username.to_string(),
                    User {
                        id: i as i64 + 1,
                        username: username.to_string(),
                        email: SafeEmail().fake(),
                        password_hash: PasswordService::hash(PASSWORD).unwrap(),
                        role: *role,
                        phone_number: None,
                        created_at: Utc::now(),
                    },
                );
            }
        }
        repo
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().get(username).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.username) {
            return Err(DomainError::UsernameTaken(user.username.clone()));
        }
        let created = User {
            id: users.len() as i64 + 1,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            phone_number: user.phone_number.clone(),
            created_at: Utc::now(),
        };
        users.insert(created.username.clone(), created.clone());
        Ok(created)
    }
}

fn gate(ttl_seconds: i64) -> (AuthService, MemorySessionStore) {
    let users = InMemoryUsers::with(&[("alice", Role::Buyer), ("bob", Role::Seller)]);
    let store = MemorySessionStore::new();
    let auth = AuthService::new(Arc::new(users), Arc::new(store.clone()), ttl_seconds);
    (auth, store)
}

#[tokio::test]
async fn login_then_authenticate_returns_same_identity() {
    let (auth, _) = gate(600);

    let issued = auth.login("bob", PASSWORD).await.unwrap();
    let session = auth.authenticate(issued.token.as_str()).await.unwrap();

    assert_eq!(session.identity, Identity::new("bob", Role::Seller));
    assert!(session.expires_at > Utc::now());
}

#[tokio::test]
async fn two_logins_yield_independent_sessions() {
    let (auth, store) = gate(600);

    let first = auth.login("alice", PASSWORD).await.unwrap();
    let second = auth.login("alice", PASSWORD).await.unwrap();
    assert_ne!(first.token, second.token);
    assert_eq!(store.len(), 2);

    auth.logout(first.token.as_str()).await.unwrap();
    assert!(auth.authenticate(second.token.as_str()).await.is_ok());
}

#[tokio::test]
async fn wrong_credential_creates_no_session() {
    let (auth, store) = gate(600);

    let result = auth.login("alice", "wrong-credential-123").await;
    assert!(matches!(result, Err(DomainError::InvalidCredential)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn never_issued_token_is_no_session() {
    let (auth, _) = gate(600);

    let token = SessionToken::generate();
    let result = auth.authenticate(token.as_str()).await;
    assert!(matches!(result, Err(DomainError::NoSession)));
}

#[tokio::test]
async fn expired_session_reports_expired_then_disappears() {
    let (auth, store) = gate(1);

    let issued = auth.login("alice", PASSWORD).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let first = auth.authenticate(issued.token.as_str()).await;
    assert!(matches!(first, Err(DomainError::SessionExpired)));
    assert!(store.is_empty());

    let second = auth.authenticate(issued.token.as_str()).await;
    assert!(matches!(second, Err(DomainError::NoSession)));
}

#[tokio::test]
async fn logout_invalidates_and_is_idempotent() {
    let (auth, _) = gate(600);

    let issued = auth.login("bob", PASSWORD).await.unwrap();
    auth.logout(issued.token.as_str()).await.unwrap();

    let result = auth.authenticate(issued.token.as_str()).await;
    assert!(matches!(result, Err(DomainError::NoSession)));

    assert!(auth.logout(issued.token.as_str()).await.is_ok());
    assert!(auth.logout("").await.is_ok());
}

#[tokio::test]
async fn sweep_removes_only_expired_sessions() {
    let (auth, store) = gate(600);

    let live = auth.login("bob", PASSWORD).await.unwrap();
    let stale = Session::new(
        SessionToken::generate().digest(),
        Identity::new("alice", Role::Buyer),
        Duration::seconds(-5),
    );
    store.create(&stale).await.unwrap();

    assert_eq!(auth.sweep_expired().await.unwrap(), 1);
    assert_eq!(store.len(), 1);
    assert!(auth.authenticate(live.token.as_str()).await.is_ok());
}

#[tokio::test]
async fn registered_account_can_log_in() {
    let (auth, _) = gate(600);

    let identity = auth
        .register(market_core::services::Registration {
            username: "carol".to_string(),
            email: SafeEmail().fake(),
            credential: "orange-harbor-quietly-93".to_string(),
            role: Role::Buyer,
            phone_number: None,
        })
        .await
        .unwrap();
    assert_eq!(identity, Identity::new("carol", Role::Buyer));

    let issued = auth.login("carol", "orange-harbor-quietly-93").await.unwrap();
    assert_eq!(issued.session.identity, identity);
}
