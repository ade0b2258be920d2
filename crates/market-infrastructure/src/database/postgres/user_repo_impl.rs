// ============================================================================
// Market Infrastructure - PostgreSQL User Repository
// File: crates/market-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use market_core::domain::{NewUser, Role, User};
use market_core::error::DomainError;
use market_core::repositories::UserRepository;

use super::storage_failure;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| {
            error!("User {} has unknown role {:?}", row.username, row.role);
            DomainError::StorageFailure(format!("unknown role for user {}", row.id))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            phone_number: row.phone_number,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, role, phone_number, created_at
            FROM users
            WHERE username = $1
            "#
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_failure("finding user by username", e))?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        info!("Creating {} account: {}", user.role.as_str(), user.username);

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash, role, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, role, phone_number, created_at
            "#
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::UsernameTaken(user.username.clone())
            }
            _ => storage_failure("creating user", e),
        })?;

        info!("User created successfully: {}", row.id);
        User::try_from(row)
    }
}
