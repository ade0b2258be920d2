//! User domain entity

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use validator::Validate;

use super::identity::{Identity, Role};

static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("username pattern is valid")
});

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity::new(self.username.clone(), self.role)
    }
}

/// Account about to be inserted. The credential is already hashed.
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email too long"))]
    pub email: String,

    pub password_hash: String,

    pub role: Role,

    #[validate(length(min = 5, max = 32, message = "Invalid phone number"))]
    pub phone_number: Option<String>,
}

impl NewUser {
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        role: Role,
        phone_number: Option<String>,
    ) -> Result<Self, crate::DomainError> {
        let user = Self {
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            phone_number: phone_number
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        };

        user.validate()?;
        if !USERNAME_PATTERN.is_match(&user.username) {
            return Err(crate::DomainError::ValidationError(
                "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
            ));
        }
        Ok(user)
    }
}
