// ============================================================================
// Market Core - Identity
// File: crates/market-core/src/domain/identity.rs
// Description: Authenticated principal attached to a request
// ============================================================================

use serde::{Deserialize, Serialize};

/// Account role. Sellers list products and receive orders, buyers place orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }

    /// Case-insensitive, surrounding whitespace ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "buyer" => Some(Role::Buyer),
            "seller" => Some(Role::Seller),
            _ => None,
        }
    }
}

/// Derived read-only from a live session and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::parse("Seller"), Some(Role::Seller));
        assert_eq!(Role::parse(" buyer "), Some(Role::Buyer));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::Seller.as_str(), "seller");
    }

    #[test]
    fn test_identity_serializes_role_lowercase() {
        let json = serde_json::to_string(&Identity::new("bob", Role::Seller)).unwrap();
        assert_eq!(json, r#"{"username":"bob","role":"seller"}"#);
    }
}
