//! # Market Security
//! 
//! Security utilities: password hashing, credential strength, session tokens.

pub mod password;
pub mod token;

pub use password::{PasswordError, PasswordService};
pub use token::SessionToken;
