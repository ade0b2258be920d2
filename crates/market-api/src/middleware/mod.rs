//! Request middleware

pub mod rate_limit;
pub mod session;

pub use rate_limit::limit_by_client_ip;
pub use session::{clear_session_cookie, require_session, session_cookie};
