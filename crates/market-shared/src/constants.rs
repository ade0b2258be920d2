//! Application-wide constants

/// Session lifetime; the client cookie max-age uses the same value.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 600;
pub const DEFAULT_SESSION_COOKIE: &str = "sid";
pub const DEFAULT_SESSION_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_LOGIN_ATTEMPTS_PER_MINUTE: u32 = 10;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_IMAGE_NAME_LENGTH: usize = 100;
