//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;
use crate::constants::{
    DEFAULT_LOGIN_ATTEMPTS_PER_MINUTE, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SESSION_COOKIE,
    DEFAULT_SESSION_SWEEP_INTERVAL_SECS, DEFAULT_SESSION_TTL_SECS,
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub redis: RedisSettings,
    pub security: SecuritySettings,
    pub logging: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Client application shell (index.html, assets).
    pub public_dir: String,
    /// Where uploaded product images are written. Served under `/files`.
    pub upload_dir: String,
    pub cors_origin: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub ttl_seconds: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub backend: SessionBackend,
    pub sweep_interval_seconds: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_SESSION_TTL_SECS,
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            cookie_secure: false,
            backend: SessionBackend::Memory,
            sweep_interval_seconds: DEFAULT_SESSION_SWEEP_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecuritySettings {
    pub login_attempts_per_minute: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub json: bool,
    /// Daily-rolling log files are written here when set.
    pub file_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 5000)?
            .set_default("app.name", "market-server")?
            .set_default("app.public_dir", "public")?
            .set_default("app.upload_dir", "public/files")?
            .set_default("app.cors_origin", "http://localhost:3000")?
            .set_default("app.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.run_migrations", true)?
            .set_default("session.ttl_seconds", DEFAULT_SESSION_TTL_SECS)?
            .set_default("session.cookie_name", DEFAULT_SESSION_COOKIE)?
            .set_default("session.cookie_secure", false)?
            .set_default("session.backend", "memory")?
            .set_default(
                "session.sweep_interval_seconds",
                DEFAULT_SESSION_SWEEP_INTERVAL_SECS as i64,
            )?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("redis.max_connections", 16)?
            .set_default(
                "security.login_attempts_per_minute",
                DEFAULT_LOGIN_ATTEMPTS_PER_MINUTE as i64,
            )?
            .set_default("logging.json", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}
