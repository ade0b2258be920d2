use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use market_core::services::{AuthService, MarketService};
use market_shared::config::SessionSettings;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::health::ReadinessCheck;
use crate::metrics::Metrics;

pub type LoginLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// Session cookie attributes. The value is always the opaque token.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
    pub max_age_seconds: i64,
}

impl From<&SessionSettings> for CookieSettings {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            name: settings.cookie_name.clone(),
            secure: settings.cookie_secure,
            max_age_seconds: settings.ttl_seconds,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub market: Arc<MarketService>,
    pub cookie: CookieSettings,
    pub login_limiter: Arc<LoginLimiter>,
    pub metrics: Arc<Metrics>,
    pub readiness: Vec<Arc<dyn ReadinessCheck>>,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        market: Arc<MarketService>,
        session: &SessionSettings,
        login_attempts_per_minute: u32,
    ) -> Result<Self, prometheus::Error> {
        let per_minute = NonZeroU32::new(login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            auth,
            market,
            cookie: CookieSettings::from(session),
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
            metrics: Arc::new(Metrics::new("market")?),
            readiness: Vec::new(),
        })
    }

    pub fn with_readiness_check(mut self, check: Arc<dyn ReadinessCheck>) -> Self {
        self.readiness.push(check);
        self
    }
}
