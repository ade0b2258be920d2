use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeader,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{info, warn};

use market_api::{build_router, health::ReadinessCheck, AppState};
use market_core::repositories::SessionStore;
use market_core::services::{AuthService, MarketService};
use market_infrastructure::database::connection;
use market_infrastructure::{
    LocalImageStorage, MemorySessionStore, PgOrderRepository, PgProductRepository,
    PgUserRepository, RedisSessionStore,
};
use market_shared::config::{AppConfig, SessionBackend};
use market_shared::telemetry;

mod readiness;

use readiness::{PostgresReadiness, RedisReadiness};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guard = telemetry::init_telemetry(&config.logging)?;

    info!("{} starting (env: {})", config.app.name, config.app.env);
    if config.is_production() && !config.session.cookie_secure {
        warn!("session.cookie_secure is off in production");
    }

    // Database
    let pool = connection::create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Database connection established.");
    if config.database.run_migrations {
        connection::run_migrations(&pool).await?;
    }

    let mut checks: Vec<Arc<dyn ReadinessCheck>> =
        vec![Arc::new(PostgresReadiness::new(pool.clone()))];

    // Session store
    let sessions: Arc<dyn SessionStore> = match config.session.backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::Redis => {
            let store = RedisSessionStore::connect(
                &config.redis.url,
                config.redis.max_connections as usize,
            )?;
            checks.push(Arc::new(RedisReadiness::new(store.clone())));
            Arc::new(store)
        }
    };

    let auth = Arc::new(AuthService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        sessions,
        config.session.ttl_seconds,
    ));

    let images = LocalImageStorage::new(&config.app.upload_dir).await?;
    let market = Arc::new(MarketService::new(
        Arc::new(PgProductRepository::new(pool.clone())),
        Arc::new(PgOrderRepository::new(pool)),
        Arc::new(images),
    ));

    let sweep_every = Duration::from_secs(config.session.sweep_interval_seconds.max(1));
    let _sweeper = auth.clone().spawn_sweeper(sweep_every);
    info!("Session sweeper running every {:?}", sweep_every);

    let state = checks.into_iter().fold(
        AppState::new(
            auth,
            market,
            &config.session,
            config.security.login_attempts_per_minute,
        )?,
        AppState::with_readiness_check,
    );

    let limiter = state.login_limiter.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_every);
        loop {
            ticker.tick().await;
            limiter.retain_recent();
        }
    });

    let app = build_app(state, &config)?;

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// API router plus static client shell, uploaded images, and the HTTP layers.
fn build_app(state: AppState, config: &AppConfig) -> anyhow::Result<Router> {
    let origin: HeaderValue = config
        .app
        .cors_origin
        .parse()
        .context("app.cors_origin is not a valid header value")?;

    // unknown paths fall through to index.html for client-side routing
    let index = Path::new(&config.app.public_dir).join("index.html");
    let client_shell = ServeDir::new(&config.app.public_dir).not_found_service(ServeFile::new(index));

    Ok(build_router(state)
        .nest_service("/files", uploaded_files(&config.app.upload_dir))
        .fallback_service(client_shell)
        .layer(DefaultBodyLimit::max(config.app.max_upload_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        ))
}

/// Uploaded images. Browsers must not second-guess the served type.
fn uploaded_files(dir: impl AsRef<Path>) -> SetResponseHeader<ServeDir, HeaderValue> {
    SetResponseHeader::overriding(
        ServeDir::new(dir),
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_uploaded_files_are_served_with_nosniff() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1-abc-sword.png"), b"\x89PNG\r\n\x1a\n").unwrap();

        let request = Request::builder()
            .uri("/1-abc-sword.png")
            .body(Body::empty())
            .unwrap();
        let response = uploaded_files(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }
}
