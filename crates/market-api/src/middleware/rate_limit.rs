//! Per-client throttling for credential endpoints

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::warn;

use crate::error::ApiError;
use crate::metrics::AuthEvent;
use crate::state::AppState;

/// Keys the limiter by peer address. Requests without connection info
/// (in-process callers) share one bucket.
pub async fn limit_by_client_ip(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if state.login_limiter.check_key(&ip).is_err() {
        warn!("Credential attempts from {} exceeded the limit", ip);
        state.metrics.record_auth(AuthEvent::Rejected);
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(request).await)
}
