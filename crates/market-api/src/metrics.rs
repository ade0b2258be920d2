//! Prometheus metrics

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Instant;

use crate::state::AppState;

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Outcome labels for `auth_events_total`.
#[derive(Debug, Clone, Copy)]
pub enum AuthEvent {
    LoginSuccess,
    LoginFailure,
    Logout,
    Register,
    Rejected,
}

impl AuthEvent {
    fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::LoginSuccess => "login_success",
            AuthEvent::LoginFailure => "login_failure",
            AuthEvent::Logout => "logout",
            AuthEvent::Register => "register",
            AuthEvent::Rejected => "rejected",
        }
    }
}

pub struct Metrics {
    http_requests_total: IntCounterVec,
    http_request_duration: HistogramVec,
    auth_events_total: IntCounterVec,
    registry: Registry,
}

impl Metrics {
    pub fn new(service_name: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests")
                .const_label("service", service_name),
            &["method", "path", "status"],
        )?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Histogram of HTTP request latency",
            )
            .const_label("service", service_name)
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "path"],
        )?;

        let auth_events_total = IntCounterVec::new(
            Opts::new("auth_events_total", "Authentication events by outcome")
                .const_label("service", service_name),
            &["event"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(auth_events_total.clone()))?;

        Ok(Self {
            http_requests_total,
            http_request_duration,
            auth_events_total,
            registry,
        })
    }

    pub fn record_http(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    pub fn record_auth(&self, event: AuthEvent) {
        self.auth_events_total.with_label_values(&[event.as_str()]).inc();
    }

    /// Text exposition format for `/metrics`.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Records count and latency per matched route.
pub async fn track_http(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    state.metrics.record_http(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}
