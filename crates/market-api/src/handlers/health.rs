use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    status: String,
    checks: BTreeMap<String, String>,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// 503 as soon as any dependency fails its probe.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let mut ready = true;
    let mut checks = BTreeMap::new();

    for check in &state.readiness {
        let outcome = match check.check().await {
            Ok(()) => "ok".to_string(),
            Err(e) => {
                warn!("Readiness check {} failed: {}", check.name(), e);
                ready = false;
                e
            }
        };
        checks.insert(check.name().to_string(), outcome);
    }

    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (status, Json(ReadinessResponse { status: label.to_string(), checks }))
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .gather()
        .map_err(|e| ApiError::InternalError(format!("metrics encoding: {}", e)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
