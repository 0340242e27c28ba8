//! System endpoints: health check, category catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::Category;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    events: Option<u64>,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health, version, current timestamp and the stored event count. Reports `degraded` when the store cannot be read.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store unavailable", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.event_service.count().await;
    let (status, label) = match &count {
        Ok(_) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach store");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };
    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            events: count.ok(),
        }),
    )
}

/// `GET /config/categories`: List accepted categories.
#[utoipa::path(
    get,
    path = "/config/categories",
    tag = "System",
    summary = "List categories",
    description = "Returns the closed set of values accepted for `category`.",
    responses(
        (status = 200, description = "Category catalog", body = Vec<Category>),
    )
)]
pub async fn categories_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(Category::ALL.to_vec()))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/categories", get(categories_handler))
}
