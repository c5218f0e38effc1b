use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,
    /// Service identifier
    pub service: String,
    /// Server time (RFC 3339, UTC)
    pub timestamp: String,
    /// Whether a Routes API key is available for provider calls
    pub api_key_configured: bool,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: "commute-api".to_string(),
        timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        api_key_configured: state.routes_client.api_key_configured(),
    };
    tracing::info!(api_key_configured = response.api_key_configured, "Health check");
    Json(response)
}
