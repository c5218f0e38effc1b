pub mod error;
pub mod health;
pub mod routes;

pub use error::ErrorResponse;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::providers::google::RoutesClient;
use crate::route::session::FetchTracker;

#[derive(Clone)]
pub struct AppState {
    /// Shared client for the Routes API provider
    pub routes_client: Arc<RoutesClient>,
    /// Issues monotonically increasing tokens for route fetches so clients
    /// can discard responses superseded by a newer submission
    pub fetch_tracker: Arc<FetchTracker>,
}

pub fn router(routes_client: Arc<RoutesClient>) -> Router {
    let state = AppState {
        routes_client,
        fetch_tracker: Arc::new(FetchTracker::new()),
    };
    Router::new()
        .route("/health", get(health::health_check))
        .route("/routes", post(routes::compute_routes))
        .route("/routes/formatted", post(routes::compute_routes_formatted))
        .with_state(state)
}
