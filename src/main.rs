pub mod api;
mod config;
mod providers;
mod route;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use providers::google::RoutesClient;

#[derive(OpenApi)]
#[openapi(
    info(title = "Commute API", version = "0.1.0"),
    paths(
        api::health::health_check,
        api::routes::compute_routes,
        api::routes::compute_routes_formatted,
    ),
    components(schemas(
        api::ErrorResponse,
        api::health::HealthResponse,
        api::routes::RouteRequest,
        api::routes::RoutesResponse,
        api::routes::FormattedRoutesResponse,
        api::routes::ApiMetadata,
        api::routes::RequestParams,
        route::model::Route,
        route::model::Leg,
        route::model::Step,
        route::model::GeoPoint,
        route::model::LocalizedText,
        route::model::DeparturePlan,
    )),
    tags(
        (name = "routes", description = "Commute route calculation"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");
    tracing::info!(bind = %config.bind, provider = %config.provider.base_url, "Loaded configuration");

    // Resolve the provider API key; the server starts without one, but
    // route requests will fail until it is configured
    let api_key = config.resolve_api_key();
    match &api_key {
        Some(key) => tracing::info!(key_length = key.len(), "Routes API key configured"),
        None => tracing::warn!("GMAPS_API_KEY is not set; route requests will fail"),
    }

    // Build CORS layer based on config
    let cors_layer = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode explicitly enabled (all origins allowed) - DO NOT USE IN PRODUCTION");
        CorsLayer::permissive()
    } else if !config.cors_origins.is_empty() {
        tracing::info!(origins = ?config.cors_origins, "CORS: Restricting to configured origins");
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        panic!("CORS configuration error: Either set 'cors_origins' with allowed origins, or set 'cors_permissive: true' for development");
    };

    let routes_client = Arc::new(
        RoutesClient::new(&config.provider, api_key).expect("Failed to build Routes API client"),
    );

    // Build the app
    let app = Router::new()
        .route("/", get(root))
        .merge(api::router(routes_client))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Server running on http://{}", config.bind);
    tracing::info!("Swagger UI: http://{}/swagger-ui", config.bind);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Commute Estimation API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "docs": "/swagger-ui",
            "routes": "/routes",
            "health": "/health"
        },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
