use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::providers::google::RoutesApiError;
use crate::route::RouteError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn respond(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    respond(StatusCode::BAD_REQUEST, message)
}

/// Map a provider error to the client-facing response. Transport and
/// contract failures are collapsed into generic messages; provider-reported
/// errors are passed through verbatim.
pub fn from_provider_error(err: &RoutesApiError) -> ApiError {
    match err {
        RoutesApiError::MissingApiKey => {
            respond(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        RoutesApiError::Timeout | RoutesApiError::Network(_) => respond(
            StatusCode::BAD_GATEWAY,
            "Routing service is unreachable, try again later",
        ),
        RoutesApiError::Api { .. } => respond(StatusCode::BAD_GATEWAY, err.to_string()),
        RoutesApiError::Parse(_) => respond(
            StatusCode::BAD_GATEWAY,
            "Routing service returned an unexpected response",
        ),
        RoutesApiError::NoRoutes => respond(StatusCode::NOT_FOUND, err.to_string()),
    }
}

/// Map a normalization error. Validation here means the provider payload
/// broke the contract, so it surfaces as an upstream failure, not a 400.
pub fn from_route_error(err: &RouteError) -> ApiError {
    match err {
        RouteError::Validation(_) | RouteError::Format(_) => respond(
            StatusCode::BAD_GATEWAY,
            "Routing service returned an unexpected response",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_service_unavailable() {
        let (status, body) = from_provider_error(&RoutesApiError::MissingApiKey);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.success);
    }

    #[test]
    fn timeout_hides_details() {
        let (status, body) = from_provider_error(&RoutesApiError::Timeout);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.error.contains("try again later"));
    }

    #[test]
    fn api_error_passes_provider_message_through() {
        let err = RoutesApiError::Api {
            status: 403,
            message: "The provided API key is invalid.".into(),
        };
        let (status, body) = from_provider_error(&err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.error.contains("The provided API key is invalid."));
    }

    #[test]
    fn no_routes_is_not_found() {
        let (status, _) = from_provider_error(&RoutesApiError::NoRoutes);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn format_error_is_a_generic_upstream_failure() {
        let err = RouteError::Format("truncated polyline".into());
        let (status, body) = from_route_error(&err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.error.contains("polyline"));
    }
}
