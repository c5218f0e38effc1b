use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{self, ApiError, ErrorResponse};
use crate::providers::google::{ComputeRoutesResponse, TimeConstraint};
use crate::route::format::format_route_output;
use crate::route::model::Route;
use crate::route::normalize::normalize_route;
use crate::route::schedule::compute_departure;
use crate::route::RouteError;

use super::AppState;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RouteRequest {
    /// Starting address
    pub origin: String,
    /// Destination address
    pub destination: String,
    /// Departure time (RFC 3339); mutually exclusive with arrival_time
    pub departure_time: Option<String>,
    /// Target arrival time (RFC 3339); mutually exclusive with departure_time
    pub arrival_time: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestParams {
    pub origin: String,
    pub destination: String,
    pub has_departure_time: bool,
    pub has_arrival_time: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiMetadata {
    /// Server time the response was produced (RFC 3339, UTC)
    pub timestamp: String,
    pub routes_count: usize,
    /// Monotonically increasing per-server token; a client that issued a
    /// newer submission should discard any response with an older token
    pub request_token: u64,
    pub request_params: RequestParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoutesResponse {
    pub success: bool,
    /// Which time constraint was sent to the provider
    pub time_field: String,
    /// The constraint's value (RFC 3339)
    pub time_value: String,
    pub routes: Vec<Route>,
    pub api_metadata: ApiMetadata,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormattedRoutesResponse {
    /// Human-readable text rendering of the routes
    pub formatted_text: String,
    pub raw_data: RoutesResponse,
    pub timestamp: String,
}

/// Check the query invariants and resolve the time constraint that goes to
/// the provider. Departure and arrival times are mutually exclusive; when
/// neither is given the provider gets "now" as the departure time. Runs
/// before any network call.
fn resolve_query(
    request: &RouteRequest,
    now: DateTime<Utc>,
) -> Result<TimeConstraint, RouteError> {
    if request.origin.trim().is_empty() {
        return Err(RouteError::Validation("origin must not be empty".into()));
    }
    if request.destination.trim().is_empty() {
        return Err(RouteError::Validation("destination must not be empty".into()));
    }

    match (&request.departure_time, &request.arrival_time) {
        (Some(_), Some(_)) => Err(RouteError::Validation(
            "departure_time and arrival_time are mutually exclusive; provide at most one".into(),
        )),
        (Some(departure), None) => Ok(TimeConstraint::Departure(parse_timestamp(
            departure,
            "departure_time",
        )?)),
        (None, Some(arrival)) => Ok(TimeConstraint::Arrival(parse_timestamp(
            arrival,
            "arrival_time",
        )?)),
        (None, None) => Ok(TimeConstraint::Departure(now)),
    }
}

fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>, RouteError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RouteError::Validation(format!("{} is not a valid RFC 3339 timestamp: {}", field, e)))
}

/// Normalize every provider route and, when the query targeted an arrival
/// time, attach the back-calculated departure plan to each one.
fn assemble_routes(
    raw: &ComputeRoutesResponse,
    time: TimeConstraint,
    now: DateTime<Utc>,
) -> Result<Vec<Route>, RouteError> {
    raw.routes
        .iter()
        .map(|raw_route| {
            let mut route = normalize_route(raw_route)?;
            if let TimeConstraint::Arrival(target) = time {
                route.departure_plan =
                    Some(compute_departure(target, route.duration_seconds, now)?);
            }
            Ok(route)
        })
        .collect()
}

async fn build_response(
    state: &AppState,
    request: &RouteRequest,
) -> Result<RoutesResponse, ApiError> {
    let now = Utc::now();
    let token = state.fetch_tracker.begin();
    let time = resolve_query(request, now).map_err(|e| {
        tracing::info!(error = %e, "Rejected route query");
        error::bad_request(e.to_string())
    })?;

    let raw = state
        .routes_client
        .compute_routes(&request.origin, &request.destination, time)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Route computation failed");
            error::from_provider_error(&e)
        })?;

    let routes = assemble_routes(&raw, time, now).map_err(|e| {
        tracing::warn!(error = %e, "Provider payload failed normalization");
        error::from_route_error(&e)
    })?;

    if !state.fetch_tracker.is_current(token) {
        tracing::info!(
            token = token.value(),
            "A newer submission superseded this fetch while it was in flight"
        );
    }

    tracing::info!(
        routes = routes.len(),
        time_field = time.field_name(),
        token = token.value(),
        "Route calculation completed"
    );

    Ok(RoutesResponse {
        success: true,
        time_field: time.field_name().to_string(),
        time_value: time.value().to_rfc3339(),
        api_metadata: ApiMetadata {
            timestamp: Utc::now().to_rfc3339(),
            routes_count: routes.len(),
            request_token: token.value(),
            request_params: RequestParams {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
                has_departure_time: request.departure_time.is_some(),
                has_arrival_time: request.arrival_time.is_some(),
            },
        },
        routes,
    })
}

/// Calculate routes between an origin and a destination
#[utoipa::path(
    post,
    path = "/routes",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Computed routes", body = RoutesResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 404, description = "No routes found", body = ErrorResponse),
        (status = 502, description = "Routing provider failure", body = ErrorResponse),
        (status = 503, description = "API key not configured", body = ErrorResponse)
    ),
    tag = "routes"
)]
pub async fn compute_routes(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RoutesResponse>, ApiError> {
    tracing::info!(
        origin = %request.origin,
        destination = %request.destination,
        departure_time = ?request.departure_time,
        arrival_time = ?request.arrival_time,
        "Route calculation requested"
    );
    build_response(&state, &request).await.map(Json)
}

/// Calculate routes and return a human-readable text report alongside the data
#[utoipa::path(
    post,
    path = "/routes/formatted",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Computed routes with text report", body = FormattedRoutesResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 502, description = "Routing provider failure", body = ErrorResponse)
    ),
    tag = "routes"
)]
pub async fn compute_routes_formatted(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<FormattedRoutesResponse>, ApiError> {
    tracing::info!(
        origin = %request.origin,
        destination = %request.destination,
        "Formatted route calculation requested"
    );
    let response = build_response(&state, &request).await?;
    let formatted_text =
        format_route_output(&response.routes, &response.time_field, &response.time_value);

    Ok(Json(FormattedRoutesResponse {
        formatted_text,
        raw_data: response,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn request(departure: Option<&str>, arrival: Option<&str>) -> RouteRequest {
        RouteRequest {
            origin: "612 N St Asaph St, Alexandria, VA".into(),
            destination: "1850 N Moore St, Arlington, VA".into(),
            departure_time: departure.map(str::to_owned),
            arrival_time: arrival.map(str::to_owned),
        }
    }

    #[test]
    fn both_times_set_is_rejected_before_any_network_call() {
        let req = request(Some("2024-01-15T08:00:00Z"), Some("2024-01-15T09:00:00Z"));
        let err = resolve_query(&req, Utc::now()).unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)));
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn empty_origin_is_rejected() {
        let mut req = request(None, None);
        req.origin = "   ".into();
        let err = resolve_query(&req, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("origin"));
    }

    #[test]
    fn empty_destination_is_rejected() {
        let mut req = request(None, None);
        req.destination = String::new();
        let err = resolve_query(&req, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let req = request(Some("yesterday at noon"), None);
        let err = resolve_query(&req, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("departure_time"));
    }

    #[test]
    fn no_time_defaults_to_departing_now() {
        let now = utc("2024-01-15T07:00:00Z");
        let time = resolve_query(&request(None, None), now).unwrap();
        assert_eq!(time, TimeConstraint::Departure(now));
    }

    #[test]
    fn arrival_time_resolves_to_arrival_constraint() {
        let time = resolve_query(&request(None, Some("2024-01-15T09:00:00Z")), Utc::now()).unwrap();
        assert_eq!(
            time,
            TimeConstraint::Arrival(utc("2024-01-15T09:00:00Z"))
        );
    }

    fn provider_fixture() -> ComputeRoutesResponse {
        serde_json::from_str(
            r#"{
                "routes": [{
                    "distanceMeters": 14200,
                    "duration": "1800s",
                    "staticDuration": "1500s",
                    "polyline": { "encodedPolyline": "_p~iF~ps|U_ulLnnqC" },
                    "legs": [{ "distanceMeters": 14200, "duration": "1800s" }]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn arrival_query_attaches_departure_plan() {
        // Arrive by 09:00 with a 30 minute route -> leave by 08:30
        let arrival = utc("2024-01-15T09:00:00Z");
        let now = utc("2024-01-15T08:45:00Z");
        let routes =
            assemble_routes(&provider_fixture(), TimeConstraint::Arrival(arrival), now).unwrap();

        let plan = routes[0].departure_plan.unwrap();
        assert_eq!(plan.departure, utc("2024-01-15T08:30:00Z"));
        assert!(plan.is_late);
    }

    #[test]
    fn arrival_query_not_late_when_evaluated_early() {
        let arrival = utc("2024-01-15T09:00:00Z");
        let now = utc("2024-01-15T08:00:00Z");
        let routes =
            assemble_routes(&provider_fixture(), TimeConstraint::Arrival(arrival), now).unwrap();
        assert!(!routes[0].departure_plan.unwrap().is_late);
    }

    #[test]
    fn absurd_provider_duration_is_an_error_not_a_crash() {
        let raw: ComputeRoutesResponse = serde_json::from_str(
            r#"{
                "routes": [{
                    "distanceMeters": 14200,
                    "duration": "10000000000000000000s",
                    "polyline": { "encodedPolyline": "_p~iF~ps|U" },
                    "legs": [{ "distanceMeters": 14200 }]
                }]
            }"#,
        )
        .unwrap();

        let arrival = utc("2024-01-15T09:00:00Z");
        let now = utc("2024-01-15T08:00:00Z");
        let err = assemble_routes(&raw, TimeConstraint::Arrival(arrival), now).unwrap_err();
        assert!(matches!(err, RouteError::Format(_)));
    }

    #[test]
    fn departure_query_has_no_departure_plan() {
        let now = utc("2024-01-15T08:00:00Z");
        let routes =
            assemble_routes(&provider_fixture(), TimeConstraint::Departure(now), now).unwrap();
        assert!(routes[0].departure_plan.is_none());
    }
}
