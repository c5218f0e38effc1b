use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A geographic point in WGS84 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const ORIGIN: GeoPoint = GeoPoint {
        latitude: 0.0,
        longitude: 0.0,
    };
}

/// Human-readable labels for a route's distance and durations.
/// Taken from the provider's localized text when available,
/// otherwise generated from the numeric fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocalizedText {
    pub distance: String,
    pub duration: String,
    pub static_duration: String,
}

/// Recommended departure for a target arrival time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct DeparturePlan {
    /// Latest departure time that still meets the target arrival
    pub departure: DateTime<Utc>,
    /// Whether that departure time has already passed
    pub is_late: bool,
}

/// A single maneuver-level instruction within a leg
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Step {
    pub distance_meters: u64,
    pub static_duration_seconds: u64,
    /// Direction instruction, never empty ("Proceed" when the provider gave none)
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_duration: Option<String>,
}

/// One continuous segment of a route, typically between waypoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Leg {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub start_location: GeoPoint,
    pub end_location: GeoPoint,
    pub steps: Vec<Step>,
}

/// A display-ready route as served to the UI
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Route {
    pub distance_meters: u64,
    /// Traffic-aware duration in seconds (pessimistic model)
    pub duration_seconds: u64,
    /// Duration in seconds without traffic
    pub static_duration_seconds: u64,
    /// Encoded overview polyline for map rendering
    pub encoded_path: String,
    /// Map-framing center: mean of the decoded polyline points
    pub center: GeoPoint,
    pub legs: Vec<Leg>,
    pub localized: LocalizedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Present when the query carried a target arrival time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_plan: Option<DeparturePlan>,
}
