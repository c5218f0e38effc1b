use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ProviderConfig;

/// Field mask requesting everything; the normalizer picks what it needs
const FIELD_MASK: &str = "*";

#[derive(Debug, Error)]
pub enum RoutesApiError {
    #[error("Routes API key is not configured")]
    MissingApiKey,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No routes found")]
    NoRoutes,
}

/// Which time constraint a query carried, mutually exclusive by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeConstraint {
    Departure(DateTime<Utc>),
    Arrival(DateTime<Utc>),
}

impl TimeConstraint {
    /// Wire name of the constraint field ("departureTime" / "arrivalTime")
    pub fn field_name(&self) -> &'static str {
        match self {
            TimeConstraint::Departure(_) => "departureTime",
            TimeConstraint::Arrival(_) => "arrivalTime",
        }
    }

    pub fn value(&self) -> DateTime<Utc> {
        match self {
            TimeConstraint::Departure(t) | TimeConstraint::Arrival(t) => *t,
        }
    }
}

/// Client for the Routes API v2 computeRoutes endpoint
pub struct RoutesClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RoutesClient {
    pub fn new(config: &ProviderConfig, api_key: Option<String>) -> Result<Self, RoutesApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RoutesApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    pub fn api_key_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch routes between two addresses under the pessimistic traffic model.
    ///
    /// Exactly one time constraint goes on the wire; callers without one get
    /// a departure time of "now", matching the provider's default semantics.
    pub async fn compute_routes(
        &self,
        origin: &str,
        destination: &str,
        time: TimeConstraint,
    ) -> Result<ComputeRoutesResponse, RoutesApiError> {
        let api_key = self.api_key.as_deref().ok_or(RoutesApiError::MissingApiKey)?;

        let start = Instant::now();
        let request_id = Uuid::new_v4();
        let url = format!("{}/directions/v2:computeRoutes", self.base_url);

        let mut body = json!({
            "origin": { "address": origin },
            "destination": { "address": destination },
            "travelMode": "DRIVE",
            "computeAlternativeRoutes": true,
            "routingPreference": "TRAFFIC_AWARE_OPTIMAL",
            "trafficModel": "PESSIMISTIC",
            "polylineQuality": "OVERVIEW",
        });
        body[time.field_name()] = json!(time.value().to_rfc3339());

        tracing::debug!(
            %request_id,
            origin,
            destination,
            time_field = time.field_name(),
            "Calling Routes API"
        );

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%request_id, error = %e, "Routes API request failed");
                if e.is_timeout() {
                    RoutesApiError::Timeout
                } else {
                    RoutesApiError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let response_body = response.text().await.map_err(|e| {
            tracing::warn!(%request_id, error = %e, "Failed to read Routes API body");
            RoutesApiError::Network(e.to_string())
        })?;

        if !(200..300).contains(&status) {
            let message = extract_api_error(&response_body)
                .unwrap_or_else(|| format!("HTTP error: {}", status));
            tracing::warn!(%request_id, status, message, "Routes API returned an error");
            return Err(RoutesApiError::Api { status, message });
        }

        let parsed: ComputeRoutesResponse = serde_json::from_str(&response_body).map_err(|e| {
            tracing::warn!(
                %request_id,
                error = %e,
                body = truncate_for_log(&response_body, 500),
                "Failed to parse Routes API response"
            );
            RoutesApiError::Parse(e.to_string())
        })?;

        tracing::debug!(
            %request_id,
            status,
            routes = parsed.routes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            response_size = response_body.len(),
            "Routes API call completed"
        );

        if parsed.routes.is_empty() {
            return Err(RoutesApiError::NoRoutes);
        }

        Ok(parsed)
    }
}

/// Truncate a body for logging without splitting a multi-byte character
fn truncate_for_log(body: &str, max_bytes: usize) -> &str {
    if body.len() <= max_bytes {
        return body;
    }
    let mut end = max_bytes;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Pull the error message out of a Routes API error body, if present
fn extract_api_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}

// Raw response structures; everything optional since the provider omits
// fields freely depending on the field mask and route contents.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeRoutesResponse {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoute {
    #[serde(default)]
    pub distance_meters: u64,
    pub duration: Option<String>,
    pub static_duration: Option<String>,
    pub polyline: Option<RawPolyline>,
    #[serde(default)]
    pub legs: Vec<RawLeg>,
    pub localized_values: Option<RawLocalizedValues>,
    pub description: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPolyline {
    pub encoded_polyline: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocalizedValues {
    pub distance: Option<RawLocalizedText>,
    pub duration: Option<RawLocalizedText>,
    pub static_duration: Option<RawLocalizedText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLocalizedText {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeg {
    #[serde(default)]
    pub distance_meters: u64,
    pub duration: Option<String>,
    pub static_duration: Option<String>,
    pub start_location: Option<RawLocation>,
    pub end_location: Option<RawLocation>,
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub lat_lng: Option<RawLatLng>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLatLng {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStep {
    #[serde(default)]
    pub distance_meters: u64,
    pub static_duration: Option<String>,
    pub navigation_instruction: Option<RawNavigationInstruction>,
    pub localized_values: Option<RawStepLocalizedValues>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNavigationInstruction {
    pub maneuver: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStepLocalizedValues {
    pub distance: Option<RawLocalizedText>,
    pub static_duration: Option<RawLocalizedText>,
}
