//! Maps the provider's raw route payload into the display model.

use crate::providers::google::{RawLeg, RawLocation, RawRoute, RawStep};
use crate::route::error::RouteError;
use crate::route::format::{format_distance, format_duration};
use crate::route::model::{GeoPoint, Leg, LocalizedText, Route, Step};
use crate::route::polyline::{decode_polyline, path_center};
use crate::route::schedule::parse_duration_secs;

/// Instruction shown when the provider gave no navigation text for a step
const DEFAULT_INSTRUCTION: &str = "Proceed";

/// Normalize one raw provider route into a display-ready `Route`.
///
/// Numeric fields are preserved verbatim; labels come from the provider's
/// localized text when present and are generated otherwise. Fails with a
/// Validation error when the payload lacks legs or an encoded polyline,
/// and with a Format error when a duration or the polyline is malformed.
pub fn normalize_route(raw: &RawRoute) -> Result<Route, RouteError> {
    let encoded_path = raw
        .polyline
        .as_ref()
        .and_then(|p| p.encoded_polyline.as_deref())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| RouteError::Validation("route is missing an encoded polyline".into()))?;

    if raw.legs.is_empty() {
        return Err(RouteError::Validation("route has no legs".into()));
    }

    let duration_seconds = parse_optional_duration(raw.duration.as_deref())?;
    let static_duration_seconds = parse_optional_duration(raw.static_duration.as_deref())?;

    let localized = raw.localized_values.as_ref();
    let localized = LocalizedText {
        distance: localized
            .and_then(|v| v.distance.as_ref())
            .and_then(|t| t.text.clone())
            .unwrap_or_else(|| format_distance(raw.distance_meters)),
        duration: localized
            .and_then(|v| v.duration.as_ref())
            .and_then(|t| t.text.clone())
            .unwrap_or_else(|| format_duration(duration_seconds)),
        static_duration: localized
            .and_then(|v| v.static_duration.as_ref())
            .and_then(|t| t.text.clone())
            .unwrap_or_else(|| format_duration(static_duration_seconds)),
    };

    let points = decode_polyline(encoded_path)?;
    let legs = raw
        .legs
        .iter()
        .map(normalize_leg)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route {
        distance_meters: raw.distance_meters,
        duration_seconds,
        static_duration_seconds,
        encoded_path: encoded_path.to_owned(),
        center: path_center(&points),
        legs,
        localized,
        summary: raw.description.clone().filter(|s| !s.is_empty()),
        departure_plan: None,
    })
}

fn normalize_leg(raw: &RawLeg) -> Result<Leg, RouteError> {
    Ok(Leg {
        distance_meters: raw.distance_meters,
        duration_seconds: parse_optional_duration(raw.duration.as_deref())?,
        start_location: location_point(raw.start_location.as_ref()),
        end_location: location_point(raw.end_location.as_ref()),
        steps: raw
            .steps
            .iter()
            .map(normalize_step)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn normalize_step(raw: &RawStep) -> Result<Step, RouteError> {
    let nav = raw.navigation_instruction.as_ref();
    let instruction = nav
        .and_then(|n| n.instructions.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_INSTRUCTION.to_owned());

    let localized = raw.localized_values.as_ref();

    Ok(Step {
        distance_meters: raw.distance_meters,
        static_duration_seconds: parse_optional_duration(raw.static_duration.as_deref())?,
        instruction,
        maneuver: nav.and_then(|n| n.maneuver.clone()),
        localized_distance: localized
            .and_then(|v| v.distance.as_ref())
            .and_then(|t| t.text.clone()),
        localized_duration: localized
            .and_then(|v| v.static_duration.as_ref())
            .and_then(|t| t.text.clone()),
    })
}

/// Absent durations normalize to zero; present ones must parse
fn parse_optional_duration(raw: Option<&str>) -> Result<u64, RouteError> {
    raw.map(parse_duration_secs).transpose().map(Option::unwrap_or_default)
}

fn location_point(raw: Option<&RawLocation>) -> GeoPoint {
    raw.and_then(|l| l.lat_lng.as_ref())
        .map(|ll| GeoPoint {
            latitude: ll.latitude.unwrap_or(0.0),
            longitude: ll.longitude.unwrap_or(0.0),
        })
        .unwrap_or(GeoPoint::ORIGIN)
}
