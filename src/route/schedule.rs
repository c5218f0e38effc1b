//! Departure back-calculation from a target arrival time.

use chrono::{DateTime, Duration, Utc};

use crate::route::error::RouteError;
use crate::route::model::DeparturePlan;

/// Parse a provider duration string of the form "<integer>s" into seconds.
///
/// The provider documents durations as a non-negative integer with an "s"
/// suffix; anything else is a Format error.
pub fn parse_duration_secs(raw: &str) -> Result<u64, RouteError> {
    let digits = raw
        .strip_suffix('s')
        .ok_or_else(|| RouteError::Format(format!("duration missing 's' suffix: {:?}", raw)))?;

    digits
        .parse::<u64>()
        .map_err(|_| RouteError::Format(format!("duration is not a non-negative integer: {:?}", raw)))
}

/// Compute the latest departure that still meets `target_arrival`, given the
/// route's duration. `is_late` is set when that departure is already in the
/// past relative to `now`.
///
/// A duration that cannot be represented as a time delta, or that pushes the
/// departure outside the representable date range, is a Format error; the
/// grammar alone does not bound what the provider may send.
pub fn compute_departure(
    target_arrival: DateTime<Utc>,
    duration_secs: u64,
    now: DateTime<Utc>,
) -> Result<DeparturePlan, RouteError> {
    let departure = i64::try_from(duration_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|d| target_arrival.checked_sub_signed(d))
        .ok_or_else(|| {
            RouteError::Format(format!("route duration out of range: {}s", duration_secs))
        })?;

    Ok(DeparturePlan {
        departure,
        is_late: departure < now,
    })
}
