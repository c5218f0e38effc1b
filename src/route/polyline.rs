//! Encoded polyline decoding for map rendering.
//!
//! Implements the standard scheme used by the Routes API: each coordinate
//! delta is zig-zag encoded, split into 5-bit chunks (low bits first, char
//! offset 63, continuation bit 0x20), and scaled by 1e-5 degrees. Points
//! accumulate from (0, 0).

use crate::route::error::RouteError;
use crate::route::model::GeoPoint;

const PRECISION: f64 = 1e5;

/// Decode an encoded polyline into an ordered sequence of points.
///
/// Returns a Format error on a chunk sequence that never terminates before
/// the end of the string, or on a character outside the encoding alphabet.
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoPoint>, RouteError> {
    let mut points = Vec::new();
    let mut chars = encoded.chars();
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    loop {
        let dlat = match next_delta(&mut chars)? {
            Some(d) => d,
            None => break,
        };
        let dlng = next_delta(&mut chars)?.ok_or_else(|| {
            RouteError::Format("truncated polyline: longitude delta missing".into())
        })?;

        lat += dlat;
        lng += dlng;
        points.push(GeoPoint {
            latitude: lat as f64 / PRECISION,
            longitude: lng as f64 / PRECISION,
        });
    }

    Ok(points)
}

/// Read one varint-encoded signed delta. Ok(None) on clean end of input.
fn next_delta(chars: &mut std::str::Chars<'_>) -> Result<Option<i64>, RouteError> {
    let mut value: i64 = 0;
    let mut shift = 0u32;
    let mut started = false;

    loop {
        let c = match chars.next() {
            Some(c) => c,
            None if !started => return Ok(None),
            None => {
                return Err(RouteError::Format(
                    "truncated polyline: chunk sequence does not terminate".into(),
                ))
            }
        };
        started = true;

        let b = c as i64 - 63;
        if !(0..64).contains(&b) {
            return Err(RouteError::Format(format!(
                "invalid polyline character: {:?}",
                c
            )));
        }

        // A delta fits in far fewer chunks than this; anything longer
        // would shift past the i64 width
        if shift >= 64 {
            return Err(RouteError::Format(
                "malformed polyline: chunk sequence is too long".into(),
            ));
        }

        value |= (b & 0x1f) << shift;
        shift += 5;

        if b & 0x20 == 0 {
            break;
        }
    }

    // Undo zig-zag
    let delta = if value & 1 != 0 {
        !(value >> 1)
    } else {
        value >> 1
    };
    Ok(Some(delta))
}

/// Encode a sequence of points with the same scheme decode_polyline reads
pub fn encode_polyline(points: &[GeoPoint]) -> String {
    let mut encoded = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.latitude * PRECISION).round() as i64;
        let lng = (point.longitude * PRECISION).round() as i64;
        encode_delta(lat - prev_lat, &mut encoded);
        encode_delta(lng - prev_lng, &mut encoded);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn encode_delta(delta: i64, out: &mut String) {
    let mut value = if delta < 0 {
        !(delta << 1) as u64
    } else {
        (delta << 1) as u64
    };

    while value >= 0x20 {
        out.push(((0x20 | (value & 0x1f)) as u8 + 63) as char);
        value >>= 5;
    }
    out.push((value as u8 + 63) as char);
}

/// Arithmetic mean of the points' latitudes and longitudes, for map framing.
/// An empty sequence centers on (0, 0).
pub fn path_center(points: &[GeoPoint]) -> GeoPoint {
    if points.is_empty() {
        return GeoPoint::ORIGIN;
    }
    let n = points.len() as f64;
    GeoPoint {
        latitude: points.iter().map(|p| p.latitude).sum::<f64>() / n,
        longitude: points.iter().map(|p| p.longitude).sum::<f64>() / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference example from the polyline encoding documentation
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-5, "expected {} ~ {}", a, b);
    }

    #[test]
    fn decode_reference_polyline() {
        let points = decode_polyline(REFERENCE).unwrap();
        assert_eq!(points.len(), 3);
        assert_close(points[0].latitude, 38.5);
        assert_close(points[0].longitude, -120.2);
        assert_close(points[1].latitude, 40.7);
        assert_close(points[1].longitude, -120.95);
        assert_close(points[2].latitude, 43.252);
        assert_close(points[2].longitude, -126.453);
    }

    #[test]
    fn decode_empty_string() {
        assert!(decode_polyline("").unwrap().is_empty());
    }

    #[test]
    fn decode_is_deterministic() {
        let a = decode_polyline(REFERENCE).unwrap();
        let b = decode_polyline(REFERENCE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decode_truncated_chunk_fails() {
        // '_' has the continuation bit set, so a lone one never terminates
        let err = decode_polyline("_").unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn decode_overlong_chunk_sequence_fails() {
        // '~' always sets the continuation bit; enough of them would
        // shift past the width of the accumulator
        let err = decode_polyline(&"~".repeat(14)).unwrap_err();
        assert!(matches!(err, RouteError::Format(_)));
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn decode_missing_longitude_fails() {
        // A single complete delta leaves the longitude of the pair missing
        let err = decode_polyline("?").unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn decode_invalid_character_fails() {
        // ' ' (0x20) is below the encoding alphabet's offset of 63
        let err = decode_polyline("_p~iF ~ps|U").unwrap_err();
        assert!(err.to_string().contains("invalid polyline character"));
    }

    #[test]
    fn encode_decode_round_trip() {
        let points = decode_polyline(REFERENCE).unwrap();
        let re_encoded = encode_polyline(&points);
        let decoded = decode_polyline(&re_encoded).unwrap();
        assert_eq!(decoded.len(), points.len());
        for (a, b) in decoded.iter().zip(points.iter()) {
            assert_close(a.latitude, b.latitude);
            assert_close(a.longitude, b.longitude);
        }
    }

    #[test]
    fn encode_reference_points() {
        let points = [
            GeoPoint { latitude: 38.5, longitude: -120.2 },
            GeoPoint { latitude: 40.7, longitude: -120.95 },
            GeoPoint { latitude: 43.252, longitude: -126.453 },
        ];
        assert_eq!(encode_polyline(&points), REFERENCE);
    }

    #[test]
    fn center_of_empty_is_origin() {
        let center = path_center(&[]);
        assert_eq!(center.latitude, 0.0);
        assert_eq!(center.longitude, 0.0);
    }

    #[test]
    fn center_is_componentwise_mean() {
        let points = [
            GeoPoint { latitude: 10.0, longitude: -20.0 },
            GeoPoint { latitude: 30.0, longitude: -40.0 },
        ];
        let center = path_center(&points);
        assert_close(center.latitude, 20.0);
        assert_close(center.longitude, -30.0);
    }
}
