//! Human-readable labels and the plain-text route report.

use std::fmt::Write;

use crate::route::model::Route;

/// Format a duration in seconds as a compact "1h 23m 45s" style label
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{}s", secs));
    }

    parts.join(" ")
}

/// Format a distance in meters, switching to kilometers at 1 km
pub fn format_distance(meters: u64) -> String {
    if meters >= 1000 {
        format!("{:.1} km", meters as f64 / 1000.0)
    } else {
        format!("{} m", meters)
    }
}

/// Render routes as a plain-text report, mirroring the JSON response
/// for clients that want something human-readable.
pub fn format_route_output(routes: &[Route], time_field: &str, time_value: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Routes ({} found) - pessimistic traffic model", routes.len());
    let _ = writeln!(out, "  Reference: {} = {}", time_field, time_value);
    out.push('\n');

    for (i, route) in routes.iter().enumerate() {
        let _ = writeln!(out, "Route {}:", i + 1);
        let _ = writeln!(
            out,
            "  Distance: {} ({}m)",
            route.localized.distance, route.distance_meters
        );
        let _ = writeln!(out, "  Duration (worst case): {}", route.localized.duration);

        if let Some(plan) = &route.departure_plan {
            let _ = writeln!(
                out,
                "  Latest departure (to arrive on time): {}{}",
                plan.departure.format("%Y-%m-%d %H:%M UTC"),
                if plan.is_late { " (already passed)" } else { "" }
            );
        }

        if let Some(summary) = &route.summary {
            let _ = writeln!(out, "  Route: {}", summary);
        }

        for (leg_idx, leg) in route.legs.iter().enumerate() {
            let _ = writeln!(out, "  Leg {}:", leg_idx + 1);
            if !leg.steps.is_empty() {
                let _ = writeln!(out, "    Directions (first 3 steps):");
                for (step_idx, step) in leg.steps.iter().take(3).enumerate() {
                    let _ = writeln!(out, "      {}. {}", step_idx + 1, step.instruction);
                }
                if leg.steps.len() > 3 {
                    let _ = writeln!(out, "      ... and {} more steps", leg.steps.len() - 3);
                }
            }
        }

        out.push('\n');
    }

    out
}
