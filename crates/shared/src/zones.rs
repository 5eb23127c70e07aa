use std::f64::consts::TAU;

use rand::Rng;

use crate::config::{PlotGeometry, RadarConfig};
use crate::error::DataFault;
use crate::models::{Entity, PlotPosition, RadarPoint, RawDistance, Zone};

// Ratio bands. The middle band is 0.34 wide; radar rings are drawn at these
// exact boundaries, so they are not evened out to thirds.
const NEAR_LIMIT: f64 = 0.33;
const MID_LIMIT: f64 = 0.67;
const NEAR_SPAN: f64 = 0.33;
const MID_SPAN: f64 = 0.34;
const FAR_SPAN: f64 = 0.33;

/// Parse a raw distance into a plottable value.
/// Returns `None` for anything that is not a finite, non-negative number.
pub fn parse_distance(raw: &RawDistance) -> Option<f64> {
    let value = match raw {
        RawDistance::Number(n) => *n,
        RawDistance::Text(s) => parse_numeric_prefix(s)?,
        RawDistance::Other(_) => return None,
    };
    if value.is_finite() && value >= 0.0 {
        // -0 is accepted but labelled as 0.
        Some(value.abs())
    } else {
        None
    }
}

/// Parse the leading decimal number of `s`, ignoring leading whitespace and
/// any trailing text ("3.5 km" -> 3.5).
fn parse_numeric_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Fraction of the search radius covered by `distance`, clamped to 1.
pub fn ratio(distance: f64, search_radius: f64) -> f64 {
    (distance / search_radius).min(1.0)
}

pub fn zone_for_ratio(ratio: f64) -> Zone {
    if ratio <= NEAR_LIMIT {
        Zone::Near
    } else if ratio <= MID_LIMIT {
        Zone::Mid
    } else {
        Zone::Far
    }
}

/// Map a ratio onto the plot radius, linearly within each zone band.
pub fn pixel_radius(ratio: f64, geometry: &PlotGeometry) -> f64 {
    let band = geometry.band_width();
    match zone_for_ratio(ratio) {
        Zone::Near => (ratio / NEAR_SPAN) * band,
        Zone::Mid => band + ((ratio - NEAR_LIMIT) / MID_SPAN) * band,
        Zone::Far => 2.0 * band + ((ratio - MID_LIMIT) / FAR_SPAN) * band,
    }
}

/// Pixel position at `radius` from the plot center along `angle` (radians).
pub fn place(radius: f64, angle: f64, geometry: &PlotGeometry) -> PlotPosition {
    let x = geometry.center_x + radius * angle.cos();
    let y = geometry.center_y + radius * angle.sin();
    PlotPosition {
        x: x.round() as i32,
        y: y.round() as i32,
    }
}

pub fn distance_label(distance: f64, unit: &str) -> String {
    format!("{:.1} {}", distance, unit)
}

/// Place a single entity at the given angle. `None` if its distance is not
/// plottable.
pub fn map_entity(
    entity: &Entity,
    search_radius: f64,
    angle: f64,
    config: &RadarConfig,
) -> Option<RadarPoint> {
    let distance = entity.distance.as_ref().and_then(parse_distance)?;
    let ratio = ratio(distance, search_radius);
    let zone = zone_for_ratio(ratio);
    let radius = pixel_radius(ratio, &config.geometry);
    let color = zone.color();

    Some(RadarPoint {
        entity: entity.clone(),
        distance,
        position: place(radius, angle, &config.geometry),
        zone,
        color: color.to_string(),
        color_style: format!("background-color: {}", color),
        distance_label: distance_label(distance, &config.distance_unit),
    })
}

/// Place every plottable entity on the radar, each at a random angle.
///
/// Input order is kept. Entities with a missing, unparsable or negative
/// distance are left out. A missing or non-positive `search_radius` falls
/// back to the configured default.
pub fn map_all<R: Rng>(
    entities: &[Entity],
    search_radius: Option<f64>,
    config: &RadarConfig,
    rng: &mut R,
) -> Vec<RadarPoint> {
    let search_radius = config.effective_radius(search_radius);
    let points: Vec<RadarPoint> = entities
        .iter()
        .filter_map(|entity| {
            let angle = rng.random_range(0.0..TAU);
            let point = map_entity(entity, search_radius, angle, config);
            if point.is_none() {
                tracing::debug!(id = %entity.id, distance = ?entity.distance, "Skipping entity without a plottable distance");
            }
            point
        })
        .collect();

    tracing::debug!(
        input = entities.len(),
        plotted = points.len(),
        search_radius,
        "Mapped entities onto radar"
    );
    points
}

/// Decode the upstream payload. `null` counts as an empty list; any other
/// non-array is a fault. Elements that are not JSON objects are skipped;
/// every object becomes an entity, whatever its distance.
pub fn entities_from_json(value: &serde_json::Value) -> Result<Vec<Entity>, DataFault> {
    let items = match value {
        serde_json::Value::Null => return Ok(Vec::new()),
        serde_json::Value::Array(items) => items,
        other => return Err(DataFault::NotASequence(json_kind(other).to_string())),
    };

    Ok(items
        .iter()
        .filter_map(|item| {
            if !item.is_object() {
                tracing::debug!(kind = json_kind(item), "Skipping non-object entity record");
                return None;
            }
            match serde_json::from_value::<Entity>(item.clone()) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed entity record");
                    None
                }
            }
        })
        .collect())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
