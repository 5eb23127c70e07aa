use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "uuid-support")]
use uuid::Uuid;

use crate::error::DataFault;

/// NEAR zone color.
pub const NEAR_COLOR: &str = "#38a169";
/// MID zone color.
pub const MID_COLOR: &str = "#d69e2e";
/// FAR zone color.
pub const FAR_COLOR: &str = "#e53e3e";

/// Proximity severity of a plotted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Near,
    Mid,
    Far,
}

impl Zone {
    /// Hex color a renderer paints the zone with.
    pub fn color(self) -> &'static str {
        match self {
            Zone::Near => NEAR_COLOR,
            Zone::Mid => MID_COLOR,
            Zone::Far => FAR_COLOR,
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Near => write!(f, "NEAR"),
            Zone::Mid => write!(f, "MID"),
            Zone::Far => write!(f, "FAR"),
        }
    }
}

/// Distance as it arrives from the upstream query: a JSON number, a numeric
/// string, or anything else (which is never plottable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDistance {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<f64> for RawDistance {
    fn from(value: f64) -> Self {
        RawDistance::Number(value)
    }
}

impl From<&str> for RawDistance {
    fn from(value: &str) -> Self {
        RawDistance::Text(value.to_string())
    }
}

/// A ranked record from the nearby query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Upstream ids may be strings or numbers; a missing id is `""`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub distance: Option<RawDistance>,
    /// Fields the radar does not interpret, handed through to the renderer.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Read any JSON value as text: `null` is empty, strings are kept as-is and
/// everything else keeps its JSON spelling (`42` -> `"42"`).
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, distance: impl Into<RawDistance>) -> Self {
        Entity {
            id: id.into(),
            name: name.into(),
            distance: Some(distance.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Pixel coordinates inside the plot square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotPosition {
    pub x: i32,
    pub y: i32,
}

/// An entity placed on the radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub entity: Entity,
    /// Parsed distance, in the unit of the search radius.
    pub distance: f64,
    pub position: PlotPosition,
    pub zone: Zone,
    pub color: String,
    pub color_style: String,
    pub distance_label: String,
}

/// Paging snapshot handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// One entry of the page-size selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSizeOption {
    pub size: usize,
    pub selected: bool,
}

/// The record the radar is centered on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Anchor {
    /// Coordinates for the nearby query. A zero or missing coordinate counts
    /// as absent, matching how account records leave them unset.
    pub fn coordinates(&self) -> Result<(f64, f64), DataFault> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 && lat.is_finite() && lng.is_finite() => {
                Ok((lat, lng))
            }
            _ => Err(DataFault::MissingCoordinates),
        }
    }
}

/// A stored radar view bound to one anchor.
#[cfg(feature = "uuid-support")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarSession {
    pub id: Uuid,
    pub anchor: Anchor,
    pub view: crate::view::ViewState,
    pub created_at: String,
    pub updated_at: String,
}
