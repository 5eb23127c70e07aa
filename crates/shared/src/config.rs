use serde::{Deserialize, Serialize};

/// Search radius used when none (or a non-positive one) is given, in km.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];
/// Upper end of the radius slider; larger radii can only be set by the host.
pub const SLIDER_MAX_RADIUS_KM: f64 = 20.0;
pub const MAX_VISIBLE_PAGES: usize = 5;
pub const DISTANCE_UNIT: &str = "km";

// Plot origin and radius in pixels. The plot square is 400x400.
pub const CENTER_X: f64 = 200.0;
pub const CENTER_Y: f64 = 200.0;
pub const MAX_PLOT_RADIUS: f64 = 150.0;

/// Where the radar is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub max_radius: f64,
}

impl PlotGeometry {
    /// Pixel width of each of the three zone bands.
    pub fn band_width(&self) -> f64 {
        self.max_radius / 3.0
    }
}

impl Default for PlotGeometry {
    fn default() -> Self {
        PlotGeometry {
            center_x: CENTER_X,
            center_y: CENTER_Y,
            max_radius: MAX_PLOT_RADIUS,
        }
    }
}

/// Presentation settings the host may override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarConfig {
    pub default_radius_km: f64,
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    pub slider_max_radius_km: f64,
    pub max_visible_pages: usize,
    pub distance_unit: String,
    pub geometry: PlotGeometry,
}

impl RadarConfig {
    /// `radius` when usable, otherwise the configured default.
    pub fn effective_radius(&self, radius: Option<f64>) -> f64 {
        match radius {
            Some(r) if r > 0.0 && r.is_finite() => r,
            _ => self.default_radius_km,
        }
    }
}

impl Default for RadarConfig {
    fn default() -> Self {
        RadarConfig {
            default_radius_km: DEFAULT_RADIUS_KM,
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            slider_max_radius_km: SLIDER_MAX_RADIUS_KM,
            max_visible_pages: MAX_VISIBLE_PAGES,
            distance_unit: DISTANCE_UNIT.to_string(),
            geometry: PlotGeometry::default(),
        }
    }
}
