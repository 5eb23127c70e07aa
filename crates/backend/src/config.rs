use std::path::PathBuf;
use std::str::FromStr;

use radar_shared::RadarConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_PATH: &str = "data/radar.redb";

/// Server settings, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub radar: RadarConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys take their defaults; values
    /// that fail to parse are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut radar = RadarConfig::default();

        let radius: f64 = parse_or(&lookup, "RADAR_DEFAULT_RADIUS_KM", radar.default_radius_km);
        radar.default_radius_km = radar.effective_radius(Some(radius));

        let page_size: usize = parse_or(&lookup, "RADAR_DEFAULT_PAGE_SIZE", radar.default_page_size);
        if radar.page_size_options.contains(&page_size) {
            radar.default_page_size = page_size;
        } else {
            tracing::warn!(
                page_size,
                options = ?radar.page_size_options,
                "RADAR_DEFAULT_PAGE_SIZE is not a selectable page size, keeping default"
            );
        }

        ServerConfig {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            db_path: PathBuf::from(lookup("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
            radar,
        }
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable setting");
            default
        }),
        None => default,
    }
}
