//! Runtime configuration.
//!
//! Every value has a default and can be overridden through a `NEON_TRACE_*` environment
//! variable. Timing values are plain fields so tests can shorten them.

use crate::model::Point;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:3001";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the routing/presence service.
    pub api_base: String,
    /// Search endpoint of the Nominatim-compatible geocoder.
    pub geocoder_url: String,
    /// Disables feedback cues.
    pub mute: bool,
    /// Where the device profile is persisted. `None` uses the platform data dir.
    pub device_file: Option<PathBuf>,
    /// Fixed position served by the configured location provider, if any.
    pub fixed_location: Option<Point>,
    /// Pause after each streamed analysis step.
    pub pacing: Duration,
    pub high_accuracy_timeout: Duration,
    pub low_accuracy_timeout: Duration,
    /// How long the console easter egg keeps the cosmetic flag raised.
    pub hack_duration: Duration,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            mute: false,
            device_file: None,
            fixed_location: None,
            pacing: Duration::from_millis(180),
            high_accuracy_timeout: Duration::from_secs(30),
            low_accuracy_timeout: Duration::from_secs(60),
            hack_duration: Duration::from_secs(2),
            http_timeout: Duration::from_secs(20),
        }
    }
}

impl Config {
    /// Defaults overridden by whatever `NEON_TRACE_*` variables are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base) = lookup("NEON_TRACE_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("NEON_TRACE_GEOCODER_URL") {
            config.geocoder_url = url;
        }
        if let Some(mute) = lookup("NEON_TRACE_MUTE") {
            config.mute = matches!(mute.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        config.device_file = lookup("NEON_TRACE_DEVICE_FILE").map(PathBuf::from);
        let lat = lookup("NEON_TRACE_LAT").and_then(|v| v.parse().ok());
        let lng = lookup("NEON_TRACE_LNG").and_then(|v| v.parse().ok());
        if let (Some(lat), Some(lng)) = (lat, lng) {
            config.fixed_location = Some(Point::new(lat, lng));
        }
        config
    }
}
