use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub datasets: DatasetConfig,
    pub timing: TimingConfig,
    pub map: MapConfig,
    pub media: MediaConfig,
    pub locale: LocaleConfig,
}

impl AppConfig {
    /// Parses a TOML document. Missing sections and keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }
}

/// Locations of the four exhibit datasets, relative to `base_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub base_dir: PathBuf,
    pub points: String,
    pub timeline: String,
    pub museum: String,
    pub markers: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            points: "data/points.json".to_string(),
            timeline: "data/timeline.json".to_string(),
            museum: "data/museum.json".to_string(),
            markers: "data/ar_markers.json".to_string(),
        }
    }
}

/// Delays driving the timed processes, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tour_interval_ms: u64,
    pub route_step_ms: u64,
    pub scan_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tour_interval_ms: 4_000,
            route_step_ms: 1_500,
            scan_timeout_ms: 1_800,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub initial_zoom: u8,
    pub focus_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 16.046,
            center_lng: 108.188,
            initial_zoom: 15,
            focus_zoom: 17,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Narration used by markers and points that carry no audio of their own.
    pub shared_audio: Option<String>,
    pub placeholder_image: String,
    pub placeholder_alt: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            shared_audio: None,
            placeholder_image: "assets/images/placeholder.svg".to_string(),
            placeholder_alt: "Exhibit illustration".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub default_language: String,
    pub languages: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_language: "vi".to_string(),
            languages: vec!["vi".to_string(), "en".to_string()],
        }
    }
}
