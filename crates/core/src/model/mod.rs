//! Records of the four exhibit datasets.
//!
//! Collections are populated once after loading and never mutated again;
//! user interaction only changes view state. Soft foreign keys
//! (`museum_item_id`, `map_point_id`) may dangle and are resolved through
//! [`crate::ExhibitIndex`].

use std::fmt;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Geographic position of a map point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    #[serde(flatten)]
    pub coords: Coordinates,
    pub title: String,
    #[serde(default)]
    pub short_desc: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub audio: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub ar_target: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub museum_item_id: Option<String>,
    #[serde(default)]
    pub route_order: Option<i64>,
}

impl Point {
    /// Ordering key for route playback. A missing order counts as zero.
    pub fn route_key(&self) -> i64 {
        self.route_order.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub date_start: NaiveDate,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "non_empty")]
    pub map_point_id: Option<String>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

impl TimelineEvent {
    /// Drops an end date that precedes the start date. Returns `true` when
    /// the record had to be corrected.
    pub fn normalise(&mut self) -> bool {
        match self.date_end {
            Some(end) if end < self.date_start => {
                self.date_end = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuseumItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Free-form creation date, e.g. "1885" or "late 19th century".
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub provenance: String,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default, deserialize_with = "non_empty")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub audio_guide: Option<String>,
}

/// Three-component vector used by AR model transforms.
///
/// Accepts either `"x y z"` strings or `[x, y, z]` arrays on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Triple(pub [f32; 3]);

impl Triple {
    pub const ZERO: Triple = Triple([0.0, 0.0, 0.0]);
    pub const ONE: Triple = Triple([1.0, 1.0, 1.0]);
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(f, "{x} {y} {z}")
    }
}

impl std::str::FromStr for Triple {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(|part| part.parse::<f32>().map_err(|err| format!("`{part}`: {err}")))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [x, y, z] => Ok(Triple([*x, *y, *z])),
            _ => Err(format!("expected three components, got {}", parts.len())),
        }
    }
}

impl<'de> Deserialize<'de> for Triple {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List([f32; 3]),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::List(values) => Ok(Triple(values)),
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelTransform {
    #[serde(rename = "modelScale", default = "unit_scale")]
    pub scale: Triple,
    #[serde(rename = "modelRotation", default = "origin")]
    pub rotation: Triple,
    #[serde(rename = "modelPosition", default = "origin")]
    pub position: Triple,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            scale: Triple::ONE,
            rotation: Triple::ZERO,
            position: Triple::ZERO,
        }
    }
}

fn unit_scale() -> Triple {
    Triple::ONE
}

fn origin() -> Triple {
    Triple::ZERO
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArMarker {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub pattern_url: String,
    pub model_url: String,
    #[serde(flatten)]
    pub transform: ModelTransform,
    #[serde(default)]
    pub qr_link: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub audio: Option<String>,
}

/// Snapshot of all four datasets. Empty means the dataset was empty or
/// failed to load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExhibitData {
    pub points: Vec<Point>,
    pub timeline: Vec<TimelineEvent>,
    pub museum: Vec<MuseumItem>,
    pub markers: Vec<ArMarker>,
}

impl ExhibitData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.timeline.is_empty()
            && self.museum.is_empty()
            && self.markers.is_empty()
    }
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
