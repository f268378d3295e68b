//! Rendering collaborators driven by the engine.
//!
//! The map, chart, AR scene and audio output are opaque capability
//! providers. The `Recording*` implementations keep track of every call in
//! shared state so a caller can hand one clone to the session and inspect
//! another.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use chrono::NaiveDate;

use crate::model::{Coordinates, ModelTransform};
use crate::{ExhibitError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AudioStream(pub u64);

/// Toggleable overlay groups on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapLayer {
    Points,
    HistoricArea,
    HeritageSite,
}

pub trait MapWidget {
    fn set_view(&mut self, center: Coordinates, zoom: u8);
    fn add_marker_at(&mut self, coords: Coordinates) -> MarkerHandle;
    fn open_popup(&mut self, marker: MarkerHandle);
    fn draw_empty_path(&mut self) -> PathHandle;
    fn append_to_path(&mut self, path: PathHandle, coords: Coordinates);
    fn remove_path(&mut self, path: PathHandle);
    fn set_layer_visible(&mut self, layer: MapLayer, visible: bool);
}

/// One point of the timeline chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: NaiveDate,
    pub y: usize,
    pub id: String,
    pub title: String,
}

pub trait ChartWidget {
    fn render(&mut self, series: &[ChartPoint]);
    fn destroy(&mut self);
}

pub trait ArRenderer {
    fn set_pattern(&mut self, pattern_url: &str);
    fn set_model(&mut self, model_url: &str);
    fn set_transform(&mut self, transform: &ModelTransform);
}

pub trait AudioChannel {
    /// Starts playing `source`. Fails with [`ExhibitError::Playback`] when the
    /// source cannot be played.
    fn play(&mut self, source: &str) -> Result<AudioStream>;
    fn stop(&mut self, stream: AudioStream);
}

#[derive(Debug, Default)]
pub struct MapState {
    pub view: Option<(Coordinates, u8)>,
    pub markers: Vec<(MarkerHandle, Coordinates)>,
    pub open_popup: Option<MarkerHandle>,
    pub paths: BTreeMap<PathHandle, Vec<Coordinates>>,
    pub hidden_layers: HashSet<MapLayer>,
    next_id: u64,
}

impl MapState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMap {
    state: Rc<RefCell<MapState>>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<(Coordinates, u8)> {
        self.state.borrow().view
    }

    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    pub fn open_popup(&self) -> Option<MarkerHandle> {
        self.state.borrow().open_popup
    }

    pub fn marker_at(&self, handle: MarkerHandle) -> Option<Coordinates> {
        self.state
            .borrow()
            .markers
            .iter()
            .find(|(marker, _)| *marker == handle)
            .map(|(_, coords)| *coords)
    }

    /// Number of path artifacts currently drawn on the map.
    pub fn path_count(&self) -> usize {
        self.state.borrow().paths.len()
    }

    pub fn paths(&self) -> Vec<Vec<Coordinates>> {
        self.state.borrow().paths.values().cloned().collect()
    }

    pub fn is_layer_visible(&self, layer: MapLayer) -> bool {
        !self.state.borrow().hidden_layers.contains(&layer)
    }
}

impl MapWidget for RecordingMap {
    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        tracing::trace!(lat = center.lat, lng = center.lng, zoom, "map view set");
        self.state.borrow_mut().view = Some((center, zoom));
    }

    fn add_marker_at(&mut self, coords: Coordinates) -> MarkerHandle {
        let mut state = self.state.borrow_mut();
        let handle = MarkerHandle(state.next_id());
        state.markers.push((handle, coords));
        handle
    }

    fn open_popup(&mut self, marker: MarkerHandle) {
        self.state.borrow_mut().open_popup = Some(marker);
    }

    fn draw_empty_path(&mut self) -> PathHandle {
        let mut state = self.state.borrow_mut();
        let handle = PathHandle(state.next_id());
        state.paths.insert(handle, Vec::new());
        handle
    }

    fn append_to_path(&mut self, path: PathHandle, coords: Coordinates) {
        if let Some(points) = self.state.borrow_mut().paths.get_mut(&path) {
            points.push(coords);
        }
    }

    fn remove_path(&mut self, path: PathHandle) {
        self.state.borrow_mut().paths.remove(&path);
    }

    fn set_layer_visible(&mut self, layer: MapLayer, visible: bool) {
        let mut state = self.state.borrow_mut();
        if visible {
            state.hidden_layers.remove(&layer);
        } else {
            state.hidden_layers.insert(layer);
        }
    }
}

#[derive(Debug, Default)]
pub struct ChartState {
    pub series: Option<Vec<ChartPoint>>,
    pub renders: usize,
    pub destroys: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingChart {
    state: Rc<RefCell<ChartState>>,
}

impl RecordingChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self) -> Option<Vec<ChartPoint>> {
        self.state.borrow().series.clone()
    }

    pub fn render_count(&self) -> usize {
        self.state.borrow().renders
    }

    pub fn destroy_count(&self) -> usize {
        self.state.borrow().destroys
    }
}

impl ChartWidget for RecordingChart {
    fn render(&mut self, series: &[ChartPoint]) {
        let mut state = self.state.borrow_mut();
        state.series = Some(series.to_vec());
        state.renders += 1;
    }

    fn destroy(&mut self) {
        let mut state = self.state.borrow_mut();
        state.series = None;
        state.destroys += 1;
    }
}

/// Attributes currently applied to the AR scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArSceneState {
    pub pattern: Option<String>,
    pub model: Option<String>,
    pub transform: Option<ModelTransform>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingArRenderer {
    state: Rc<RefCell<ArSceneState>>,
}

impl RecordingArRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> ArSceneState {
        self.state.borrow().clone()
    }
}

impl ArRenderer for RecordingArRenderer {
    fn set_pattern(&mut self, pattern_url: &str) {
        self.state.borrow_mut().pattern = Some(pattern_url.to_string());
    }

    fn set_model(&mut self, model_url: &str) {
        self.state.borrow_mut().model = Some(model_url.to_string());
    }

    fn set_transform(&mut self, transform: &ModelTransform) {
        self.state.borrow_mut().transform = Some(*transform);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Started(String),
    Stopped(String),
}

#[derive(Debug, Default)]
pub struct AudioState {
    pub playing: Vec<(AudioStream, String)>,
    pub events: Vec<AudioEvent>,
    /// Highest number of streams that were ever playing at once.
    pub peak_concurrent: usize,
    pub failing: HashSet<String>,
    next_id: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    state: Rc<RefCell<AudioState>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later attempt to play `source` fail.
    pub fn fail_on(&self, source: impl Into<String>) {
        self.state.borrow_mut().failing.insert(source.into());
    }

    pub fn playing(&self) -> Vec<String> {
        self.state
            .borrow()
            .playing
            .iter()
            .map(|(_, source)| source.clone())
            .collect()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.state.borrow().events.clone()
    }

    pub fn peak_concurrent(&self) -> usize {
        self.state.borrow().peak_concurrent
    }
}

impl AudioChannel for RecordingAudio {
    fn play(&mut self, source: &str) -> Result<AudioStream> {
        let mut state = self.state.borrow_mut();
        if state.failing.contains(source) {
            return Err(ExhibitError::playback(format!("cannot play `{source}`")));
        }
        state.next_id += 1;
        let stream = AudioStream(state.next_id);
        state.playing.push((stream, source.to_string()));
        state.events.push(AudioEvent::Started(source.to_string()));
        state.peak_concurrent = state.peak_concurrent.max(state.playing.len());
        Ok(stream)
    }

    fn stop(&mut self, stream: AudioStream) {
        let mut state = self.state.borrow_mut();
        if let Some(position) = state.playing.iter().position(|(s, _)| *s == stream) {
            let (_, source) = state.playing.remove(position);
            state.events.push(AudioEvent::Stopped(source));
        }
    }
}
