//! Concurrent loading of the four exhibit datasets.
//!
//! Every dataset is fetched in its own task and the four tasks are awaited
//! jointly. A failed fetch or parse only empties its own slice and raises one
//! degraded-mode notice; results are merged by resource, never by
//! completion order.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::task::{JoinError, JoinHandle};

use crate::config::DatasetConfig;
use crate::model::{ArMarker, ExhibitData, MuseumItem, Point, TimelineEvent};
use crate::notice::{Notice, NoticeKind};
use crate::{ExhibitError, Result};

/// The four independently loaded datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Points,
    Timeline,
    Museum,
    Markers,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Points,
        Resource::Timeline,
        Resource::Museum,
        Resource::Markers,
    ];

    /// Human-readable name used in notices.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Points => "map points",
            Resource::Timeline => "timeline",
            Resource::Museum => "virtual museum",
            Resource::Markers => "AR marker list",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Points => "points",
            Resource::Timeline => "timeline",
            Resource::Museum => "museum",
            Resource::Markers => "markers",
        };
        f.write_str(name)
    }
}

/// Where the raw JSON of a dataset comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<String>;
}

/// Reads datasets from files below a base directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    base_dir: PathBuf,
}

impl FsSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

#[async_trait]
impl DatasetSource for FsSource {
    async fn fetch(&self, locator: &str) -> Result<String> {
        let path = self.base_dir.join(locator);
        tracing::debug!(path = %path.display(), "reading dataset");
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

/// In-memory source, optionally delaying individual locators. Locators
/// without content fail as if the file were missing.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, locator: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(locator.into(), body.into());
        self
    }

    pub fn with_delay(mut self, locator: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(locator.into(), delay);
        self
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn fetch(&self, locator: &str) -> Result<String> {
        if let Some(delay) = self.delays.get(locator) {
            tokio::time::sleep(*delay).await;
        }
        self.documents
            .get(locator)
            .cloned()
            .ok_or_else(|| ExhibitError::msg(format!("`{locator}` not found")))
    }
}

/// Locators of the four datasets, as understood by a [`DatasetSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocators {
    pub points: String,
    pub timeline: String,
    pub museum: String,
    pub markers: String,
}

impl DatasetLocators {
    pub fn locator(&self, resource: Resource) -> &str {
        match resource {
            Resource::Points => &self.points,
            Resource::Timeline => &self.timeline,
            Resource::Museum => &self.museum,
            Resource::Markers => &self.markers,
        }
    }
}

impl Default for DatasetLocators {
    fn default() -> Self {
        Self::from(&DatasetConfig::default())
    }
}

impl From<&DatasetConfig> for DatasetLocators {
    fn from(config: &DatasetConfig) -> Self {
        Self {
            points: config.points.clone(),
            timeline: config.timeline.clone(),
            museum: config.museum.clone(),
            markers: config.markers.clone(),
        }
    }
}

/// Merged result of a load: every slice populated or empty, plus the notices
/// describing what failed.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub data: ExhibitData,
    pub notices: Vec<Notice>,
}

impl LoadOutcome {
    pub fn failed_resources(&self) -> Vec<Resource> {
        self.notices
            .iter()
            .filter_map(|notice| match notice.kind {
                NoticeKind::Degraded(resource) => Some(resource),
                _ => None,
            })
            .collect()
    }
}

/// Loads all four datasets concurrently.
///
/// Every failure of an individual load, including a fetch task that
/// panicked, is absorbed into the outcome as that resource's degraded
/// notice and an empty slice. The other resources are unaffected.
pub async fn load_datasets(source: Arc<dyn DatasetSource>, locators: &DatasetLocators) -> LoadOutcome {
    let points = spawn_fetch::<Point>(&source, locators, Resource::Points);
    let timeline = spawn_fetch::<TimelineEvent>(&source, locators, Resource::Timeline);
    let museum = spawn_fetch::<MuseumItem>(&source, locators, Resource::Museum);
    let markers = spawn_fetch::<ArMarker>(&source, locators, Resource::Markers);

    let (points, timeline, museum, markers) = tokio::join!(points, timeline, museum, markers);

    let mut notices = Vec::new();
    let mut data = ExhibitData {
        points: settle(Resource::Points, points, &mut notices),
        timeline: settle(Resource::Timeline, timeline, &mut notices),
        museum: settle(Resource::Museum, museum, &mut notices),
        markers: settle(Resource::Markers, markers, &mut notices),
    };

    for event in &mut data.timeline {
        if event.normalise() {
            tracing::warn!(event_id = %event.id, "timeline event ends before it starts; end date ignored");
        }
    }

    tracing::info!(
        points = data.points.len(),
        timeline = data.timeline.len(),
        museum = data.museum.len(),
        markers = data.markers.len(),
        failed = notices.len(),
        "datasets loaded"
    );

    LoadOutcome { data, notices }
}

/// Runs [`load_datasets`] as its own task. If the orchestration itself
/// breaks, the session still starts with four empty slices and a single
/// startup notice.
pub async fn load_or_degrade(
    source: Arc<dyn DatasetSource>,
    locators: &DatasetLocators,
) -> LoadOutcome {
    let locators = locators.clone();
    let orchestration = tokio::spawn(async move { load_datasets(source, &locators).await });

    match orchestration.await {
        Ok(outcome) => outcome,
        Err(err) => startup_failure(ExhibitError::Orchestration(err.to_string())),
    }
}

fn startup_failure(err: ExhibitError) -> LoadOutcome {
    tracing::error!(error = %err, "dataset loading aborted; starting with empty exhibit");
    LoadOutcome {
        data: ExhibitData::default(),
        notices: vec![Notice::new(
            NoticeKind::Startup,
            format!("Initialisation error: {err}"),
        )],
    }
}

fn spawn_fetch<T>(
    source: &Arc<dyn DatasetSource>,
    locators: &DatasetLocators,
    resource: Resource,
) -> JoinHandle<Result<Vec<T>>>
where
    T: DeserializeOwned + Send + 'static,
{
    let source = Arc::clone(source);
    let locator = locators.locator(resource).to_string();
    tokio::spawn(async move { fetch_records(source.as_ref(), resource, &locator).await })
}

async fn fetch_records<T: DeserializeOwned>(
    source: &dyn DatasetSource,
    resource: Resource,
    locator: &str,
) -> Result<Vec<T>> {
    let body = source
        .fetch(locator)
        .await
        .map_err(|err| load_error(resource, err))?;
    serde_json::from_str(&body).map_err(|err| load_error(resource, err))
}

/// Turns a finished fetch task into its slice. A task that failed or never
/// completed counts as that resource's load failure.
fn settle<T>(
    resource: Resource,
    joined: std::result::Result<Result<Vec<T>>, JoinError>,
    notices: &mut Vec<Notice>,
) -> Vec<T> {
    match joined.unwrap_or_else(|err| Err(load_error(resource, err))) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(%resource, error = %err, "dataset unavailable; continuing with an empty slice");
            notices.push(Notice::degraded(resource));
            Vec::new()
        }
    }
}

fn load_error(resource: Resource, reason: impl fmt::Display) -> ExhibitError {
    ExhibitError::ResourceLoad {
        resource: resource.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: &str = r#"[{"id":"p1","lat":16.0,"lng":108.0,"title":"Gate"}]"#;
    const TIMELINE: &str = r#"[{"id":"t1","title":"Uprising","dateStart":"1885-07-13"}]"#;
    const MUSEUM: &str = r#"[{"id":"m1","title":"Sword"}]"#;
    const MARKERS: &str = r#"[{"id":"a1","title":"Stele","patternUrl":"p.patt","modelUrl":"m.glb"}]"#;

    fn full_source() -> StaticSource {
        let locators = DatasetLocators::default();
        StaticSource::new()
            .with_document(locators.points, POINTS)
            .with_document(locators.timeline, TIMELINE)
            .with_document(locators.museum, MUSEUM)
            .with_document(locators.markers, MARKERS)
    }

    #[tokio::test]
    async fn loads_every_dataset() {
        let outcome = load_datasets(Arc::new(full_source()), &DatasetLocators::default()).await;

        assert!(outcome.notices.is_empty());
        assert_eq!(outcome.data.points.len(), 1);
        assert_eq!(outcome.data.timeline.len(), 1);
        assert_eq!(outcome.data.museum.len(), 1);
        assert_eq!(outcome.data.markers.len(), 1);
    }

    #[tokio::test]
    async fn malformed_dataset_only_empties_its_slice() {
        let locators = DatasetLocators::default();
        let source = full_source().with_document(locators.museum.clone(), "{ not json");

        let outcome = load_datasets(Arc::new(source), &locators).await;

        assert!(outcome.data.museum.is_empty());
        assert_eq!(outcome.data.points.len(), 1);
        assert_eq!(outcome.failed_resources(), vec![Resource::Museum]);
    }

    #[tokio::test(start_paused = true)]
    async fn merge_ignores_completion_order() {
        let locators = DatasetLocators::default();
        let source = full_source()
            .with_delay(locators.points.clone(), Duration::from_millis(300))
            .with_delay(locators.timeline.clone(), Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        let outcome = load_datasets(Arc::new(source), &locators).await;

        assert_eq!(outcome.data.points[0].id, "p1");
        assert_eq!(outcome.data.timeline[0].id, "t1");
        // Joint await: bounded by the slowest load, not the sum.
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    /// Panics for one locator and defers to `inner` for the rest.
    struct PanicsOn {
        locator: String,
        inner: StaticSource,
    }

    #[async_trait]
    impl DatasetSource for PanicsOn {
        async fn fetch(&self, locator: &str) -> Result<String> {
            if locator == self.locator {
                panic!("source exploded on {locator}");
            }
            self.inner.fetch(locator).await
        }
    }

    #[tokio::test]
    async fn panicking_fetch_only_degrades_its_own_resource() {
        let locators = DatasetLocators::default();
        let source = PanicsOn {
            locator: locators.points.clone(),
            inner: full_source(),
        };

        let outcome = load_or_degrade(Arc::new(source), &locators).await;

        assert!(outcome.data.points.is_empty());
        assert_eq!(outcome.data.timeline.len(), 1);
        assert_eq!(outcome.data.museum.len(), 1);
        assert_eq!(outcome.data.markers.len(), 1);
        assert_eq!(outcome.failed_resources(), vec![Resource::Points]);
        assert_eq!(outcome.notices.len(), 1);
    }

    #[test]
    fn startup_failure_empties_every_slice_with_one_notice() {
        let outcome = startup_failure(ExhibitError::Orchestration("runtime shut down".into()));

        assert!(outcome.data.is_empty());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].kind, NoticeKind::Startup);
        assert!(outcome.failed_resources().is_empty());
    }

    #[tokio::test]
    async fn fs_source_reads_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/points.json"), POINTS).unwrap();

        let outcome =
            load_datasets(Arc::new(FsSource::new(dir.path())), &DatasetLocators::default()).await;

        assert_eq!(outcome.data.points.len(), 1);
        assert_eq!(outcome.notices.len(), 3);
    }
}
