#![allow(dead_code)]

use std::sync::Arc;

use heritage_exhibit_core::{
    AppConfig, Collaborators, DatasetLocators, ExhibitSession, RecordingArRenderer,
    RecordingAudio, RecordingChart, RecordingMap, Resource, StaticSource,
};

pub const POINTS: &str = r#"[
    {"id": "idx0", "lat": 1.0, "lng": 100.0, "title": "Gate", "route_order": 3,
     "audio": "assets/audio/gate.wav"},
    {"id": "idx1", "lat": 2.0, "lng": 100.0, "title": "Temple", "route_order": 1,
     "museum_item_id": "m-sword", "ar_target": "assets/models/temple.glb"},
    {"id": "idx2", "lat": 3.0, "lng": 100.0, "title": "Well", "route_order": 1,
     "museum_item_id": "m-ghost"},
    {"id": "idx3", "lat": 4.0, "lng": 100.0, "title": "Stele", "route_order": 2}
]"#;

pub const TIMELINE: &str = r#"[
    {"id": "t-uprising", "title": "Uprising", "summary": "The uprising begins.",
     "dateStart": "1885-07-13", "dateEnd": "1887-09-20", "mapPointId": "idx1"},
    {"id": "t-treaty", "title": "Treaty", "summary": "A treaty is signed.",
     "dateStart": "1884-06-06", "mapPointId": "nowhere"}
]"#;

pub const MUSEUM: &str = r#"[
    {"id": "m-sword", "title": "Sword", "description": "Iron sword", "category": "Weapon",
     "media": [{"type": "image", "url": "assets/images/sword.jpg", "alt": "Iron sword"}]},
    {"id": "m-drum", "title": "Drum", "description": "Bronze drum"},
    {"id": "m-banner", "title": "Banner", "description": "Silk banner"}
]"#;

pub const MARKERS: &str = r#"[
    {"id": "a-stele", "title": "Stele", "patternUrl": "assets/markers/stele.patt",
     "modelUrl": "assets/models/stele.glb", "modelScale": "0.5 0.5 0.5",
     "qrLink": "https://example.org/ar?m=a-stele", "audio": "assets/audio/stele.wav"},
    {"id": "a-drum", "title": "Drum", "patternUrl": "assets/markers/drum.patt",
     "modelUrl": "assets/models/drum.glb", "modelRotation": [0, 45, 0],
     "qrLink": "https://example.org/ar?m=a-drum"}
]"#;

pub fn body(resource: Resource) -> &'static str {
    match resource {
        Resource::Points => POINTS,
        Resource::Timeline => TIMELINE,
        Resource::Museum => MUSEUM,
        Resource::Markers => MARKERS,
    }
}

/// Source serving every dataset except those in `failing`.
pub fn source_without(failing: &[Resource]) -> StaticSource {
    let locators = DatasetLocators::default();
    Resource::ALL
        .iter()
        .filter(|resource| !failing.contains(resource))
        .fold(StaticSource::new(), |source, &resource| {
            source.with_document(locators.locator(resource), body(resource))
        })
}

pub struct Harness {
    pub session: ExhibitSession,
    pub map: RecordingMap,
    pub chart: RecordingChart,
    pub ar: RecordingArRenderer,
    pub audio: RecordingAudio,
}

pub async fn harness_with(config: AppConfig, failing: &[Resource]) -> Harness {
    let map = RecordingMap::new();
    let chart = RecordingChart::new();
    let ar = RecordingArRenderer::new();
    let audio = RecordingAudio::new();
    let collaborators = Collaborators::new()
        .with_map(map.clone())
        .with_chart(chart.clone())
        .with_ar(ar.clone())
        .with_audio(audio.clone());

    let session =
        ExhibitSession::bootstrap(&config, Arc::new(source_without(failing)), collaborators).await;

    Harness {
        session,
        map,
        chart,
        ar,
        audio,
    }
}

pub async fn harness() -> Harness {
    harness_with(AppConfig::default(), &[]).await
}
