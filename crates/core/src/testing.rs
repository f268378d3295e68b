//! Fixtures shared by the unit tests.

use chrono::NaiveDate;

use crate::model::{
    ArMarker, Coordinates, ExhibitData, MediaItem, MediaKind, ModelTransform, MuseumItem, Point,
    TimelineEvent, Triple,
};

pub fn point(id: &str, route_order: i64) -> Point {
    Point {
        id: id.to_string(),
        coords: Coordinates::new(16.04, 108.18),
        title: id.to_string(),
        short_desc: String::new(),
        images: Vec::new(),
        audio: None,
        ar_target: None,
        museum_item_id: None,
        route_order: Some(route_order),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

fn event(id: &str, start: NaiveDate, end: Option<NaiveDate>, point: Option<&str>) -> TimelineEvent {
    TimelineEvent {
        id: id.to_string(),
        title: id.to_string(),
        summary: format!("summary of {id}"),
        date_start: start,
        date_end: end,
        map_point_id: point.map(str::to_string),
        media: Vec::new(),
    }
}

fn item(id: &str, category: &str, media: Vec<MediaItem>) -> MuseumItem {
    MuseumItem {
        id: id.to_string(),
        title: id.to_string(),
        description: format!("description of {id}"),
        category: category.to_string(),
        date: "1885".to_string(),
        creator: "Unknown".to_string(),
        provenance: "Local collection".to_string(),
        media,
        model: None,
        audio_guide: None,
    }
}

/// Four points, three events, three museum items and two markers with a
/// dangling reference in each foreign-key direction.
pub fn sample_data() -> ExhibitData {
    let mut gate = point("p-gate", 2);
    gate.coords = Coordinates::new(16.046, 108.188);
    gate.audio = Some("assets/audio/gate.wav".to_string());
    gate.ar_target = Some("assets/models/gate.glb".to_string());
    gate.museum_item_id = Some("m-sword".to_string());

    let mut temple = point("p-temple", 1);
    temple.coords = Coordinates::new(16.048, 108.190);
    temple.museum_item_id = Some("m-drum".to_string());

    let mut orphan = point("p-orphan", 3);
    orphan.coords = Coordinates::new(16.050, 108.192);
    orphan.museum_item_id = Some("m-missing".to_string());

    let mut well = point("p-well", 0);
    well.route_order = None;
    well.coords = Coordinates::new(16.044, 108.186);

    ExhibitData {
        points: vec![gate, temple, orphan, well],
        timeline: vec![
            event(
                "t-uprising",
                date(1885, 7, 13),
                Some(date(1887, 9, 20)),
                Some("p-gate"),
            ),
            event("t-treaty", date(1884, 6, 6), None, Some("p-nowhere")),
            event("t-memorial", date(1990, 1, 1), None, Some("p-temple")),
        ],
        museum: vec![
            item(
                "m-sword",
                "Weapon",
                vec![MediaItem {
                    kind: MediaKind::Image,
                    url: "assets/images/sword.jpg".to_string(),
                    caption: None,
                    alt: Some("Iron sword".to_string()),
                }],
            ),
            item("m-drum", "", Vec::new()),
            item("m-banner", "Textile", Vec::new()),
        ],
        markers: vec![
            ArMarker {
                id: "a-stele".to_string(),
                title: "Stele".to_string(),
                description: String::new(),
                pattern_url: "assets/markers/stele.patt".to_string(),
                model_url: "assets/models/stele.glb".to_string(),
                transform: ModelTransform {
                    scale: Triple([0.5, 0.5, 0.5]),
                    rotation: Triple([0.0, 90.0, 0.0]),
                    position: Triple([0.0, 0.2, 0.0]),
                },
                qr_link: "https://example.org/ar?m=a-stele".to_string(),
                audio: Some("assets/audio/stele.wav".to_string()),
            },
            ArMarker {
                id: "a-drum".to_string(),
                title: "Drum".to_string(),
                description: String::new(),
                pattern_url: "assets/markers/drum.patt".to_string(),
                model_url: "assets/models/drum.glb".to_string(),
                transform: ModelTransform::default(),
                qr_link: "https://example.org/ar?m=a-drum".to_string(),
                audio: None,
            },
        ],
    }
}
