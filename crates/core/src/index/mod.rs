//! Read-only cross-reference tables over the loaded datasets.

use std::collections::HashMap;

use crate::model::{ArMarker, ExhibitData, MuseumItem, Point, TimelineEvent};

/// Id lookups for every collection plus the soft foreign-key joins
/// point → museum item and timeline event → point.
///
/// Built once; every lookup that misses returns `None`.
#[derive(Debug, Default)]
pub struct ExhibitIndex {
    data: ExhibitData,
    points: HashMap<String, usize>,
    timeline: HashMap<String, usize>,
    museum: HashMap<String, usize>,
    markers: HashMap<String, usize>,
}

impl ExhibitIndex {
    pub fn build(data: ExhibitData) -> Self {
        let points = positions("points", data.points.iter().map(|p| p.id.as_str()));
        let timeline = positions("timeline", data.timeline.iter().map(|e| e.id.as_str()));
        let museum = positions("museum", data.museum.iter().map(|m| m.id.as_str()));
        let markers = positions("markers", data.markers.iter().map(|m| m.id.as_str()));

        Self {
            data,
            points,
            timeline,
            museum,
            markers,
        }
    }

    pub fn data(&self) -> &ExhibitData {
        &self.data
    }

    pub fn points(&self) -> &[Point] {
        &self.data.points
    }

    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.data.timeline
    }

    pub fn museum(&self) -> &[MuseumItem] {
        &self.data.museum
    }

    pub fn markers(&self) -> &[ArMarker] {
        &self.data.markers
    }

    pub fn point(&self, id: &str) -> Option<&Point> {
        self.points.get(id).map(|&i| &self.data.points[i])
    }

    pub fn timeline_event(&self, id: &str) -> Option<&TimelineEvent> {
        self.timeline.get(id).map(|&i| &self.data.timeline[i])
    }

    pub fn museum_item(&self, id: &str) -> Option<&MuseumItem> {
        self.museum.get(id).map(|&i| &self.data.museum[i])
    }

    pub fn marker(&self, id: &str) -> Option<&ArMarker> {
        self.markers.get(id).map(|&i| &self.data.markers[i])
    }

    pub fn museum_item_for_point(&self, point: &Point) -> Option<&MuseumItem> {
        let item = point
            .museum_item_id
            .as_deref()
            .and_then(|id| self.museum_item(id));
        if item.is_none() && point.museum_item_id.is_some() {
            tracing::debug!(point_id = %point.id, "museum item reference does not resolve");
        }
        item
    }

    pub fn point_for_event(&self, event: &TimelineEvent) -> Option<&Point> {
        let point = event.map_point_id.as_deref().and_then(|id| self.point(id));
        if point.is_none() && event.map_point_id.is_some() {
            tracing::debug!(event_id = %event.id, "map point reference does not resolve");
        }
        point
    }
}

fn positions<'a>(collection: &str, ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut table = HashMap::new();
    for (position, id) in ids.enumerate() {
        if table.contains_key(id) {
            tracing::warn!(collection, id, "duplicate id; keeping the first record");
            continue;
        }
        table.insert(id.to_string(), position);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn joins_point_to_museum_item() {
        let index = ExhibitIndex::build(testing::sample_data());
        let point = index.point("p-gate").unwrap();

        let item = index.museum_item_for_point(point).unwrap();
        assert_eq!(item.id, "m-sword");
    }

    #[test]
    fn dangling_references_are_absent() {
        let index = ExhibitIndex::build(testing::sample_data());

        let orphan = index.point("p-orphan").unwrap();
        assert!(index.museum_item_for_point(orphan).is_none());

        let event = index.timeline_event("t-treaty").unwrap();
        assert!(index.point_for_event(event).is_none());
    }

    #[test]
    fn resolves_event_to_point() {
        let index = ExhibitIndex::build(testing::sample_data());
        let event = index.timeline_event("t-uprising").unwrap();

        assert_eq!(index.point_for_event(event).unwrap().id, "p-gate");
    }

    #[test]
    fn empty_collections_always_miss() {
        let index = ExhibitIndex::build(ExhibitData::default());

        assert!(index.point("p-gate").is_none());
        assert!(index.museum_item("m-sword").is_none());
        assert!(index.marker("a-stele").is_none());
        assert!(index.timeline_event("t-uprising").is_none());
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let mut data = testing::sample_data();
        let mut copy = data.museum[0].clone();
        copy.title = "Impostor".to_string();
        data.museum.push(copy);

        let index = ExhibitIndex::build(data);
        assert_ne!(index.museum_item("m-sword").unwrap().title, "Impostor");
    }
}
