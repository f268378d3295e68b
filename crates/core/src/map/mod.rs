//! Map view: one marker per point, popups and focusing.

use std::collections::HashMap;

use crate::config::MapConfig;
use crate::model::{Coordinates, Point};
use crate::notice::{Notice, NoticeKind, View};
use crate::render::{MapLayer, MapWidget, MarkerHandle};

/// Content of a point's popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PointPopup {
    pub point_id: String,
    pub title: String,
    pub short_desc: String,
    pub image: Option<String>,
    pub audio: Option<String>,
    pub ar_target: Option<String>,
    pub museum_item_id: Option<String>,
}

impl PointPopup {
    pub fn for_point(point: &Point, shared_audio: Option<&str>) -> Self {
        Self {
            point_id: point.id.clone(),
            title: point.title.clone(),
            short_desc: point.short_desc.clone(),
            image: point.images.first().cloned(),
            audio: point
                .audio
                .clone()
                .or_else(|| shared_audio.map(str::to_string)),
            ar_target: point.ar_target.clone(),
            museum_item_id: point.museum_item_id.clone(),
        }
    }
}

pub struct MapView {
    widget: Box<dyn MapWidget>,
    markers: HashMap<String, (MarkerHandle, Coordinates)>,
    hidden_layers: Vec<MapLayer>,
    focus_zoom: u8,
}

impl MapView {
    pub fn init(
        mut widget: Box<dyn MapWidget>,
        points: &[Point],
        config: &MapConfig,
    ) -> (Self, Option<Notice>) {
        widget.set_view(
            Coordinates::new(config.center_lat, config.center_lng),
            config.initial_zoom,
        );

        let markers = points
            .iter()
            .map(|point| {
                let handle = widget.add_marker_at(point.coords);
                (point.id.clone(), (handle, point.coords))
            })
            .collect();

        let notice = points.is_empty().then(|| {
            Notice::new(
                NoticeKind::EmptyView(View::Map),
                "No points of interest yet; the map will fill in once data is available.",
            )
        });

        (
            Self {
                widget,
                markers,
                hidden_layers: Vec::new(),
                focus_zoom: config.focus_zoom,
            },
            notice,
        )
    }

    pub fn marker(&self, point_id: &str) -> Option<MarkerHandle> {
        self.markers.get(point_id).map(|(handle, _)| *handle)
    }

    /// Centres on a point and opens its popup. Unknown ids are ignored.
    pub fn focus(&mut self, point_id: &str) -> bool {
        let Some(&(handle, coords)) = self.markers.get(point_id) else {
            tracing::debug!(point_id, "no marker to focus");
            return false;
        };
        self.widget.set_view(coords, self.focus_zoom);
        self.widget.open_popup(handle);
        true
    }

    /// Flips a layer's visibility and returns whether it is now visible.
    pub fn toggle_layer(&mut self, layer: MapLayer) -> bool {
        let visible = match self.hidden_layers.iter().position(|l| *l == layer) {
            Some(position) => {
                self.hidden_layers.remove(position);
                true
            }
            None => {
                self.hidden_layers.push(layer);
                false
            }
        };
        self.widget.set_layer_visible(layer, visible);
        visible
    }

    pub(crate) fn widget_mut(&mut self) -> &mut dyn MapWidget {
        self.widget.as_mut()
    }
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("markers", &self.markers.len())
            .field("hidden_layers", &self.hidden_layers)
            .finish()
    }
}
