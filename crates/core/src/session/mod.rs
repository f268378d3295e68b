//! The exhibit session: explicitly owned state shared by every component.
//!
//! A session is built once from the load outcome. Afterwards the datasets
//! are read-only; commands and the passage of virtual time only change view
//! state.

use std::sync::Arc;

use crate::ar::ArSession;
use crate::audio::{AudioOrigin, AudioSession};
use crate::clock::{Fired, TimerKind, TimerQueue};
use crate::command::Command;
use crate::config::AppConfig;
use crate::gallery::Gallery;
use crate::index::ExhibitIndex;
use crate::loader::{load_or_degrade, DatasetLocators, DatasetSource, LoadOutcome};
use crate::map::{MapView, PointPopup};
use crate::notice::{Notice, NoticeBoard, NoticeKind, View};
use crate::overlay::{ModalContent, Overlays};
use crate::playback::{RoutePlayback, TourCycle};
use crate::render::{ArRenderer, AudioChannel, ChartWidget, MapWidget};
use crate::timeline::TimelineView;
use crate::ExhibitError;

/// Rendering targets handed to a session. A missing target disables its
/// view without affecting the others.
#[derive(Default)]
pub struct Collaborators {
    pub map: Option<Box<dyn MapWidget>>,
    pub chart: Option<Box<dyn ChartWidget>>,
    pub ar: Option<Box<dyn ArRenderer>>,
    pub audio: Option<Box<dyn AudioChannel>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, map: impl MapWidget + 'static) -> Self {
        self.map = Some(Box::new(map));
        self
    }

    pub fn with_chart(mut self, chart: impl ChartWidget + 'static) -> Self {
        self.chart = Some(Box::new(chart));
        self
    }

    pub fn with_ar(mut self, ar: impl ArRenderer + 'static) -> Self {
        self.ar = Some(Box::new(ar));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioChannel + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }
}

pub struct ExhibitSession {
    index: ExhibitIndex,
    notices: NoticeBoard,
    timers: TimerQueue,
    overlays: Overlays,
    audio: AudioSession,
    gallery: Gallery,
    ar: Option<ArSession>,
    map: Option<MapView>,
    timeline: Option<TimelineView>,
    tour: TourCycle,
    route: RoutePlayback,
    shared_audio: Option<String>,
}

impl ExhibitSession {
    /// Loads the datasets through `source` and sets up every view.
    pub async fn bootstrap(
        config: &AppConfig,
        source: Arc<dyn DatasetSource>,
        collaborators: Collaborators,
    ) -> Self {
        let locators = DatasetLocators::from(&config.datasets);
        let outcome = load_or_degrade(source, &locators).await;
        Self::new(config, outcome, collaborators)
    }

    /// Sets up the views in isolation: gallery, AR, map, then timeline.
    pub fn new(config: &AppConfig, outcome: LoadOutcome, collaborators: Collaborators) -> Self {
        let mut notices = NoticeBoard::new();
        notices.extend(outcome.notices);
        let index = ExhibitIndex::build(outcome.data);
        let shared_audio = config.media.shared_audio.clone();

        let (gallery, notice) = Gallery::build(index.museum(), &config.media);
        notices.extend(notice);

        let ar = match collaborators.ar {
            Some(renderer) => {
                let mut ar = ArSession::new(Some(renderer), shared_audio.clone());
                notices.extend(ar.init(index.markers()));
                Some(ar)
            }
            None => {
                notices.push(view_unavailable(View::Ar));
                None
            }
        };

        let map = match collaborators.map {
            Some(widget) => {
                let (map, notice) = MapView::init(widget, index.points(), &config.map);
                notices.extend(notice);
                Some(map)
            }
            None => {
                notices.push(view_unavailable(View::Map));
                None
            }
        };

        let timeline = match collaborators.chart {
            Some(chart) => {
                let mut timeline = TimelineView::new(chart);
                notices.extend(timeline.render(index.timeline()));
                Some(timeline)
            }
            None => {
                notices.push(view_unavailable(View::Timeline));
                None
            }
        };

        let timing = config.timing;
        Self {
            index,
            notices,
            timers: TimerQueue::new(),
            overlays: Overlays::new(
                timing.scan_timeout_ms,
                config.locale.default_language.clone(),
                config.locale.languages.clone(),
            ),
            audio: AudioSession::new(collaborators.audio),
            gallery,
            ar,
            map,
            timeline,
            tour: TourCycle::new(timing.tour_interval_ms),
            route: RoutePlayback::new(timing.route_step_ms),
            shared_audio,
        }
    }

    /// Routes a command to its owning component and returns the notices it
    /// raised.
    pub fn dispatch(&mut self, command: Command) -> Vec<Notice> {
        tracing::debug!(?command, "dispatching");
        let mark = self.notices.mark();

        match command {
            Command::OpenMuseumItem(id) => self.open_museum_item(&id),
            Command::CloseModal => self.overlays.close_modal(),
            Command::CancelKey => self.overlays.cancel_key(),
            Command::Click(target) => self.overlays.click(target, &mut self.timers),
            Command::FocusMapPoint(id) => self.focus_map(&id),
            Command::OpenPointDetail(id) => self.open_point_detail(&id),
            Command::OpenPointAr(id) => self.open_point_ar(&id),
            Command::PlayPointAudio(id) => self.play_point_audio(&id),
            Command::ToggleMapLayer(layer) => {
                if let Some(map) = self.map.as_mut() {
                    map.toggle_layer(layer);
                }
            }
            Command::TimelinePointClicked(position) => self.open_timeline_point(position),
            Command::LoadArMarker(id) => self.load_ar_marker(&id),
            Command::PlayArAudio => self.play_ar_audio(),
            Command::OpenScan => self.overlays.open_scan(&mut self.timers),
            Command::CloseScan => self.overlays.close_scan(&mut self.timers),
            Command::StartTour => {
                self.tour
                    .start(self.gallery.display_order(), &mut self.timers);
            }
            Command::StopTour => self.tour.stop(&mut self.timers),
            Command::PlayRoute => {
                if let Some(map) = self.map.as_mut() {
                    self.route.play(self.index.points(), map, &mut self.timers);
                }
            }
            Command::ResetRoute => {
                if let Some(map) = self.map.as_mut() {
                    self.route.reset(map, &mut self.timers);
                }
            }
            Command::ToggleNavigationMenu => self.overlays.toggle_navigation_menu(),
            Command::NavigationLinkClicked => self.overlays.navigation_link_clicked(),
            Command::ToggleLanguageMenu => self.overlays.toggle_language_menu(),
            Command::SelectLanguage(code) => {
                self.overlays.select_language(&code);
            }
        }

        self.notices.since(mark).to_vec()
    }

    /// Moves virtual time forward by `delta_ms`, firing every timer that
    /// falls due on the way, in deadline order.
    pub fn advance(&mut self, delta_ms: u64) {
        let target = self.timers.now_ms().saturating_add(delta_ms);
        while let Some(fired) = self.timers.pop_due(target) {
            self.on_timer(fired);
        }
        self.timers.advance_to(target);
    }

    /// Virtual time elapsed since the session started.
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Lookup tables over the loaded datasets.
    pub fn index(&self) -> &ExhibitIndex {
        &self.index
    }

    /// Every notice retained so far, including those raised during startup.
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.overlays.is_scroll_locked()
    }

    pub fn audio(&self) -> &AudioSession {
        &self.audio
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// `None` when the session was built without an AR renderer.
    pub fn ar(&self) -> Option<&ArSession> {
        self.ar.as_ref()
    }

    /// `None` when the session was built without a map widget.
    pub fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    /// `None` when the session was built without a chart widget.
    pub fn timeline(&self) -> Option<&TimelineView> {
        self.timeline.as_ref()
    }

    pub fn tour(&self) -> &TourCycle {
        &self.tour
    }

    pub fn route(&self) -> &RoutePlayback {
        &self.route
    }

    /// Popup content for a map point, if the point exists.
    pub fn popup(&self, point_id: &str) -> Option<PointPopup> {
        self.index
            .point(point_id)
            .map(|point| PointPopup::for_point(point, self.shared_audio.as_deref()))
    }

    fn on_timer(&mut self, fired: Fired) {
        match fired.kind {
            TimerKind::TourTick => {
                if let Some(id) = self.tour.on_tick(fired.handle) {
                    tracing::debug!(item_id = id, at_ms = fired.at_ms, "tour highlight");
                    self.gallery.bring_into_view(id);
                }
            }
            TimerKind::RouteStep => {
                if let Some(map) = self.map.as_mut() {
                    self.route.on_step(fired.handle, map, &mut self.timers);
                }
            }
            TimerKind::ScanTimeout => self.overlays.on_scan_timeout(fired.handle),
        }
    }

    fn open_museum_item(&mut self, id: &str) {
        match self.index.museum_item(id) {
            Some(item) => self
                .overlays
                .open_modal(ModalContent::MuseumItem(item.clone())),
            None => tracing::debug!(item_id = id, "museum item not found; nothing to open"),
        }
    }

    fn open_point_detail(&mut self, point_id: &str) {
        let item = self
            .index
            .point(point_id)
            .and_then(|point| self.index.museum_item_for_point(point));
        if let Some(item) = item {
            self.overlays
                .open_modal(ModalContent::MuseumItem(item.clone()));
        }
    }

    fn open_point_ar(&mut self, point_id: &str) {
        let target = self
            .index
            .point(point_id)
            .and_then(|point| point.ar_target.clone());
        if let Some(model_url) = target {
            self.overlays
                .open_modal(ModalContent::ArPreview { model_url });
        }
    }

    fn play_point_audio(&mut self, point_id: &str) {
        let Some(popup) = self.popup(point_id) else {
            return;
        };
        let result = match popup.audio.as_deref() {
            Some(source) => self
                .audio
                .play(source, AudioOrigin::Exhibit(point_id.to_string())),
            None => Err(ExhibitError::playback("this point has no audio file")),
        };
        if let Err(err) = result {
            self.report_playback(err);
        }
    }

    fn focus_map(&mut self, point_id: &str) {
        if let Some(map) = self.map.as_mut() {
            map.focus(point_id);
        }
    }

    fn open_timeline_point(&mut self, position: usize) {
        let event = self
            .timeline
            .as_ref()
            .and_then(|timeline| timeline.event_id_at(position))
            .and_then(|id| self.index.timeline_event(id));
        let Some(event) = event else {
            return;
        };
        let point_id = self.index.point_for_event(event).map(|p| p.id.clone());

        self.overlays
            .open_modal(ModalContent::TimelineEvent(event.clone()));
        if let Some(point_id) = point_id {
            self.focus_map(&point_id);
        }
    }

    fn load_ar_marker(&mut self, marker_id: &str) {
        let Some(ar) = self.ar.as_mut() else {
            return;
        };
        let Some(marker) = self.index.marker(marker_id) else {
            tracing::debug!(marker_id, "unknown AR marker");
            return;
        };
        if let Some(previous) = ar.active().filter(|active| active.id != marker.id) {
            self.audio
                .stop_if(&AudioOrigin::Marker(previous.id.clone()));
        }
        ar.activate(marker);
    }

    fn play_ar_audio(&mut self) {
        let result = match self.ar.as_ref() {
            Some(ar) => ar.play_audio(&mut self.audio),
            None => Err(ExhibitError::playback("the AR view is unavailable")),
        };
        if let Err(err) = result {
            self.report_playback(err);
        }
    }

    fn report_playback(&mut self, err: ExhibitError) {
        tracing::warn!(error = %err, "playback request failed");
        let reason = match err {
            ExhibitError::Playback(reason) => reason,
            other => other.to_string(),
        };
        self.notices
            .push(Notice::playback(format!("Could not play audio: {reason}.")));
    }
}

fn view_unavailable(view: View) -> Notice {
    let err = ExhibitError::render_target(view.to_string());
    tracing::warn!(%view, error = %err, "view skipped");
    Notice::new(
        NoticeKind::ViewUnavailable(view),
        format!("The {view} view is unavailable."),
    )
}

impl std::fmt::Debug for ExhibitSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExhibitSession")
            .field("now_ms", &self.timers.now_ms())
            .field("notices", &self.notices.len())
            .field("tour_running", &self.tour.is_running())
            .field("route_playing", &self.route.is_playing())
            .finish()
    }
}
