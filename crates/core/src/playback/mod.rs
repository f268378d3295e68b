//! Timed processes: the gallery tour cycle and route playback.
//!
//! Each process owns its timer handle and cancels it before starting a new
//! run of the same kind. The two processes never cancel each other.

use crate::clock::{TimerHandle, TimerKind, TimerQueue};
use crate::map::MapView;
use crate::model::{Coordinates, Point};
use crate::render::PathHandle;

/// Cyclic highlight over the gallery's display order.
#[derive(Debug)]
pub struct TourCycle {
    interval_ms: u64,
    timer: Option<TimerHandle>,
    items: Vec<String>,
    next: usize,
    highlighted: Option<usize>,
}

impl TourCycle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            timer: None,
            items: Vec::new(),
            next: 0,
            highlighted: None,
        }
    }

    /// Restarts the cycle over `items`. Nothing happens when `items` is empty.
    pub fn start(&mut self, items: Vec<String>, timers: &mut TimerQueue) -> bool {
        if items.is_empty() {
            tracing::debug!("tour not started: no gallery items");
            return false;
        }
        self.stop(timers);
        self.items = items;
        self.next = 0;
        self.timer = Some(timers.schedule_repeating(self.interval_ms, TimerKind::TourTick));
        tracing::info!(items = self.items.len(), "tour started");
        true
    }

    pub fn stop(&mut self, timers: &mut TimerQueue) {
        if let Some(timer) = self.timer.take() {
            timers.cancel(timer);
            tracing::info!("tour stopped");
        }
        self.highlighted = None;
    }

    /// Advances the highlight. Returns the id to bring into view, or `None`
    /// when `handle` is not this cycle's ticker.
    pub fn on_tick(&mut self, handle: TimerHandle) -> Option<&str> {
        if self.timer != Some(handle) || self.items.is_empty() {
            return None;
        }
        let position = self.next % self.items.len();
        self.next += 1;
        self.highlighted = Some(position);
        Some(self.items[position].as_str())
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.map(|position| self.items[position].as_str())
    }
}

/// Points in route order: ascending `route_order`, missing orders counting
/// as zero, ties kept in input order.
pub fn ordered_route(points: &[Point]) -> Vec<&Point> {
    let mut route: Vec<&Point> = points.iter().collect();
    route.sort_by_key(|point| point.route_key());
    route
}

#[derive(Debug)]
struct RouteRun {
    path: PathHandle,
    stops: Vec<(String, Coordinates)>,
    progress: usize,
    timer: Option<TimerHandle>,
}

/// One-shot animation drawing the route on the map, one stop per step.
#[derive(Debug)]
pub struct RoutePlayback {
    step_ms: u64,
    run: Option<RouteRun>,
    // Path left on the map by a run that reached its end.
    finished_path: Option<PathHandle>,
}

impl RoutePlayback {
    pub fn new(step_ms: u64) -> Self {
        Self {
            step_ms,
            run: None,
            finished_path: None,
        }
    }

    /// Cancels any current run and starts drawing the route from scratch.
    /// The first stop is drawn immediately.
    pub fn play(&mut self, points: &[Point], map: &mut MapView, timers: &mut TimerQueue) -> bool {
        if points.is_empty() {
            tracing::debug!("route not played: no points");
            return false;
        }
        self.reset(map, timers);

        let stops = ordered_route(points)
            .into_iter()
            .map(|point| (point.id.clone(), point.coords))
            .collect();
        let path = map.widget_mut().draw_empty_path();
        self.run = Some(RouteRun {
            path,
            stops,
            progress: 0,
            timer: None,
        });
        tracing::info!(stops = points.len(), "route playback started");

        self.step(map, timers);
        true
    }

    pub(crate) fn on_step(&mut self, handle: TimerHandle, map: &mut MapView, timers: &mut TimerQueue) {
        let due = self
            .run
            .as_ref()
            .is_some_and(|run| run.timer == Some(handle));
        if due {
            self.step(map, timers);
        }
    }

    /// Stops the animation and removes its path from the map.
    pub fn reset(&mut self, map: &mut MapView, timers: &mut TimerQueue) {
        if let Some(run) = self.run.take() {
            if let Some(timer) = run.timer {
                timers.cancel(timer);
            }
            map.widget_mut().remove_path(run.path);
            tracing::info!(progress = run.progress, "route playback reset");
        }
        if let Some(path) = self.finished_path.take() {
            map.widget_mut().remove_path(path);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.run.is_some()
    }

    /// Number of stops drawn by the current run.
    pub fn progress(&self) -> Option<usize> {
        self.run.as_ref().map(|run| run.progress)
    }

    fn step(&mut self, map: &mut MapView, timers: &mut TimerQueue) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.timer = None;

        let Some((point_id, coords)) = run.stops.get(run.progress).cloned() else {
            self.finish();
            return;
        };
        map.widget_mut().append_to_path(run.path, coords);
        run.progress += 1;
        map.focus(&point_id);

        if run.progress < run.stops.len() {
            run.timer = Some(timers.schedule_once(self.step_ms, TimerKind::RouteStep));
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        if let Some(run) = self.run.take() {
            tracing::info!(stops = run.progress, "route playback finished");
            self.finished_path = Some(run.path);
        }
    }
}
