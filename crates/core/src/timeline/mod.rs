//! Chronological view of the timeline dataset: chart series and story list.

use crate::model::TimelineEvent;
use crate::notice::{Notice, NoticeKind, View};
use crate::render::{ChartPoint, ChartWidget};

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq)]
pub struct StoryEntry {
    pub event_id: String,
    pub title: String,
    pub date_label: String,
    pub summary: String,
}

impl StoryEntry {
    fn from_event(event: &TimelineEvent) -> Self {
        let start = event.date_start.format(DATE_FORMAT);
        let date_label = match event.date_end {
            Some(end) => format!("{start} – {}", end.format(DATE_FORMAT)),
            None => start.to_string(),
        };
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            date_label,
            summary: event.summary.clone(),
        }
    }
}

pub struct TimelineView {
    chart: Box<dyn ChartWidget>,
    rendered: bool,
    series: Vec<ChartPoint>,
    story: Vec<StoryEntry>,
}

impl TimelineView {
    pub fn new(chart: Box<dyn ChartWidget>) -> Self {
        Self {
            chart,
            rendered: false,
            series: Vec::new(),
            story: Vec::new(),
        }
    }

    /// Sorts events by start date and renders them, replacing any chart
    /// drawn earlier.
    pub fn render(&mut self, events: &[TimelineEvent]) -> Option<Notice> {
        if self.rendered {
            self.chart.destroy();
            self.rendered = false;
        }

        let mut sorted: Vec<&TimelineEvent> = events.iter().collect();
        sorted.sort_by_key(|event| event.date_start);

        self.story = sorted.iter().map(|event| StoryEntry::from_event(event)).collect();
        self.series = sorted
            .iter()
            .enumerate()
            .map(|(rank, event)| ChartPoint {
                x: event.date_start,
                y: rank + 1,
                id: event.id.clone(),
                title: event.title.clone(),
            })
            .collect();

        if self.series.is_empty() {
            return Some(Notice::new(
                NoticeKind::EmptyView(View::Timeline),
                "No timeline data yet.",
            ));
        }

        self.chart.render(&self.series);
        self.rendered = true;
        None
    }

    pub fn series(&self) -> &[ChartPoint] {
        &self.series
    }

    pub fn story(&self) -> &[StoryEntry] {
        &self.story
    }

    /// Event behind the chart point at `index`.
    pub fn event_id_at(&self, index: usize) -> Option<&str> {
        self.series.get(index).map(|point| point.id.as_str())
    }
}

impl std::fmt::Debug for TimelineView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineView")
            .field("rendered", &self.rendered)
            .field("series", &self.series.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingChart;
    use crate::testing;

    #[test]
    fn series_is_sorted_by_start_date() {
        let chart = RecordingChart::new();
        let mut view = TimelineView::new(Box::new(chart.clone()));

        assert!(view.render(&testing::sample_data().timeline).is_none());

        let ids: Vec<_> = view.series().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["t-treaty", "t-uprising", "t-memorial"]);
        assert_eq!(view.series()[0].y, 1);
        assert_eq!(chart.series().unwrap().len(), 3);
        assert_eq!(view.event_id_at(1), Some("t-uprising"));
        assert_eq!(view.event_id_at(9), None);
    }

    #[test]
    fn story_labels_include_end_date() {
        let mut view = TimelineView::new(Box::new(RecordingChart::new()));
        view.render(&testing::sample_data().timeline);

        let uprising = view
            .story()
            .iter()
            .find(|entry| entry.event_id == "t-uprising")
            .unwrap();
        assert_eq!(uprising.date_label, "13/07/1885 – 20/09/1887");
    }

    #[test]
    fn rerender_destroys_previous_chart() {
        let chart = RecordingChart::new();
        let mut view = TimelineView::new(Box::new(chart.clone()));
        let events = testing::sample_data().timeline;

        view.render(&events);
        view.render(&events);

        assert_eq!(chart.destroy_count(), 1);
        assert_eq!(chart.render_count(), 2);
    }

    #[test]
    fn empty_timeline_has_notice_and_empty_story() {
        let chart = RecordingChart::new();
        let mut view = TimelineView::new(Box::new(chart.clone()));

        let notice = view.render(&[]).unwrap();

        assert_eq!(notice.kind, NoticeKind::EmptyView(View::Timeline));
        assert!(view.story().is_empty());
        assert_eq!(chart.render_count(), 0);
    }
}
