//! User-facing notices raised by the engine.

use std::fmt;

use crate::loader::Resource;

/// Screen regions that can be set up independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Gallery,
    Map,
    Timeline,
    Ar,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Gallery => "gallery",
            View::Map => "map",
            View::Timeline => "timeline",
            View::Ar => "ar",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// One dataset failed to load; the rest of the exhibit stays usable.
    Degraded(Resource),
    /// Loading could not be orchestrated at all.
    Startup,
    /// A view has no data to show.
    EmptyView(View),
    /// A view could not be mounted and was skipped.
    ViewUnavailable(View),
    /// Audio or animation could not start.
    Playback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn degraded(resource: Resource) -> Self {
        Self::new(
            NoticeKind::Degraded(resource),
            format!(
                "Could not load {}. Showing the exhibit without this data.",
                resource.label()
            ),
        )
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Playback, message)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.kind, NoticeKind::Degraded(_) | NoticeKind::Startup)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Most notices kept on a [`NoticeBoard`]; older ones are dropped first.
pub const MAX_NOTICES: usize = 64;

/// Bounded log of notices shown to the visitor.
///
/// Only the newest [`MAX_NOTICES`] entries are retained. Marks taken with
/// [`NoticeBoard::mark`] count every notice ever raised, so [`NoticeBoard::since`]
/// stays correct after older entries are evicted.
#[derive(Debug, Default, Clone)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    raised: usize,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, message = %notice.message, "notice raised");
        self.notices.push(notice);
        self.raised += 1;
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
    }

    pub fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.push(notice);
        }
    }

    /// Retained notices, oldest first.
    pub fn all(&self) -> &[Notice] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Position to pass to [`Self::since`] later.
    pub fn mark(&self) -> usize {
        self.raised
    }

    /// Retained notices raised after `mark` was taken.
    pub fn since(&self, mark: usize) -> &[Notice] {
        let newer = self.raised.saturating_sub(mark).min(self.notices.len());
        &self.notices[self.notices.len() - newer..]
    }

    pub fn count_where(&self, predicate: impl Fn(&Notice) -> bool) -> usize {
        self.notices.iter().filter(|notice| predicate(notice)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Notice {
        Notice::playback(format!("notice {n}"))
    }

    #[test]
    fn board_keeps_only_the_newest_notices() {
        let mut board = NoticeBoard::new();
        board.extend((0..MAX_NOTICES + 10).map(numbered));

        assert_eq!(board.len(), MAX_NOTICES);
        assert_eq!(board.all()[0].message, "notice 10");
        assert_eq!(board.all()[MAX_NOTICES - 1].message, format!("notice {}", MAX_NOTICES + 9));
    }

    #[test]
    fn since_survives_eviction() {
        let mut board = NoticeBoard::new();
        board.extend((0..MAX_NOTICES).map(numbered));

        let mark = board.mark();
        board.push(numbered(1000));
        board.push(numbered(1001));

        let fresh: Vec<_> = board.since(mark).iter().map(|n| n.message.as_str()).collect();
        assert_eq!(fresh, ["notice 1000", "notice 1001"]);
        assert_eq!(board.len(), MAX_NOTICES);
    }

    #[test]
    fn since_is_clamped_to_what_is_retained() {
        let mut board = NoticeBoard::new();
        let mark = board.mark();
        board.extend((0..MAX_NOTICES * 2).map(numbered));

        assert_eq!(board.since(mark).len(), MAX_NOTICES);
        assert!(board.since(board.mark()).is_empty());
    }
}
