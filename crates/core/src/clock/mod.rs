//! Virtual clock and cancellable timers.
//!
//! All timed behaviour (tour ticks, route steps, the scan timeout) runs on a
//! single-threaded [`TimerQueue`]. Time only moves when the owner calls
//! [`TimerQueue::pop_due`] or [`TimerQueue::advance_to`], which keeps the
//! engine deterministic.

/// Stable identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Which process a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    TourTick,
    RouteStep,
    ScanTimeout,
}

/// A timer that reached its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    pub at_ms: u64,
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    kind: TimerKind,
    due_ms: u64,
    interval_ms: Option<u64>,
    // Breaks ties between timers due at the same instant.
    seq: u64,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_handle: u64,
    next_seq: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    /// Creates an empty queue with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules a timer that fires once, `delay_ms` from now.
    pub fn schedule_once(&mut self, delay_ms: u64, kind: TimerKind) -> TimerHandle {
        self.insert(kind, delay_ms, None)
    }

    /// Schedules a timer firing every `interval_ms`, first after one interval.
    pub fn schedule_repeating(&mut self, interval_ms: u64, kind: TimerKind) -> TimerHandle {
        let interval_ms = interval_ms.max(1);
        self.insert(kind, interval_ms, Some(interval_ms))
    }

    /// Cancels a timer. Cancelling an unknown, fired or already cancelled
    /// timer is a no-op and returns `false`.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.handle != handle);
        before != self.timers.len()
    }

    /// Returns `true` while the timer is still pending.
    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|timer| timer.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of pending timers of the given kind.
    pub fn active_of(&self, kind: TimerKind) -> usize {
        self.timers.iter().filter(|timer| timer.kind == kind).count()
    }

    /// Deadline of the earliest pending timer, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.iter().map(|timer| timer.due_ms).min()
    }

    /// Fires the earliest timer due at or before `until_ms`, moving the clock
    /// to its deadline. Repeating timers are re-armed, one-shots removed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let position = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= until_ms)
            .min_by_key(|(_, timer)| (timer.due_ms, timer.seq))
            .map(|(position, _)| position)?;

        let timer = &mut self.timers[position];
        let fired = Fired {
            handle: timer.handle,
            kind: timer.kind,
            at_ms: timer.due_ms,
        };
        self.now_ms = self.now_ms.max(timer.due_ms);

        match timer.interval_ms {
            Some(interval) => {
                timer.due_ms += interval;
                timer.seq = self.next_seq;
                self.next_seq += 1;
            }
            None => {
                self.timers.remove(position);
            }
        }

        Some(fired)
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, at_ms: u64) {
        self.now_ms = self.now_ms.max(at_ms);
    }

    fn insert(&mut self, kind: TimerKind, delay_ms: u64, interval_ms: Option<u64>) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            kind,
            due_ms: self.now_ms + delay_ms,
            interval_ms,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        tracing::trace!(?handle, ?kind, delay_ms, "timer scheduled");
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule_once(100, TimerKind::ScanTimeout);

        assert!(timers.pop_due(99).is_none());
        let fired = timers.pop_due(100).unwrap();
        assert_eq!(fired.handle, handle);
        assert_eq!(timers.now_ms(), 100);
        assert!(timers.pop_due(1_000).is_none());
        assert!(!timers.is_active(handle));
    }

    #[test]
    fn repeating_timer_rearms() {
        let mut timers = TimerQueue::new();
        timers.schedule_repeating(40, TimerKind::TourTick);

        let ticks: Vec<u64> = std::iter::from_fn(|| timers.pop_due(130))
            .map(|fired| fired.at_ms)
            .collect();
        assert_eq!(ticks, vec![40, 80, 120]);
        assert_eq!(timers.active_count(), 1);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule_once(10, TimerKind::RouteStep);

        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(timers.pop_due(100).is_none());
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut timers = TimerQueue::new();
        let first = timers.schedule_once(50, TimerKind::RouteStep);
        let second = timers.schedule_once(50, TimerKind::ScanTimeout);

        assert_eq!(timers.pop_due(50).unwrap().handle, first);
        assert_eq!(timers.pop_due(50).unwrap().handle, second);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut timers = TimerQueue::new();
        timers.advance_to(500);
        timers.schedule_once(20, TimerKind::RouteStep);

        assert_eq!(timers.next_due_ms(), Some(520));
    }
}
