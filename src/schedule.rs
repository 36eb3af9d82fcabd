//! Deterministic timer queue.
//!
//! The stage owns one [`Scheduler`] for every delayed behaviour: the repeating
//! auto-switch interval and the one-shot hand-off timers. Time only moves when the
//! owner calls [`Scheduler::advance`], so tests drive it exactly.
//!
//! Due timers are drained with [`Scheduler::poll`] in deadline order (ties in
//! scheduling order). While an event is being handled, [`Scheduler::now`] equals
//! that event's deadline, so a timer scheduled from a handler is measured from the
//! moment its parent fired, not from the end of the frame.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use rustc_hash::FxHashSet;

/// Identifies a scheduled timer. Repeating timers keep their id across firings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Shortest period accepted for repeating timers.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Converts seconds to a `Duration`, mapping negative or non-finite input to zero.
#[must_use]
pub fn seconds(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO)
}

struct Entry<E> {
    deadline: Duration,
    seq: u64,
    id: TimerId,
    period: Option<Duration>,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    // Reversed so the max-heap pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub struct Scheduler<E: Clone> {
    queue: BinaryHeap<Entry<E>>,
    live: FxHashSet<TimerId>,
    now: Duration,
    horizon: Duration,
    next_id: u64,
    next_seq: u64,
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Scheduler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            live: FxHashSet::default(),
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Current scheduler time. Equals the deadline of the event last returned by
    /// [`poll`](Self::poll) until the queue is drained.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_once(&mut self, delay: Duration, event: E) -> TimerId {
        self.push(delay, None, event)
    }

    /// Fires `event` every `period`, first after one full period.
    pub fn schedule_repeating(&mut self, period: Duration, event: E) -> TimerId {
        let period = if period < MIN_PERIOD {
            log::warn!("Repeating timer period {period:?} clamped to {MIN_PERIOD:?}");
            MIN_PERIOD
        } else {
            period
        };
        self.push(period, Some(period), event)
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.enqueue(Entry {
            deadline,
            seq: 0,
            id,
            period,
            event,
        });
        self.live.insert(id);
        log::debug!("Timer {id:?} scheduled at {deadline:?}");
        id
    }

    fn enqueue(&mut self, mut entry: Entry<E>) {
        entry.seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(entry);
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let was_live = self.live.remove(&id);
        if was_live {
            log::debug!("Timer {id:?} cancelled");
        }
        was_live
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains(&id)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.live.len()
    }

    /// Earliest deadline among live timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|e| self.live.contains(&e.id))
            .map(|e| e.deadline)
            .min()
    }

    /// Moves the horizon forward; timers up to it become due for [`poll`](Self::poll).
    pub fn advance(&mut self, dt: Duration) {
        self.horizon += dt;
    }

    /// Pops the next due timer, or settles `now` at the horizon when none is left.
    pub fn poll(&mut self) -> Option<(TimerId, E)> {
        loop {
            let due = self
                .queue
                .peek()
                .is_some_and(|e| e.deadline <= self.horizon);
            if !due {
                self.now = self.horizon;
                return None;
            }

            let entry = self.queue.pop()?;
            if !self.live.contains(&entry.id) {
                continue;
            }

            self.now = entry.deadline;
            let fired = (entry.id, entry.event.clone());

            match entry.period {
                Some(period) => self.enqueue(Entry {
                    deadline: entry.deadline + period,
                    ..entry
                }),
                None => {
                    self.live.remove(&entry.id);
                }
            }

            return Some(fired);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<E: Clone>(scheduler: &mut Scheduler<E>) -> Vec<(Duration, E)> {
        let mut out = Vec::new();
        while let Some((_, e)) = scheduler.poll() {
            out.push((scheduler.now(), e));
        }
        out
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule_once(Duration::from_millis(20), "b");
        s.schedule_once(Duration::from_millis(10), "a");
        s.schedule_once(Duration::from_millis(20), "c");
        s.advance(Duration::from_millis(25));

        let fired: Vec<_> = drain(&mut s).into_iter().map(|(_, e)| e).collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert_eq!(s.now(), Duration::from_millis(25));
    }

    #[test]
    fn repeating_timer_fires_every_period() {
        let mut s = Scheduler::new();
        s.schedule_repeating(Duration::from_secs(2), ());
        s.advance(Duration::from_secs(7));

        let times: Vec<_> = drain(&mut s).into_iter().map(|(t, ())| t).collect();
        assert_eq!(
            times,
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(6)
            ]
        );
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut s = Scheduler::new();
        let id = s.schedule_once(Duration::from_millis(5), 1);
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        s.advance(Duration::from_millis(10));
        assert!(s.poll().is_none());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn now_is_deadline_while_handling() {
        let mut s = Scheduler::new();
        s.schedule_once(Duration::from_millis(100), 0);
        s.advance(Duration::from_millis(300));

        assert!(s.poll().is_some());
        assert_eq!(s.now(), Duration::from_millis(100));
        // Scheduled from the handler: due at 150 ms, inside this advance.
        s.schedule_once(Duration::from_millis(50), 1);
        assert_eq!(s.poll().map(|(_, e)| e), Some(1));
        assert_eq!(s.now(), Duration::from_millis(150));
    }

    #[test]
    fn seconds_rejects_negative() {
        assert_eq!(seconds(-1.0), Duration::ZERO);
        assert_eq!(seconds(f32::NAN), Duration::ZERO);
        assert_eq!(seconds(2.5), Duration::from_millis(2500));
    }
}
