//! Delayed-effect scheduling on an explicit millisecond timeline.
//!
//! Every "wait" in the narrative engine is a `(due, effect)` pair submitted
//! here. There is deliberately no cancellation API: components guard against
//! double-firing with monotonic flags, never by revoking a queued effect.
//! The runner maps wall-clock instants onto the timeline; tests pass ticks
//! directly.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Milliseconds since session start.
pub type Tick = u64;

#[derive(Debug)]
struct Entry<E> {
    due: Tick,
    seq: u64,
    effect: E,
}

// Min-heap on (due, seq): earlier deadlines first, submission order breaks
// ties so one playback sequence never reorders internally.
impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

#[derive(Debug)]
pub struct Schedule<E> {
    queue: BinaryHeap<Entry<E>>,
    seq: u64,
}

impl<E> Schedule<E> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Queue `effect` to fire once the timeline reaches `due`.
    pub fn submit(&mut self, due: Tick, effect: E) {
        let seq = self.seq;
        self.seq = seq.wrapping_add(1);
        self.queue.push(Entry { due, seq, effect });
    }

    /// Queue `effect` to fire `delay_ms` after `now`.
    pub fn submit_in(&mut self, now: Tick, delay_ms: u64, effect: E) {
        self.submit(now.saturating_add(delay_ms), effect);
    }

    /// Pop the next effect whose deadline has been reached, together with
    /// that deadline so the caller can fire it at its own due tick.
    pub fn pop_due(&mut self, now: Tick) -> Option<(Tick, E)> {
        if self.queue.peek().is_some_and(|entry| entry.due <= now) {
            self.queue.pop().map(|entry| (entry.due, entry.effect))
        } else {
            None
        }
    }

    /// Deadline of the nearest pending effect.
    pub fn next_due(&self) -> Option<Tick> {
        self.queue.peek().map(|entry| entry.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<E> Default for Schedule<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut s: Schedule<&str> = Schedule::new();
        s.submit(30, "late");
        s.submit(10, "early");
        s.submit(20, "middle");
        assert_eq!(s.pop_due(5), None);
        assert_eq!(s.pop_due(30), Some((10, "early")));
        assert_eq!(s.pop_due(30), Some((20, "middle")));
        assert_eq!(s.pop_due(30), Some((30, "late")));
        assert!(s.is_empty());
    }

    #[test]
    fn submission_order_breaks_deadline_ties() {
        let mut s: Schedule<u8> = Schedule::new();
        for n in 0..8u8 {
            s.submit(100, n);
        }
        let mut fired = Vec::new();
        while let Some((_, n)) = s.pop_due(100) {
            fired.push(n);
        }
        assert_eq!(fired, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn next_due_reports_nearest_deadline() {
        let mut s: Schedule<()> = Schedule::new();
        assert_eq!(s.next_due(), None);
        s.submit_in(40, 60, ());
        s.submit_in(40, 10, ());
        assert_eq!(s.next_due(), Some(50));
        assert_eq!(s.len(), 2);
    }
}
