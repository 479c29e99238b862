//! Discrete-event queue.
//!
//! Holds future events ordered by firing time. Events due at the same time
//! fire in the order they were scheduled. Time only moves when the owner
//! pops an event or advances the clock explicitly.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::pmu::{Scheduler, TimerEvent};

struct Entry<E> {
    time: u64,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
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
        (self.time, self.seq).cmp(&(other.time, other.seq))
    }
}

/// Simulation clock and pending events.
pub struct EventQueue<E> {
    now: u64,
    next_seq: u64,
    heap: BinaryHeap<Reverse<Entry<E>>>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            heap: BinaryHeap::new(),
        }
    }

    /// Current simulation time.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Schedules `event` at `now + delay`.
    pub fn push(&mut self, delay: u64, event: E) {
        let time = self.now.saturating_add(delay);
        self.push_at(time, event);
    }

    /// Schedules `event` at an absolute time, clamped to the present.
    pub fn push_at(&mut self, time: u64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            time: time.max(self.now),
            seq,
            event,
        }));
    }

    /// Firing time of the earliest pending event.
    pub fn next_time(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.time)
    }

    /// Removes the earliest event if it fires at or before `until`.
    ///
    /// The clock moves to the event's time.
    pub fn pop_due(&mut self, until: u64) -> Option<(u64, E)> {
        if self.next_time()? > until {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        self.now = entry.time;
        Some((entry.time, entry.event))
    }

    /// Removes the earliest event, whatever its time.
    pub fn pop(&mut self) -> Option<(u64, E)> {
        self.pop_due(u64::MAX)
    }

    /// Moves the clock forward to `time`. The clock never moves backwards.
    ///
    /// Events due before `time` are not fired; callers drain them with
    /// [`pop_due`](Self::pop_due) first.
    pub fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }
}

impl Scheduler for EventQueue<TimerEvent> {
    fn now(&self) -> u64 {
        self.now
    }

    fn schedule(&mut self, delay: u64, event: TimerEvent) {
        self.push(delay, event);
    }
}
