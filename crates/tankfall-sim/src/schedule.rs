//! Scheduled-event queue: the single home for deferred work.
//!
//! Events are keyed by `(due_ms, sequence)` and drained at the start of each tick,
//! so two events due at the same time fire in insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tankfall_core::components::EntityHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledEvent {
    /// One follow-up shot of an enemy volley (staggered bomb drops and bursts).
    EnemyShot { source: EntityHandle },
    /// Remove enemies still evacuating after the grace period.
    EvacuationComplete,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due_ms: f64,
    seq: u64,
    event: ScheduledEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap and we want the earliest entry on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due_ms: f64, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { due_ms, seq, event });
    }

    /// Pop the earliest event due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<ScheduledEvent> {
        if self.heap.peek().is_some_and(|e| e.due_ms <= now_ms) {
            self.heap.pop().map(|e| e.event)
        } else {
            None
        }
    }

    /// Drop every pending event matching `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&ScheduledEvent) -> bool) {
        self.heap.retain(|e| !pred(&e.event));
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
