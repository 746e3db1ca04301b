//! Logical-time scheduler: a priority queue of due callbacks.
//!
//! This replaces per-task wall-clock timers with an explicit due-entry heap
//! so that session-end cancellation is a single `clear()` and scripted
//! sessions can run on a hand-advanced clock.

use crate::state::TaskDef;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// A deferred engine action.
#[derive(Clone, Debug)]
pub enum Action {
    /// The countdown of an active task expires
    TaskDeadline {
        /// Task id the deadline belongs to
        task_id: String,
    },
    /// A delayed follow-up task enters the working set
    SpawnTask {
        /// Definition to instantiate
        def: TaskDef,
    },
    /// An NPC sends its opening message
    NpcGreeting {
        /// NPC id
        npc_id: String,
    },
}

#[derive(Clone, Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    action: Action,
}

// Ordering ignores the action: entries fire in (due, insertion) order.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of `(due, seq)`-ordered deferred actions.
///
/// Entries for tasks that were already resolved are not removed eagerly;
/// the engine ignores them at dispatch (remove-then-handle).
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an action at an absolute logical time.
    pub fn schedule(&mut self, due: Duration, action: Action) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due, seq, action }));
    }

    /// Pops the next action due at or before `now`, in (due, seq) order,
    /// together with its due time.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, Action)> {
        if self.heap.peek().is_some_and(|Reverse(e)| e.due <= now) {
            self.heap.pop().map(|Reverse(e)| (e.due, e.action))
        } else {
            None
        }
    }

    /// Drops every pending entry. Called on session end.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
