//! Deferred callbacks.
//!
//! The match runs on one thread; suspension points (AI thinking, replay
//! frames, the win-check backstop) are timers that fire from
//! `MatchController::tick`. Every callback re-checks the match state when
//! it runs, and GAME_OVER clears the queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::actors::DecisionRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Poll an AI seat for the decision it owed when scheduled.
    Decision(DecisionRequest),
    /// Advance the attack replay by one frame.
    ReplayFrame,
    /// Periodic win-condition backstop.
    WinCheck,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Timer {
    due_ms: u64,
    seq: u64,
    kind: TimerKind,
}

// Min-heap on (due, insertion order).
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer { due_ms, seq, kind });
    }

    /// Pop the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<TimerKind> {
        if self.heap.peek()?.due_ms > now_ms {
            return None;
        }
        self.heap.pop().map(|t| t.kind)
    }

    #[must_use]
    pub fn contains(&self, kind: &TimerKind) -> bool {
        self.heap.iter().any(|t| t.kind == *kind)
    }

    /// Due time of the earliest timer.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|t| t.due_ms)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
