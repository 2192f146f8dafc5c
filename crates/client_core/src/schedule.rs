use std::collections::BTreeMap;

use shared::domain::{SlideRequest, View};

/// Continuations queued by the controller and run from `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    ActivateView { target: View },
    ReleaseLock { generation: u64 },
    RetrySlide { request: SlideRequest, attempt: u8 },
}

/// Time-ordered queue; entries due at the same instant run in insertion order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    entries: BTreeMap<(i64, u64), Deferred>,
    next_seq: u64,
}

impl DeferredQueue {
    pub fn schedule(&mut self, due_ms: i64, task: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((due_ms, seq), task);
    }

    pub fn next_due(&self) -> Option<i64> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    pub fn pop_due(&mut self, now_ms: i64) -> Option<(i64, Deferred)> {
        let (&(due, seq), _) = self.entries.iter().next()?;
        if due > now_ms {
            return None;
        }
        self.entries.remove(&(due, seq)).map(|task| (due, task))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
