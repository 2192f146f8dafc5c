/// Serialises animated transitions: at most one view or slide change in flight.
#[derive(Debug, Default)]
pub struct TransitionLock {
    held: Option<LockHold>,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockHold {
    pub generation: u64,
    pub release_at: i64,
}

impl TransitionLock {
    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    pub fn hold(&self) -> Option<LockHold> {
        self.held
    }

    /// Takes the lock until `now_ms + hold_ms`; `None` when already held.
    pub fn try_acquire(&mut self, now_ms: i64, hold_ms: i64) -> Option<LockHold> {
        if self.held.is_some() {
            return None;
        }
        self.generation += 1;
        let hold = LockHold {
            generation: self.generation,
            release_at: now_ms.saturating_add(hold_ms.max(0)),
        };
        self.held = Some(hold);
        Some(hold)
    }

    /// Releases the hold identified by `generation`; stale releases are ignored.
    pub fn release(&mut self, generation: u64) -> bool {
        match self.held {
            Some(hold) if hold.generation == generation => {
                self.held = None;
                true
            }
            _ => false,
        }
    }
}
