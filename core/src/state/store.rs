use crate::state::reducer::{reduce, Action, FireDataState};
use crate::state::sequence::{FieldGroup, RequestSequencer, Ticket};
use log::debug;
use std::sync::Mutex;

struct Inner {
    state: FireDataState,
    sequencer: RequestSequencer,
}

/// Shared state container. Responses are applied through tickets so a slow
/// response never overwrites a newer one for the same fields.
pub struct Store {
    inner: Mutex<Inner>,
}

impl Store {
    pub fn new(state: FireDataState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state,
                sequencer: RequestSequencer::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> FireDataState {
        let inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.state.clone()
    }

    /// Applies an action unconditionally.
    pub fn dispatch(&self, action: Action) {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        debug!("dispatch {}", action.name());
        inner.state = reduce(&inner.state, action);
    }

    pub fn begin(&self, group: FieldGroup) -> Ticket {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.sequencer.issue(group)
    }

    /// Applies `action` if `ticket` is still the newest for its group.
    /// Returns whether the action was applied.
    pub fn commit(&self, ticket: Ticket, action: Action) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !inner.sequencer.is_current(ticket) {
            debug!(
                "discarding stale {} response (#{} for {:?})",
                action.name(),
                ticket.sequence,
                ticket.group
            );
            return false;
        }
        inner.state = reduce(&inner.state, action);
        true
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(FireDataState::default())
    }
}
