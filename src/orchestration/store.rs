use crate::domain::{EventOrderingKey, LoggedEvent, StakeEvent};
use std::collections::BTreeMap;
use tracing::warn;

/// Ingested events keyed by chain position.
///
/// Iteration is always in fold order and re-ingesting a log is a no-op.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: BTreeMap<EventOrderingKey, LoggedEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event. Returns true if its chain position was not yet known.
    ///
    /// A different event at an already-stored position replaces the old one.
    pub fn insert(&mut self, event: LoggedEvent) -> bool {
        let key = event.ordering_key();
        match self.events.insert(key, event) {
            None => true,
            Some(previous) => {
                if self.events.get(&key) != Some(&previous) {
                    warn!(
                        "Replaced event at block {} log {} ({} -> {})",
                        key.block_number,
                        key.log_index,
                        previous.event.kind(),
                        self.events[&key].event.kind()
                    );
                }
                false
            }
        }
    }

    /// Stored events in (block_number, log_index) order.
    pub fn events(&self) -> impl Iterator<Item = &StakeEvent> {
        self.events.values().map(|e| &e.event)
    }

    pub fn logged(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
