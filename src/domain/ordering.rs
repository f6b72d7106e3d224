//! Stable event ordering for deterministic reduction.

use crate::domain::LoggedEvent;

/// Chain position of a log.
///
/// Ordering: block_number -> log_index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventOrderingKey {
    /// Block the log was emitted in (primary sort).
    pub block_number: u64,
    /// Index of the log inside its block (secondary sort).
    pub log_index: u64,
}

impl EventOrderingKey {
    pub fn new(block_number: u64, log_index: u64) -> Self {
        EventOrderingKey {
            block_number,
            log_index,
        }
    }

    pub fn from_event(event: &LoggedEvent) -> Self {
        Self::new(event.block_number, event.log_index)
    }
}
