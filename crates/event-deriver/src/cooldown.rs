//! Per-type emission cooldowns

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::EventType;

/// Last emission time per event type.
///
/// Created empty at session start and threaded tick to tick as a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooldownTable {
    last_emitted: HashMap<EventType, DateTime<Utc>>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an event of this type may be emitted at `now`
    pub fn is_ready(&self, event_type: &EventType, now: DateTime<Utc>, cooldown_ms: i64) -> bool {
        match self.last_emitted.get(event_type) {
            Some(last) => {
                let elapsed = (now - *last).num_milliseconds();
                if elapsed > cooldown_ms {
                    true
                } else {
                    debug!("{} suppressed: in cooldown ({}ms elapsed)", event_type, elapsed);
                    false
                }
            }
            None => true,
        }
    }

    /// Record an emission
    pub fn record(&mut self, event_type: EventType, now: DateTime<Utc>) {
        self.last_emitted.insert(event_type, now);
    }

    /// Time of the last emission of this type
    pub fn last_emitted(&self, event_type: &EventType) -> Option<DateTime<Utc>> {
        self.last_emitted.get(event_type).copied()
    }

    pub fn len(&self) -> usize {
        self.last_emitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_emitted.is_empty()
    }

    pub fn clear(&mut self) {
        self.last_emitted.clear();
    }
}
