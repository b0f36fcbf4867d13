//! Per-kind display filter
//!
//! Filtering happens on snapshots handed to the presentation layer. The log
//! itself keeps every kind, so hidden rows still take part in eviction.

use crate::overlay::types::{EventKind, EventLog, LogItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which event kinds the overlay shows
///
/// Kinds without an explicit entry are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindFilter {
    enabled: BTreeMap<EventKind, bool>,
}

impl Default for KindFilter {
    /// Everything except pointer movement, which would drown out the rest
    fn default() -> Self {
        let mut filter = Self::show_all();
        filter.set(EventKind::PointerMove, false);
        filter
    }
}

impl KindFilter {
    pub fn show_all() -> Self {
        Self {
            enabled: EventKind::ALL.iter().map(|kind| (*kind, true)).collect(),
        }
    }

    pub fn set(&mut self, kind: EventKind, visible: bool) {
        self.enabled.insert(kind, visible);
    }

    pub fn is_visible(&self, kind: EventKind) -> bool {
        self.enabled.get(&kind).copied().unwrap_or(true)
    }

    /// Rows of `log` whose kind is enabled, oldest first
    pub fn visible<'a>(&self, log: &'a EventLog) -> Vec<&'a LogItem> {
        log.iter().filter(|item| self.is_visible(item.kind())).collect()
    }
}
