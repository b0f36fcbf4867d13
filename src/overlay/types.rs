use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of rows the overlay log holds
pub const LOG_CAPACITY: usize = 20;

/// Kind tag of an input event, serialized with the wire names the capture layer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "mousemove")]
    PointerMove,
    #[serde(rename = "mousedown")]
    PointerDown,
    #[serde(rename = "mouseup")]
    PointerUp,
    #[serde(rename = "click")]
    Click,
    #[serde(rename = "doubleclick")]
    DoubleClick,
    #[serde(rename = "key")]
    Key,
    #[serde(rename = "system")]
    System,
    #[serde(rename = "dragstart")]
    DragStart,
    #[serde(rename = "drag")]
    Drag,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::PointerMove,
        EventKind::PointerDown,
        EventKind::PointerUp,
        EventKind::Click,
        EventKind::DoubleClick,
        EventKind::Key,
        EventKind::System,
        EventKind::DragStart,
        EventKind::Drag,
    ];

    /// Wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PointerMove => "mousemove",
            EventKind::PointerDown => "mousedown",
            EventKind::PointerUp => "mouseup",
            EventKind::Click => "click",
            EventKind::DoubleClick => "doubleclick",
            EventKind::Key => "key",
            EventKind::System => "system",
            EventKind::DragStart => "dragstart",
            EventKind::Drag => "drag",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single discrete input event as produced by the event source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    #[serde(rename = "event_type")]
    pub kind: EventKind,
    /// Bracketed-tag label, e.g. `@Key[Ctrl+S]`
    pub label: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl InputEvent {
    pub fn new(kind: EventKind, label: impl Into<String>, timestamp: u64) -> Self {
        Self {
            kind,
            label: label.into(),
            timestamp,
        }
    }
}

/// One visual row of the overlay log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogItem {
    pub id: Uuid,
    /// Most recently merged event for this row
    pub event: InputEvent,
    /// Number of raw events collapsed into this row (always >= 1)
    pub repeat_count: u32,
    /// Row is a growing word of single-character key presses
    pub is_typing_sequence: bool,
}

impl LogItem {
    pub(crate) fn new(event: InputEvent, is_typing_sequence: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            repeat_count: 1,
            is_typing_sequence,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind
    }
}

/// Bounded, insertion-ordered log of overlay rows (oldest first)
///
/// Only the reconciliation engine mutates the log; everyone else sees
/// read-only snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    items: Vec<LogItem>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[LogItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogItem> {
        self.items.iter()
    }

    pub fn last(&self) -> Option<&LogItem> {
        self.items.last()
    }

    /// Append a row, evicting from the front once the capacity is exceeded.
    ///
    /// Returns the number of evicted rows.
    pub(crate) fn push(&mut self, item: LogItem) -> usize {
        self.items.push(item);
        let overflow = self.items.len().saturating_sub(LOG_CAPACITY);
        if overflow > 0 {
            self.items.drain(..overflow);
        }
        overflow
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut LogItem> {
        self.items.last_mut()
    }

    pub(crate) fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&LogItem) -> bool,
    {
        self.items.retain(keep);
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a LogItem;
    type IntoIter = std::slice::Iter<'a, LogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
