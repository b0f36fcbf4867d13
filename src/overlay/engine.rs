//! Event log reconciliation
//!
//! Collapses the raw input stream into a short, readable list of overlay rows.
//! Each incoming event is matched against the last row (or, for synthesized
//! clicks, against recent rows) and either merged into it or appended as a
//! new row. The log never grows past
//! [`LOG_CAPACITY`](crate::overlay::types::LOG_CAPACITY) rows.

use crate::overlay::label::{
    first_bracket_group, is_alphanumeric_word, is_single_alphanumeric, key_content, wrap_key,
};
use crate::overlay::types::{EventKind, EventLog, InputEvent, LogItem};

/// Window within which a click supersedes its down/up pair, and a
/// double-click supersedes its clicks
pub const DEDUP_WINDOW_MS: u64 = 500;

/// Apply one event to the log and return the updated log.
///
/// When `paused` the event is dropped and the log is returned as-is.
pub fn apply(mut log: EventLog, event: InputEvent, paused: bool) -> EventLog {
    if paused {
        tracing::trace!("Overlay paused, dropping {} event", event.kind);
        return log;
    }

    match event.kind {
        EventKind::PointerMove => apply_pointer_move(&mut log, event),
        EventKind::Key => apply_key(&mut log, event),
        EventKind::Click => apply_click(
            &mut log,
            event,
            &[EventKind::PointerDown, EventKind::PointerUp],
        ),
        EventKind::DoubleClick => apply_click(
            &mut log,
            event,
            &[EventKind::PointerDown, EventKind::PointerUp, EventKind::Click],
        ),
        _ => append(&mut log, event, false),
    }

    log
}

fn append(log: &mut EventLog, event: InputEvent, is_typing_sequence: bool) {
    let evicted = log.push(LogItem::new(event, is_typing_sequence));
    if evicted > 0 {
        tracing::trace!("Evicted {} oldest overlay row(s)", evicted);
    }
}

fn apply_pointer_move(log: &mut EventLog, event: InputEvent) {
    match log.last_mut() {
        Some(last) if last.kind() == EventKind::PointerMove => {
            last.event = event;
            last.repeat_count += 1;
        }
        _ => append(log, event, false),
    }
}

fn apply_key(log: &mut EventLog, event: InputEvent) {
    let incoming = key_content(&event.label);
    let starts_word = is_single_alphanumeric(incoming);

    if let Some(last) = log.last_mut().filter(|last| last.kind() == EventKind::Key) {
        // Held key: the OS repeats the identical label
        if last.event.label == event.label {
            last.repeat_count += 1;
            return;
        }

        let typed = key_content(&last.event.label);
        if last.is_typing_sequence && is_alphanumeric_word(typed) && starts_word {
            let word = format!("{}{}", typed, incoming);
            last.event.label = wrap_key(&word);
            last.event.timestamp = event.timestamp;
            last.repeat_count = 1;
            return;
        }
    }

    append(log, event, starts_word);
}

/// Append a synthesized click, first dropping the raw rows it was built from.
fn apply_click(log: &mut EventLog, event: InputEvent, superseded: &[EventKind]) {
    let Some(button) = first_bracket_group(&event.label) else {
        append(log, event, false);
        return;
    };

    let before = log.len();
    log.retain(|item| {
        let redundant = item.event.timestamp.abs_diff(event.timestamp) < DEDUP_WINDOW_MS
            && superseded.contains(&item.kind())
            && item.event.label.contains(button);
        !redundant
    });

    let dropped = before - log.len();
    if dropped > 0 {
        tracing::trace!("{} superseded {} row(s) for {}", event.kind, dropped, button);
    }

    append(log, event, false);
}
