//! Overlay event log
//!
//! Reconciles the input event stream into the bounded list of rows the
//! overlay displays, and exposes the helpers the presentation layer needs to
//! render it.

pub mod engine;
pub mod filter;
pub mod label;
pub mod session;
pub mod types;

pub use engine::{apply, DEDUP_WINDOW_MS};
pub use filter::KindFilter;
pub use label::display_label;
pub use session::OverlaySession;
pub use types::{EventKind, EventLog, InputEvent, LogItem, LOG_CAPACITY};
