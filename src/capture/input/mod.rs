//! Keyboard and mouse input capture
//!
//! Translates the raw stream of an OS input hook into overlay events and
//! forwards them from a dedicated worker thread.

pub mod channel;
pub mod keymap;
pub mod translator;
pub mod types;

pub use channel::InputCaptureChannel;
pub use translator::{InputTranslator, TranslatorConfig};
pub use types::{Button, Key, RawInput, TimedInput};
