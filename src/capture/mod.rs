//! Input capture
//!
//! The native OS hook is not part of this crate; it plugs in through
//! [`RawInputSource`].

pub mod channel;
pub mod input;

pub use channel::{CaptureChannel, CaptureError, CaptureResult, ChannelRawSource, RawInputSource};
pub use input::{InputCaptureChannel, InputTranslator, TranslatorConfig};
