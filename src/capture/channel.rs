//! Capture channel trait
//!
//! Defines the interface shared by input capture channels and the seam to
//! the native OS hook.

use crate::capture::input::types::TimedInput;
use async_trait::async_trait;
use std::sync::mpsc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while capturing input
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Already running")]
    AlreadyRunning,

    #[error("Input source disconnected")]
    SourceDisconnected,

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Trait for capture channels
///
/// A channel owns a worker that reads from an input source and forwards
/// overlay events until stopped.
#[async_trait]
pub trait CaptureChannel: Send + Sync {
    /// Get the channel identifier (e.g., "input")
    fn id(&self) -> &str;

    /// Start capturing
    async fn start(&mut self) -> CaptureResult<()>;

    /// Stop capturing
    async fn stop(&mut self) -> CaptureResult<()>;

    /// Pause capturing
    async fn pause(&mut self) -> CaptureResult<()>;

    /// Resume capturing after a pause
    async fn resume(&mut self) -> CaptureResult<()>;

    /// Check if the channel is currently capturing
    fn is_running(&self) -> bool;
}

/// Source of raw input, usually a native OS hook
///
/// Polled from a dedicated worker thread.
pub trait RawInputSource: Send + 'static {
    /// Wait up to `timeout` for the next input.
    ///
    /// `Ok(None)` means nothing arrived in time; an error ends the capture.
    fn poll_input(&mut self, timeout: Duration) -> CaptureResult<Option<TimedInput>>;
}

/// Raw input source fed through a std channel
///
/// Lets a hook running on its own thread (or a test) push input into a
/// capture channel.
pub struct ChannelRawSource {
    receiver: mpsc::Receiver<TimedInput>,
}

impl ChannelRawSource {
    pub fn channel() -> (mpsc::Sender<TimedInput>, Self) {
        let (sender, receiver) = mpsc::channel();
        (sender, Self { receiver })
    }
}

impl RawInputSource for ChannelRawSource {
    fn poll_input(&mut self, timeout: Duration) -> CaptureResult<Option<TimedInput>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(input) => Ok(Some(input)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(CaptureError::SourceDisconnected),
        }
    }
}
