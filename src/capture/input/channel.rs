use crate::capture::channel::{CaptureChannel, CaptureError, CaptureResult, RawInputSource};
use crate::capture::input::translator::{InputTranslator, TranslatorConfig};
use crate::overlay::{InputEvent, OverlaySession};
use async_trait::async_trait;
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long the worker waits on the source before re-checking the running flag
const POLL_INTERVAL: Duration = Duration::from_millis(25);

type SharedSource = Arc<ParkingMutex<Option<Box<dyn RawInputSource>>>>;

pub struct InputCaptureChannel {
    id: String,
    config: TranslatorConfig,
    is_running: Arc<AtomicBool>,
    source: SharedSource,
    events: mpsc::Sender<InputEvent>,
    failures: Option<Arc<OverlaySession>>,
    forwarded: Arc<AtomicUsize>,
    dropped: Arc<AtomicUsize>,
    thread_handle: Option<JoinHandle<()>>,
}

impl InputCaptureChannel {
    pub fn new(config: TranslatorConfig, events: mpsc::Sender<InputEvent>) -> Self {
        Self {
            id: "input".to_string(),
            config,
            is_running: Arc::new(AtomicBool::new(false)),
            source: Arc::new(ParkingMutex::new(None)),
            events,
            failures: None,
            forwarded: Arc::new(AtomicUsize::new(0)),
            dropped: Arc::new(AtomicUsize::new(0)),
            thread_handle: None,
        }
    }

    /// Attach the raw input source the worker reads from
    pub fn with_source(self, source: impl RawInputSource) -> Self {
        *self.source.lock() = Some(Box::new(source));
        self
    }

    /// Surface source failures on `session` instead of only logging them
    pub fn report_failures_to(mut self, session: Arc<OverlaySession>) -> Self {
        self.failures = Some(session);
        self
    }

    /// Number of overlay events forwarded since creation
    pub fn forwarded(&self) -> usize {
        self.forwarded.load(Ordering::SeqCst)
    }

    /// Number of overlay events dropped because the overlay fell behind
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureChannel for InputCaptureChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn start(&mut self) -> CaptureResult<()> {
        if self.is_running.load(Ordering::SeqCst) {
            return Err(CaptureError::AlreadyRunning);
        }
        // Reap a worker that ended on its own (source failure)
        if let Some(handle) = self.thread_handle.take() {
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
        }

        if self.source.lock().is_none() {
            return Err(CaptureError::ConfigurationError(
                "No input source attached".to_string(),
            ));
        }

        self.is_running.store(true, Ordering::SeqCst);

        let worker = Worker {
            config: self.config,
            is_running: self.is_running.clone(),
            source: self.source.clone(),
            events: self.events.clone(),
            failures: self.failures.clone(),
            forwarded: self.forwarded.clone(),
            dropped: self.dropped.clone(),
        };
        self.thread_handle = Some(std::thread::spawn(move || worker.run()));

        tracing::info!("Input capture started ({:?})", self.config);
        Ok(())
    }

    async fn stop(&mut self) -> CaptureResult<()> {
        if !self.is_running.load(Ordering::SeqCst) {
            return Ok(());
        }

        self.is_running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.thread_handle.take() {
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
        }

        tracing::info!(
            "Input capture stopped (forwarded={}, dropped={})",
            self.forwarded(),
            self.dropped()
        );
        Ok(())
    }

    async fn pause(&mut self) -> CaptureResult<()> {
        self.stop().await
    }

    async fn resume(&mut self) -> CaptureResult<()> {
        self.start().await
    }

    fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }
}

struct Worker {
    config: TranslatorConfig,
    is_running: Arc<AtomicBool>,
    source: SharedSource,
    events: mpsc::Sender<InputEvent>,
    failures: Option<Arc<OverlaySession>>,
    forwarded: Arc<AtomicUsize>,
    dropped: Arc<AtomicUsize>,
}

impl Worker {
    fn run(self) {
        {
            let mut source = self.source.lock();
            if let Some(input) = source.as_mut() {
                if let Err(e) = self.capture(input.as_mut()) {
                    tracing::error!("Input capture failed: {}", e);
                    if let Some(session) = &self.failures {
                        session.report_failure(e.to_string());
                    }
                    if matches!(e, CaptureError::SourceDisconnected) {
                        *source = None;
                    }
                }
            }
        }

        // Source lock released before a restart can observe the flag
        self.is_running.store(false, Ordering::SeqCst);
    }

    /// Forward translated input until stopped, the receiver goes away, or
    /// the source fails.
    ///
    /// Never blocks on the overlay: events that do not fit in the channel
    /// are dropped.
    fn capture(&self, input: &mut dyn RawInputSource) -> CaptureResult<()> {
        let mut translator = InputTranslator::new(self.config);

        while self.is_running.load(Ordering::Relaxed) {
            let Some(timed) = input.poll_input(POLL_INTERVAL)? else {
                continue;
            };
            for event in translator.translate(timed) {
                match self.events.try_send(event) {
                    Ok(()) => {
                        self.forwarded.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(mpsc::error::TrySendError::Full(event)) => {
                        tracing::debug!("Overlay behind, dropping {} event", event.kind);
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        tracing::info!("Overlay receiver dropped, ending input capture");
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::channel::ChannelRawSource;
    use crate::capture::input::types::{Button, Key, RawInput, TimedInput};

    async fn wait_until_stopped(channel: &InputCaptureChannel) {
        for _ in 0..200 {
            if !channel.is_running() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("capture worker did not stop");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_raw_input_reaches_overlay() {
        let session = Arc::new(OverlaySession::new());
        let (tx, rx) = mpsc::channel(64);
        let (raw, source) = ChannelRawSource::channel();

        let mut channel = InputCaptureChannel::new(TranslatorConfig::default(), tx)
            .with_source(source)
            .report_failures_to(session.clone());
        let pump = tokio::spawn(session.clone().run(rx));

        channel.start().await.unwrap();
        assert!(channel.is_running());

        let inputs = vec![
            RawInput::MouseMove { x: 10.0, y: 10.0 },
            RawInput::ButtonPress { button: Button::Left },
            RawInput::ButtonRelease { button: Button::Left },
            RawInput::KeyPress { key: Key::KeyH, name: Some("h".to_string()) },
            RawInput::KeyPress { key: Key::KeyI, name: Some("i".to_string()) },
        ];
        for (i, input) in inputs.into_iter().enumerate() {
            raw.send(TimedInput::new(input, 1_000 + i as u64 * 10)).unwrap();
        }
        drop(raw);

        wait_until_stopped(&channel).await;
        assert_eq!(channel.forwarded(), 6);
        assert_eq!(session.notice().as_deref(), Some("Input source disconnected"));
        // The disconnected source is gone; a restart must not start a worker
        assert!(matches!(
            channel.start().await,
            Err(CaptureError::ConfigurationError(_))
        ));
        assert!(!channel.is_running());

        drop(channel);
        assert_eq!(pump.await.unwrap(), 6);

        let labels: Vec<String> = session
            .snapshot()
            .iter()
            .map(|item| item.event.label.clone())
            .collect();
        assert_eq!(labels, vec!["@MouseMove[10, 10]", "@Click[Left]", "@Key[hi]"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_lifecycle_errors() {
        let (tx, _rx) = mpsc::channel(8);
        let mut bare = InputCaptureChannel::new(TranslatorConfig::default(), tx.clone());
        assert!(matches!(
            bare.start().await,
            Err(CaptureError::ConfigurationError(_))
        ));
        assert!(bare.stop().await.is_ok());

        let (_raw, source) = ChannelRawSource::channel();
        let mut channel = InputCaptureChannel::new(TranslatorConfig::default(), tx)
            .with_source(source);
        assert_eq!(channel.id(), "input");

        channel.start().await.unwrap();
        assert!(matches!(channel.start().await, Err(CaptureError::AlreadyRunning)));

        channel.pause().await.unwrap();
        assert!(!channel.is_running());
        channel.resume().await.unwrap();
        assert!(channel.is_running());
        channel.stop().await.unwrap();
        assert!(!channel.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_returns_when_overlay_stops_reading() {
        let (tx, _rx) = mpsc::channel(2);
        let (raw, source) = ChannelRawSource::channel();
        let mut channel = InputCaptureChannel::new(TranslatorConfig::default(), tx)
            .with_source(source);
        channel.start().await.unwrap();

        for i in 0..10u64 {
            let input = RawInput::MouseMove { x: i as f64 * 20.0, y: 0.0 };
            raw.send(TimedInput::new(input, 1_000 + i)).unwrap();
        }
        for _ in 0..200 {
            if channel.forwarded() + channel.dropped() == 10 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let stopped = tokio::time::timeout(Duration::from_secs(3), channel.stop()).await;
        assert!(stopped.is_ok(), "stop() hung on a full overlay channel");
        assert!(!channel.is_running());
        assert_eq!(channel.forwarded(), 2);
        assert_eq!(channel.dropped(), 8);
    }

    struct DeniedSource {
        polls: Arc<AtomicUsize>,
    }

    impl RawInputSource for DeniedSource {
        fn poll_input(&mut self, _timeout: Duration) -> CaptureResult<Option<TimedInput>> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            Err(CaptureError::PermissionDenied("accessibility".to_string()))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_permission_denied_reaches_notice() {
        let session = Arc::new(OverlaySession::new());
        let polls = Arc::new(AtomicUsize::new(0));
        let (tx, _rx) = mpsc::channel(8);
        let mut channel = InputCaptureChannel::new(TranslatorConfig::default(), tx)
            .with_source(DeniedSource { polls: polls.clone() })
            .report_failures_to(session.clone());

        channel.start().await.unwrap();
        wait_until_stopped(&channel).await;
        assert_eq!(session.notice().as_deref(), Some("Permission denied: accessibility"));
        assert!(session.snapshot().is_empty());

        // The source is kept, so capture can be retried once access is granted
        channel.start().await.unwrap();
        wait_until_stopped(&channel).await;
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }
}
