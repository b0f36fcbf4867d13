//! Overlay session
//!
//! Owns the log of one overlay instance and serializes every reconciliation
//! step on it. Each accepted event replaces the log wholesale (read the old
//! log, compute the new one, swap it in) and publishes the new snapshot to
//! subscribers.

use crate::overlay::engine::apply;
use crate::overlay::types::{EventLog, InputEvent};
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

pub struct OverlaySession {
    log: ParkingMutex<EventLog>,
    paused: AtomicBool,
    notice: ParkingMutex<Option<String>>,
    updates: watch::Sender<EventLog>,
}

impl Default for OverlaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySession {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(EventLog::new());
        Self {
            log: ParkingMutex::new(EventLog::new()),
            paused: AtomicBool::new(false),
            notice: ParkingMutex::new(None),
            updates,
        }
    }

    /// Receive a fresh snapshot after every accepted event
    pub fn subscribe(&self) -> watch::Receiver<EventLog> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> EventLog {
        self.log.lock().clone()
    }

    pub fn set_paused(&self, paused: bool) {
        let was = self.paused.swap(paused, Ordering::SeqCst);
        if was != paused {
            tracing::info!("Overlay {}", if paused { "paused" } else { "resumed" });
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Reconcile one event into the log and return the resulting snapshot.
    ///
    /// Calls from different threads are serialized on the log lock.
    pub fn handle(&self, event: InputEvent) -> EventLog {
        let mut log = self.log.lock();
        let paused = self.is_paused();
        let next = apply(std::mem::take(&mut *log), event, paused);
        *log = next.clone();

        if !paused {
            self.updates.send_replace(next.clone());
        }
        next
    }

    /// Record an upstream failure (permission denied, source gone).
    ///
    /// The message stays available through [`notice`](Self::notice) until
    /// cleared; the log is not touched.
    pub fn report_failure(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("Input source failure: {}", message);
        *self.notice.lock() = Some(message);
    }

    pub fn notice(&self) -> Option<String> {
        self.notice.lock().clone()
    }

    pub fn clear_notice(&self) {
        self.notice.lock().take();
    }

    /// Pump events from `events` until every sender is dropped.
    ///
    /// Returns the number of events received.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<InputEvent>) -> usize {
        let mut received = 0;
        while let Some(event) = events.recv().await {
            self.handle(event);
            received += 1;
        }
        tracing::info!("Overlay event stream closed after {} events", received);
        received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::types::{EventKind, LOG_CAPACITY};

    fn key(label: &str, ts: u64) -> InputEvent {
        InputEvent::new(EventKind::Key, label, ts)
    }

    #[test]
    fn test_handle_accumulates() {
        let session = OverlaySession::new();
        session.handle(key("@Key[h]", 0));
        let log = session.handle(key("@Key[i]", 10));

        assert_eq!(log.len(), 1);
        assert_eq!(session.snapshot(), log);
        assert_eq!(log.last().unwrap().event.label, "@Key[hi]");
    }

    #[test]
    fn test_paused_drops_events() {
        let session = OverlaySession::new();
        session.handle(key("@Key[a]", 0));
        let before = session.snapshot();

        session.set_paused(true);
        let during = session.handle(key("@Key[b]", 10));
        assert_eq!(during, before);
        assert_eq!(session.snapshot(), before);

        session.set_paused(false);
        let after = session.handle(key("@Key[c]", 20));
        assert_eq!(after.last().unwrap().event.label, "@Key[ac]");
    }

    #[test]
    fn test_subscribers_see_snapshots() {
        let session = OverlaySession::new();
        let updates = session.subscribe();
        assert!(updates.borrow().is_empty());

        session.handle(key("@Key[Esc]", 0));
        assert_eq!(updates.borrow().len(), 1);
    }

    #[test]
    fn test_failure_notice_leaves_log_alone() {
        let session = OverlaySession::new();
        session.handle(key("@Key[Tab]", 0));
        let before = session.snapshot();

        session.report_failure("Accessibility permission denied");
        assert_eq!(session.notice().as_deref(), Some("Accessibility permission denied"));
        assert_eq!(session.snapshot(), before);

        session.clear_notice();
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_concurrent_handles_respect_capacity() {
        let session = Arc::new(OverlaySession::new());
        let workers: Vec<_> = (0..4u64)
            .map(|worker| {
                let session = session.clone();
                std::thread::spawn(move || {
                    for i in 0..50u64 {
                        session.handle(InputEvent::new(
                            EventKind::System,
                            format!("worker {} event {}", worker, i),
                            worker * 1000 + i,
                        ));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(session.snapshot().len(), LOG_CAPACITY);
    }

    #[tokio::test]
    async fn test_run_pumps_until_closed() {
        let session = Arc::new(OverlaySession::new());
        let (tx, rx) = mpsc::channel(16);
        let pump = tokio::spawn(session.clone().run(rx));

        tx.send(InputEvent::new(EventKind::PointerMove, "@MouseMove[0, 0]", 0))
            .await
            .unwrap();
        tx.send(InputEvent::new(EventKind::PointerMove, "@MouseMove[4, 4]", 8))
            .await
            .unwrap();
        drop(tx);

        assert_eq!(pump.await.unwrap(), 2);
        let log = session.snapshot();
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().repeat_count, 2);
    }
}
