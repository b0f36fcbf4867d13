//! EchoCast - keyboard and mouse input overlay for screen recordings.
//!
//! The library turns a raw input stream into the short list of rows the
//! overlay shows: [`capture`] translates OS hook input into labelled events,
//! [`overlay`] reconciles those events into a bounded log, and [`settings`]
//! holds the user preferences both sides read.

pub mod capture;
pub mod overlay;
pub mod settings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
///
/// Honors `RUST_LOG`; defaults to debug output for this crate. Logs go to
/// stderr so they never mix with overlay output on stdout.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echocast=debug,echocast_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
