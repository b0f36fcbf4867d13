//! EchoCast replay tool
//!
//! Feeds a recorded input stream (JSON lines) through the overlay and prints
//! the rows the overlay would show after every event.

use anyhow::{Context, Result};
use clap::Parser;
use echocast::capture::{InputTranslator, TranslatorConfig};
use echocast::capture::input::TimedInput;
use echocast::overlay::{display_label, EventLog, InputEvent, KindFilter, OverlaySession};
use echocast::settings::{load_settings, load_settings_from_path};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Replay recorded input through the EchoCast overlay
#[derive(Parser, Debug)]
#[command(name = "echocast-replay")]
#[command(about = "Replay recorded input events through the overlay log", long_about = None)]
#[command(version)]
struct Args {
    /// JSON-lines file to replay (default: stdin)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Lines are raw hook input to translate first, not overlay events
    #[arg(long)]
    raw: bool,

    /// Settings file (default: ~/.echocast/settings.json)
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Show every event kind, ignoring the configured filters
    #[arg(long)]
    all: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    echocast::init_tracing();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => load_settings_from_path(path),
        None => load_settings(),
    }
    .context("Failed to load settings")?;
    let filter = if args.all {
        KindFilter::show_all()
    } else {
        settings.filters.clone()
    };

    let reader: Box<dyn AsyncBufRead + Unpin> = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let session = OverlaySession::new();
    let mut translator = args
        .raw
        .then(|| InputTranslator::new(TranslatorConfig::from(&settings)));

    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut accepted = 0usize;
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let events: Vec<InputEvent> = match translator.as_mut() {
            Some(translator) => {
                let timed: TimedInput = serde_json::from_str(line)
                    .with_context(|| format!("Invalid raw input on line {}", line_no))?;
                translator.translate(timed)
            }
            None => vec![serde_json::from_str(line)
                .with_context(|| format!("Invalid input event on line {}", line_no))?],
        };

        for event in events {
            let header = format!("{} @ {}", event.kind, event.timestamp);
            let log = session.handle(event);
            accepted += 1;
            print_rows(&header, &log, &filter);
        }
    }

    tracing::info!("Replayed {} events from {} lines", accepted, line_no);
    Ok(())
}

fn print_rows(header: &str, log: &EventLog, filter: &KindFilter) {
    println!("--- {}", header);
    for item in filter.visible(log) {
        let text = display_label(&item.event.label);
        if item.repeat_count > 1 {
            println!("  {} x{}", text, item.repeat_count);
        } else {
            println!("  {}", text);
        }
    }
}
