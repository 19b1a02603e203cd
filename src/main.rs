//! Segment Router resolver daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes.toml ──▶ config loader ──▶ validation ──▶ Router::from_config
//!        │                                                  │
//!        ▼                                                  ▼
//!   config watcher ──▶ apply_updates ──▶ Router::reload ─▶ ArcSwap<RouteTree>
//!                                                           │
//!   stdin (one path per line) ─────────▶ Router::match_path ┘
//!                                              │
//!   stdout (one JSON line per path) ◀──────────┘
//! ```
//!
//! Logs go to stderr. Ctrl-C, SIGTERM or end of input stop the daemon.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use segment_router::config::ConfigWatcher;
use segment_router::lifecycle::{signals, startup, Shutdown, ShutdownReason};
use segment_router::routing::PathResolution;

#[derive(Parser)]
#[command(name = "segment-router")]
#[command(about = "Resolve request paths read from stdin against a route table", long_about = None)]
struct Args {
    /// Route table (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Do not reload the route table when the file changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let services = startup::start(&args.config)?;
    let router = services.router;
    tracing::info!("segment-router v0.1.0 started");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    // Keep the watcher handle alive for the whole run.
    let _watcher = if args.no_watch {
        None
    } else {
        let (watcher, updates) = ConfigWatcher::new(&args.config);
        let handle = watcher.run()?;
        tokio::spawn(startup::apply_updates(
            router.clone(),
            updates,
            shutdown.subscribe(),
        ));
        Some(handle)
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut stop = shutdown.subscribe();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = stop.recv() => break,
        };
        let Some(line) = line else {
            shutdown.trigger(ShutdownReason::EndOfInput);
            break;
        };

        let path = line.trim();
        if path.is_empty() {
            continue;
        }

        let resolution = PathResolution::new(path, router.match_path(path));
        let mut out = serde_json::to_vec(&resolution)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    tracing::info!(reason = ?shutdown.reason(), "Shutdown complete");
    Ok(())
}
