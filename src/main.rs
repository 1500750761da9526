//! # IBUS TX
//!
//! Encode and periodically broadcast FlySky IBUS RC channel frames.
//!
//! This binary runs the broadcaster with all channels centered and logs
//! delivery progress. It is a demo of the library wiring; a real transport
//! would register a listener that writes the frame bytes to a serial port.

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use ibus_tx::broadcast::Broadcaster;
use ibus_tx::config::Config;

/// Number of frames between status log messages
const LOG_INTERVAL_FRAMES: u64 = 1000;

/// Main entry point for the IBUS TX demo
///
/// # Control Flow
///
/// 1. Set up logging with tracing subscriber
/// 2. Load configuration from the path given as the first argument, or fall
///    back to defaults if none is given
/// 3. Start the broadcaster with a frame-counting listener
/// 4. Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if the configuration file cannot be loaded or validated.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("IBUS TX v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load(path)?
        }
        None => {
            debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let interval_ms = config.broadcast.interval_ms.max(7);
    let mut ibus = Broadcaster::new(config);

    let frame_count = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&frame_count);

    ibus.start(
        None,
        Some(Box::new(move |frame: &[u8]| {
            let sent = counter.fetch_add(1, Ordering::Relaxed) + 1;
            if sent % LOG_INTERVAL_FRAMES == 0 {
                info!("Broadcast {} frames ({} bytes each)", sent, frame.len());
            }
        })),
    )?;

    info!("Broadcasting IBUS frames every {}ms", interval_ms);
    info!("Press Ctrl+C to exit");

    tokio::signal::ctrl_c().await?;

    info!("Received Ctrl+C, shutting down...");
    ibus.stop();
    info!("Total frames broadcast: {}", frame_count.load(Ordering::Relaxed));

    Ok(())
}
