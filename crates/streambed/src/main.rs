//! Streambed
//!
//! Headless subscribe harness: reads the stored testbed configuration,
//! asks the stream manager for an edge server, subscribes to the stream
//! through the SDK seam, and unsubscribes on shutdown.

use std::sync::Arc;
use streambed::config::Config;
use streambed::testbed::Testbed;
use subscriber::mock::MockSdk;
use subscriber::status::LogStatusSink;
use subscriber::view::LogVideoSink;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streambed=debug,subscriber=debug,common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting streambed");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        session_store = %config.session_store_path.display(),
        secure = config.secure,
        "Configuration loaded successfully"
    );

    // The scripted SDK stands in for the real playback transport; the log
    // sinks stand in for the video element and the page status field.
    let sdk = Arc::new(MockSdk::happy_path());
    let video = Arc::new(LogVideoSink::default());
    let status = Arc::new(LogStatusSink::default());

    let mut testbed = Testbed::new(&config, sdk, video, status);

    // Kick off.
    if let Err(e) = testbed.subscribe().await {
        error!(error = %e, "Could not subscribe with edge address");
    }

    shutdown_signal().await;

    // Clean up.
    testbed.unload().await;
    info!("Streambed shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
