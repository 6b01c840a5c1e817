//! Session Clock - A work/break countdown timer with a local HTTP control surface
//! 
//! This is the main entry point for the session-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use session_clock::{
    config::Config,
    state::{AppState, SessionClock},
    api::create_router,
    persistence::{FileStorage, MemoryStorage, SnapshotStore, Storage},
    scheduler::IntervalScheduler,
    tasks::{display_task, tick_driver_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("session_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting session-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, break={}min",
          config.host, config.port, config.work, config.break_minutes);

    // Pick where the snapshot lives
    let storage: Box<dyn Storage + Send + Sync> = match config.state_dir() {
        Some(dir) => {
            info!("Snapshot directory: {}", dir.display());
            Box::new(FileStorage::new(dir))
        }
        None => {
            info!("Snapshot persistence disabled, keeping state in memory");
            Box::new(MemoryStorage::new())
        }
    };
    let store = SnapshotStore::new(storage);

    // Restore the previous session, paused
    let snapshot = store.load_or_default();
    match snapshot {
        Some(snapshot) => info!("Restored {} phase with {}s remaining",
                                snapshot.phase, snapshot.remaining_seconds),
        None => info!("No saved session, starting fresh"),
    }

    let (scheduler, ticks) = IntervalScheduler::channel();
    let clock = SessionClock::restore(config.durations(), snapshot, scheduler);
    let state = Arc::new(AppState::new(config.port, config.host.clone(), clock));

    // Start the tick driver and display background tasks
    tokio::spawn(tick_driver_task(Arc::clone(&state), ticks));
    tokio::spawn(display_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start            - Start the countdown");
    info!("  POST /pause            - Pause the countdown");
    info!("  POST /reset            - Reset to a full work phase");
    info!("  PUT  /duration/:phase  - Set work or break length in minutes");
    info!("  GET  /clock            - Current readout and progress");
    info!("  GET  /status           - Clock and server status");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Save the session for the next start
    match state.snapshot() {
        Ok(snapshot) => {
            store.save_best_effort(&snapshot);
            info!("Saved {} phase with {}s remaining",
                  snapshot.phase, snapshot.remaining_seconds);
        }
        Err(e) => warn!("Could not read clock for snapshot: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
