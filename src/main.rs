//! Countdown Sync - a synchronized countdown server
//!
//! This is the main entry point for the countdown-sync application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use countdown_sync::{
    api::create_router,
    auth::{hash_secret, AdminGate},
    clock::SystemClock,
    config::Config,
    state::AppState,
    store::{FileStore, MemoryStore, TimerStore},
    tasks::{console_countdown_task, push_cycle_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    if let Some(secret) = &config.hash_key {
        println!("{}", hash_secret(secret));
        return Ok(());
    }

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_sync={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-sync server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, refresh={}Hz, state_file={:?}",
        config.host, config.port, config.refresh_hz, config.state_file
    );

    let hash = config
        .admin_key_hash
        .as_deref()
        .context("An admin key hash is required (see --hash-key)")?;
    let gate = AdminGate::from_hex(hash).map_err(anyhow::Error::msg)?;

    match config.state_file.clone() {
        Some(path) => {
            let store = FileStore::open(&path)
                .await
                .with_context(|| format!("Failed to open state file {}", path.display()))?;
            info!("Timer state is persisted to {}", store.path().display());
            serve(config, Arc::new(store), gate).await
        }
        None => {
            info!("No state file given, timer state is kept in memory");
            serve(config, Arc::new(MemoryStore::new()), gate).await
        }
    }
}

async fn serve<S: TimerStore>(config: Config, store: Arc<S>, gate: AdminGate) -> anyhow::Result<()> {
    // Create application state with live displays
    let state = Arc::new(
        AppState::new(store, gate, config.refresh_interval(), config.port, config.host.clone())
            .await
            .context("Failed to attach to the timer store")?,
    );

    // Keep the push cycle derived from the main timer
    tokio::spawn(push_cycle_task(state.service.clone()));

    if config.console {
        tokio::spawn(console_countdown_task(state.countdown.frames(), Arc::new(SystemClock)));
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /status                  - Live countdown and push reminder");
    info!("  GET  /timer                   - Stored timer record");
    info!("  GET  /push-cycle              - Stored push cycle record");
    info!("  POST /admin/login             - Check the admin key");
    info!("  POST /admin/start             - Start the countdown");
    info!("  POST /admin/stop              - Pause the countdown");
    info!("  POST /admin/reset             - Reset to 24 hours");
    info!("  POST /admin/custom            - Set a custom duration");
    info!("  POST /admin/push-cycle/reset  - Open the next push window");
    info!("  GET  /health                  - Health check");

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

    info!("Server shutdown complete");
    Ok(())
}
