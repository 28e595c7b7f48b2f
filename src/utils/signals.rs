//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{error, info};

/// Resolve on the first SIGTERM or SIGINT.
///
/// If the handlers cannot be installed this never resolves and the default
/// signal disposition applies.
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to install signal handlers: {}", e);
            return std::future::pending().await;
        }
    };

    if let Some(signal) = signals.next().await {
        let name = if signal == SIGTERM { "SIGTERM" } else { "SIGINT" };
        info!("Received {}", name);
    }
    signals.handle().close();
}
