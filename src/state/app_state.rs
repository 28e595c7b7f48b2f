//! Shared server state

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    auth::AdminGate,
    clock::SystemClock,
    display::{self, CountdownDisplay, DisplayEngine, LiveCountdown, PushReminderDisplay},
    error::{TimerError, TimerResult},
    store::TimerStore,
    sync::SyncService,
};

/// Everything the HTTP handlers need
#[derive(Debug)]
pub struct AppState<S> {
    /// Sole writer of the timer records
    pub service: SyncService<S>,
    pub gate: AdminGate,
    /// Live displays kept current by store subscriptions
    pub countdown: LiveCountdown<CountdownDisplay>,
    pub push_reminder: LiveCountdown<PushReminderDisplay>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last admin command and when it ran
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl<S: TimerStore> AppState<S> {
    /// Subscribe the live displays and assemble the state
    pub async fn new(
        store: Arc<S>,
        gate: AdminGate,
        refresh: Duration,
        port: u16,
        host: String,
    ) -> TimerResult<Self> {
        let service = SyncService::new(store);
        let engine = DisplayEngine::new(Arc::new(SystemClock), refresh);
        let countdown = display::main_countdown(&service, &engine).await?;
        let push_reminder = display::push_reminder(&service, &engine).await?;
        info!("Live displays attached (refresh every {:?})", engine.refresh());

        Ok(Self {
            service,
            gate,
            countdown,
            push_reminder,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        })
    }

    /// Check an admin key taken from a request
    pub fn authorize(&self, key: Option<&str>) -> TimerResult<()> {
        let result = match key {
            Some(key) => self.gate.verify(key),
            None => Err(TimerError::AuthMismatch),
        };
        if result.is_err() {
            warn!("Rejected admin request with a missing or wrong key");
        }
        result
    }
}

impl<S> AppState<S> {
    /// Remember the last admin command
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        match (secs / 3600, secs % 3600 / 60, secs % 60) {
            (0, 0, s) => format!("{}s", s),
            (0, m, s) => format!("{}m {}s", m, s),
            (h, m, s) => format!("{}h {}m {}s", h, m, s),
        }
    }
}
