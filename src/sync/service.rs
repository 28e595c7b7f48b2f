//! Synchronization service: the only writer of timer records

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::Subscription;
use crate::{
    clock::{Clock, SystemClock},
    error::{TimerError, TimerResult},
    state::{CustomDuration, MainTimerState, PushCycleState},
    store::{RecordKey, TimerStore},
};

/// Result of an admin command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome<T> {
    /// Record as it stands after the command
    pub state: T,
    /// False when the command was a no-op
    pub applied: bool,
}

impl<T> CommandOutcome<T> {
    fn applied(state: T) -> Self {
        Self { state, applied: true }
    }

    fn unchanged(state: T) -> Self {
        Self { state, applied: false }
    }
}

/// Reads and writes the main timer record and derives the push cycle.
///
/// Commands do a plain read-modify-write against the store. Two admins
/// acting at the same moment can race; the store keeps the last write.
pub struct SyncService<S, C = SystemClock> {
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for SyncService<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> std::fmt::Debug for SyncService<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService").finish_non_exhaustive()
    }
}

impl<S: TimerStore> SyncService<S, SystemClock> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }
}

impl<S: TimerStore, C: Clock> SyncService<S, C> {
    pub fn with_clock(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// Read the main timer, falling back to the default when absent
    pub async fn read_main(&self) -> TimerResult<MainTimerState> {
        let value = self.store.get(RecordKey::Timer).await?;
        Ok(decode::<MainTimerState>(RecordKey::Timer, value)?.unwrap_or_default())
    }

    /// Read the push cycle, `None` when it was never written
    pub async fn read_push_cycle(&self) -> TimerResult<Option<PushCycleState>> {
        let value = self.store.get(RecordKey::PushCycle).await?;
        decode(RecordKey::PushCycle, value)
    }

    /// Start the countdown from the stored remaining time
    pub async fn start(&self) -> TimerResult<CommandOutcome<MainTimerState>> {
        let current = self.read_main().await?;
        match current.started(self.clock.now_ms()) {
            Some(next) => {
                self.write(RecordKey::Timer, &next).await?;
                info!("Timer started, due at {:?}", next.end_time);
                Ok(CommandOutcome::applied(next))
            }
            None => {
                debug!("Start ignored, timer already running");
                Ok(CommandOutcome::unchanged(current))
            }
        }
    }

    /// Pause the countdown, freezing the time left
    pub async fn stop(&self) -> TimerResult<CommandOutcome<MainTimerState>> {
        let current = self.read_main().await?;
        match current.stopped_at(self.clock.now_ms()) {
            Some(next) => {
                self.write(RecordKey::Timer, &next).await?;
                info!("Timer stopped with {}ms remaining", next.remaining_time);
                Ok(CommandOutcome::applied(next))
            }
            None => {
                debug!("Stop ignored, timer already stopped");
                Ok(CommandOutcome::unchanged(current))
            }
        }
    }

    /// Put the default 24 hour state back
    pub async fn reset(&self) -> TimerResult<CommandOutcome<MainTimerState>> {
        let next = MainTimerState::default();
        self.write(RecordKey::Timer, &next).await?;
        info!("Timer reset to {}ms", next.remaining_time);
        Ok(CommandOutcome::applied(next))
    }

    /// Replace the timer with a stopped custom duration
    pub async fn set_custom(&self, duration: CustomDuration) -> TimerResult<CommandOutcome<MainTimerState>> {
        let total_ms = duration.total_ms().map_err(|e| {
            warn!("Rejected custom duration {:?}", duration);
            e
        })?;
        let next = MainTimerState::stopped(total_ms);
        self.write(RecordKey::Timer, &next).await?;
        info!(
            "Timer set to {}h {}m {}s ({}ms)",
            duration.hours, duration.minutes, duration.seconds, total_ms
        );
        Ok(CommandOutcome::applied(next))
    }

    /// Open the next push window now, regardless of the main timer
    pub async fn reset_push_cycle(&self) -> TimerResult<CommandOutcome<PushCycleState>> {
        let now = self.clock.now_ms();
        let current = self
            .read_push_cycle()
            .await?
            .unwrap_or_else(|| PushCycleState::fresh(now));
        let next = current.advanced(now);
        self.write(RecordKey::PushCycle, &next).await?;
        info!("Push cycle advanced to push #{}", next.push_number);
        Ok(CommandOutcome::applied(next))
    }

    /// Derive the push cycle from `main` and write it
    pub async fn derive_and_publish_push_cycle(&self, main: &MainTimerState) -> TimerResult<PushCycleState> {
        let cycle = PushCycleState::derive(main, self.clock.now_ms());
        self.write(RecordKey::PushCycle, &cycle).await?;
        debug!(
            "Published push cycle #{} ending at {} (running={})",
            cycle.push_number, cycle.end_time, main.is_running
        );
        Ok(cycle)
    }

    /// Call `on_change` with the main timer now and after every change.
    ///
    /// Malformed snapshots are logged and skipped so the last good state
    /// stays with the caller.
    pub async fn subscribe_main<F>(&self, mut on_change: F) -> TimerResult<Subscription>
    where
        F: FnMut(MainTimerState) + Send + 'static,
    {
        let rx = self.store.subscribe(RecordKey::Timer).await?;
        Ok(Subscription::spawn(RecordKey::Timer, rx, move |value| {
            match decode::<MainTimerState>(RecordKey::Timer, value) {
                Ok(state) => on_change(state.unwrap_or_default()),
                Err(e) => warn!("Skipping timer update: {}", e),
            }
        }))
    }

    /// Call `on_change` with the push cycle now and after every change
    pub async fn subscribe_push_cycle<F>(&self, mut on_change: F) -> TimerResult<Subscription>
    where
        F: FnMut(PushCycleState) + Send + 'static,
    {
        let rx = self.store.subscribe(RecordKey::PushCycle).await?;
        let clock = Arc::clone(&self.clock);
        Ok(Subscription::spawn(RecordKey::PushCycle, rx, move |value| {
            match decode::<PushCycleState>(RecordKey::PushCycle, value) {
                Ok(state) => on_change(state.unwrap_or_else(|| PushCycleState::fresh(clock.now_ms()))),
                Err(e) => warn!("Skipping push cycle update: {}", e),
            }
        }))
    }

    /// Follow the main timer through a watch channel seeded with the current state
    pub async fn watch_main(&self) -> TimerResult<(watch::Receiver<MainTimerState>, Subscription)> {
        let (tx, rx) = watch::channel(self.read_main().await?);
        let subscription = self.subscribe_main(move |state| publish_if_changed(&tx, state)).await?;
        Ok((rx, subscription))
    }

    /// Follow the push cycle through a watch channel seeded with the current state
    pub async fn watch_push_cycle(&self) -> TimerResult<(watch::Receiver<PushCycleState>, Subscription)> {
        let current = self
            .read_push_cycle()
            .await?
            .unwrap_or_else(|| PushCycleState::fresh(self.clock.now_ms()));
        let (tx, rx) = watch::channel(current);
        let subscription = self
            .subscribe_push_cycle(move |state| publish_if_changed(&tx, state))
            .await?;
        Ok((rx, subscription))
    }

    async fn write<T: Serialize>(&self, key: RecordKey, record: &T) -> TimerResult<()> {
        let value = serde_json::to_value(record).map_err(|e| TimerError::MalformedRecord {
            record: key.as_str(),
            reason: e.to_string(),
        })?;
        self.store.set(key, value).await.map_err(|e| {
            warn!("Failed to write {} record: {}", key, e);
            TimerError::from(e)
        })
    }
}

fn publish_if_changed<T: PartialEq>(tx: &watch::Sender<T>, next: T) {
    tx.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

fn decode<T: DeserializeOwned>(key: RecordKey, value: Option<Value>) -> TimerResult<Option<T>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| TimerError::MalformedRecord {
                record: key.as_str(),
                reason: e.to_string(),
            }),
    }
}
