//! Displays wired to store subscriptions

use std::sync::Arc;

use tokio::sync::watch;

use super::{CountdownDisplay, DisplayEngine, DisplayHandle, PushReminder, PushReminderDisplay};
use crate::{
    clock::Clock,
    error::TimerResult,
    state::PushCycleState,
    store::TimerStore,
    sync::{Subscription, SyncService},
};

/// A display kept current by store subscriptions.
///
/// Dropping it releases the subscriptions and cancels any pending redraw.
#[derive(Debug)]
pub struct LiveCountdown<F> {
    display: DisplayHandle<F>,
    subscriptions: Vec<Subscription>,
}

impl<F: Clone> LiveCountdown<F> {
    pub fn current(&self) -> F {
        self.display.current()
    }

    pub fn frames(&self) -> watch::Receiver<F> {
        self.display.frames()
    }

    pub fn is_active(&self) -> bool {
        self.display.is_active() && self.subscriptions.iter().all(Subscription::is_active)
    }

    /// Unsubscribe and stop redrawing
    pub fn detach(self) {
        drop(self);
    }
}

/// Follow the main timer
pub async fn main_countdown<S, C>(
    service: &SyncService<S, C>,
    engine: &DisplayEngine<C>,
) -> TimerResult<LiveCountdown<CountdownDisplay>>
where
    S: TimerStore,
    C: Clock,
{
    let (snapshots, subscription) = service.watch_main().await?;
    Ok(LiveCountdown {
        display: engine.spawn(snapshots),
        subscriptions: vec![subscription],
    })
}

/// Follow the push cycle, ticking only while the main timer runs
pub async fn push_reminder<S, C>(
    service: &SyncService<S, C>,
    engine: &DisplayEngine<C>,
) -> TimerResult<LiveCountdown<PushReminderDisplay>>
where
    S: TimerStore,
    C: Clock,
{
    let now = service.clock().now_ms();
    let seed = PushReminder {
        cycle: service
            .read_push_cycle()
            .await?
            .unwrap_or_else(|| PushCycleState::fresh(now)),
        running: service.read_main().await?.is_running,
    };

    let (tx, rx) = watch::channel(seed);
    let tx = Arc::new(tx);

    let running_tx = Arc::clone(&tx);
    let main_sub = service
        .subscribe_main(move |main| {
            running_tx.send_if_modified(|reminder| {
                let changed = reminder.running != main.is_running;
                reminder.running = main.is_running;
                changed
            });
        })
        .await?;

    let cycle_tx = tx;
    let cycle_sub = service
        .subscribe_push_cycle(move |cycle| {
            cycle_tx.send_if_modified(|reminder| {
                let changed = reminder.cycle != cycle;
                reminder.cycle = cycle;
                changed
            });
        })
        .await?;

    Ok(LiveCountdown {
        display: engine.spawn(rx),
        subscriptions: vec![main_sub, cycle_sub],
    })
}
