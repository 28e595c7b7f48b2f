//! Push-cycle derivation background task

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::{clock::Clock, store::TimerStore, sync::SyncService};

/// Re-derive the push cycle every time the main timer record changes.
///
/// This task is the only thing that writes derived push cycles. A failed
/// write is logged and left alone; the next timer change derives again.
pub async fn push_cycle_task<S: TimerStore, C: Clock>(service: SyncService<S, C>) {
    info!("Starting push cycle task");

    loop {
        let (mut main_rx, _subscription) = match service.watch_main().await {
            Ok(watch) => watch,
            Err(e) => {
                error!("Failed to follow timer record: {}", e);
                sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        loop {
            let main = *main_rx.borrow_and_update();
            debug!("Timer changed (running={}), deriving push cycle", main.is_running);
            match service.derive_and_publish_push_cycle(&main).await {
                Err(e) if e.is_store_failure() => warn!("Push cycle not published, store unavailable: {}", e),
                Err(e) => error!("Failed to publish push cycle: {}", e),
                Ok(_) => {}
            }
            if main_rx.changed().await.is_err() {
                warn!("Timer feed closed, resubscribing");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{
        clock::ManualClock,
        state::{CustomDuration, MainTimerState, PushCycleState},
        store::{MemoryStore, RecordKey},
    };
    use tokio::task::yield_now;

    const NOW: i64 = 1_700_000_000_000;
    const HOUR: i64 = 60 * 60 * 1000;

    #[tokio::test]
    async fn derives_on_every_timer_change() {
        let clock = ManualClock::new(NOW);
        let service = SyncService::with_clock(Arc::new(MemoryStore::new()), Arc::new(clock.clone()));
        let (mut cycles, _sub) = service.watch_push_cycle().await.unwrap();

        let task = tokio::spawn(push_cycle_task(service.clone()));

        service.start().await.unwrap();
        clock.advance(7 * HOUR);
        service.stop().await.unwrap();
        service.start().await.unwrap();

        let expected = PushCycleState {
            end_time: NOW + 7 * HOUR + 2 * HOUR,
            push_number: 3,
        };
        while *cycles.borrow_and_update() != expected {
            cycles.changed().await.unwrap();
        }

        service.set_custom(CustomDuration::new(1, 0, 0)).await.unwrap();
        while *cycles.borrow_and_update() != PushCycleState::fresh(NOW + 7 * HOUR) {
            cycles.changed().await.unwrap();
        }
        assert_eq!(service.read_main().await.unwrap().remaining_time, HOUR);

        task.abort();
    }

    #[tokio::test]
    async fn survives_a_store_outage() {
        let clock = ManualClock::new(NOW);
        let store = Arc::new(MemoryStore::new());
        let service = SyncService::with_clock(Arc::clone(&store), Arc::new(clock.clone()));
        let task = tokio::spawn(push_cycle_task(service));

        while store.snapshot(RecordKey::PushCycle).is_none() {
            yield_now().await;
        }
        let fresh = serde_json::to_value(PushCycleState::fresh(NOW)).unwrap();

        store.set_online(false);
        store.write(
            RecordKey::Timer,
            serde_json::to_value(MainTimerState::running_until(NOW + 2 * HOUR)).unwrap(),
        );
        for _ in 0..10 {
            yield_now().await;
        }
        assert_eq!(store.snapshot(RecordKey::PushCycle), Some(fresh));

        store.set_online(true);
        store.write(
            RecordKey::Timer,
            serde_json::to_value(MainTimerState::running_until(NOW + HOUR)).unwrap(),
        );
        let last = serde_json::to_value(PushCycleState {
            end_time: NOW + HOUR,
            push_number: 8,
        })
        .unwrap();
        while store.snapshot(RecordKey::PushCycle).as_ref() != Some(&last) {
            yield_now().await;
        }
        assert!(!task.is_finished());
        task.abort();
    }
}
