//! Redraw loop driving countdown frames

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::CountdownSource;
use crate::clock::Clock;

/// Default redraw cadence, one frame per display refresh at 60 Hz
pub const DEFAULT_REFRESH: Duration = Duration::from_micros(16_667);

/// Turns timer snapshots into frames, redrawing while a countdown runs
pub struct DisplayEngine<C> {
    clock: Arc<C>,
    refresh: Duration,
}

impl<C> Clone for DisplayEngine<C> {
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
            refresh: self.refresh,
        }
    }
}

impl<C: Clock> DisplayEngine<C> {
    pub fn new(clock: Arc<C>, refresh: Duration) -> Self {
        Self {
            clock,
            refresh: refresh.max(Duration::from_millis(1)),
        }
    }

    pub fn refresh(&self) -> Duration {
        self.refresh
    }

    /// Render a snapshot once at the current time
    pub fn render<S: CountdownSource>(&self, source: &S) -> S::Frame {
        source.frame(self.clock.now_ms())
    }

    /// Follow `snapshots`, publishing a frame for each one and on every
    /// refresh while the frame is live.
    ///
    /// A new snapshot replaces any pending redraw of the previous one. The
    /// loop ends when the handle is cancelled or dropped, or when the
    /// snapshot sender goes away.
    pub fn spawn<S: CountdownSource>(&self, mut snapshots: watch::Receiver<S>) -> DisplayHandle<S::Frame> {
        let first = self.render(&*snapshots.borrow_and_update());
        let (frames_tx, frames_rx) = watch::channel(first.clone());
        let cancel = CancellationToken::new();

        let engine = self.clone();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut frame = first;
            let mut ticker = engine.ticker();
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Display cancelled");
                        break;
                    }
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            debug!("Snapshot feed closed, display stopped");
                            break;
                        }
                        ticker = engine.ticker();
                        frame = engine.render(&*snapshots.borrow_and_update());
                        frames_tx.send_replace(frame.clone());
                    }
                    _ = ticker.tick(), if S::is_live(&frame) => {
                        frame = engine.render(&*snapshots.borrow());
                        frames_tx.send_replace(frame.clone());
                    }
                }
            }
        });

        DisplayHandle {
            frames: frames_rx,
            cancel,
            task,
        }
    }

    fn ticker(&self) -> Interval {
        let mut ticker = interval_at(Instant::now() + self.refresh, self.refresh);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }
}

/// Handle to a running display; dropping it stops the redraw loop
#[derive(Debug)]
pub struct DisplayHandle<F> {
    frames: watch::Receiver<F>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl<F: Clone> DisplayHandle<F> {
    /// Latest frame
    pub fn current(&self) -> F {
        self.frames.borrow().clone()
    }

    /// A receiver woken for every published frame
    pub fn frames(&self) -> watch::Receiver<F> {
        self.frames.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl<F> Drop for DisplayHandle<F> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
