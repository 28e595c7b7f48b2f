//! Store subscriptions delivered to callbacks

use serde_json::Value;
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::store::RecordKey;

/// Handle to a registered change callback.
///
/// The callback runs on its own task. Dropping the handle, or calling
/// [`Subscription::unsubscribe`], stops delivery.
#[derive(Debug)]
pub struct Subscription {
    record: RecordKey,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Deliver the current value of `rx` to `handler`, then every change
    pub(crate) fn spawn<F>(record: RecordKey, mut rx: watch::Receiver<Option<Value>>, mut handler: F) -> Self
    where
        F: FnMut(Option<Value>) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                let value = rx.borrow_and_update().clone();
                handler(value);
                if rx.changed().await.is_err() {
                    debug!("Store closed the {} feed", record);
                    break;
                }
            }
        });
        debug!("Subscribed to {} record", record);
        Self { record, handle }
    }

    pub fn record(&self) -> RecordKey {
        self.record
    }

    /// Whether the callback is still registered
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Release the registration
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Unsubscribed from {} record", self.record);
    }
}
