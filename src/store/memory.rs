//! In-memory store backend

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{RecordKey, StoreError, StoreResult, TimerStore};

/// Store that keeps both records in watch channels.
///
/// It can be switched offline to simulate an unreachable backend.
#[derive(Debug)]
pub struct MemoryStore {
    timer: watch::Sender<Option<Value>>,
    push_cycle: watch::Sender<Option<Value>>,
    online: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_records(None, None)
    }

    /// Create a store pre-populated with existing records
    pub fn with_records(timer: Option<Value>, push_cycle: Option<Value>) -> Self {
        let (timer, _) = watch::channel(timer);
        let (push_cycle, _) = watch::channel(push_cycle);
        Self {
            timer,
            push_cycle,
            online: AtomicBool::new(true),
        }
    }

    /// Mark the store reachable or unreachable
    pub fn set_online(&self, online: bool) {
        if !online {
            warn!("Memory store switched offline");
        }
        self.online.store(online, Ordering::SeqCst);
    }

    /// Current value of a record, regardless of availability
    pub fn snapshot(&self, key: RecordKey) -> Option<Value> {
        self.channel(key).borrow().clone()
    }

    /// Replace a record and notify subscribers if the value changed
    pub(crate) fn write(&self, key: RecordKey, value: Value) -> bool {
        let changed = self.channel(key).send_if_modified(|current| {
            if current.as_ref() == Some(&value) {
                false
            } else {
                *current = Some(value);
                true
            }
        });
        debug!("Wrote {} record (changed={})", key, changed);
        changed
    }

    fn channel(&self, key: RecordKey) -> &watch::Sender<Option<Value>> {
        match key {
            RecordKey::Timer => &self.timer,
            RecordKey::PushCycle => &self.push_cycle,
        }
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Offline)
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerStore for MemoryStore {
    async fn get(&self, key: RecordKey) -> StoreResult<Option<Value>> {
        self.ensure_online()?;
        Ok(self.snapshot(key))
    }

    async fn set(&self, key: RecordKey, value: Value) -> StoreResult<()> {
        self.ensure_online()?;
        self.write(key, value);
        Ok(())
    }

    async fn subscribe(&self, key: RecordKey) -> StoreResult<watch::Receiver<Option<Value>>> {
        self.ensure_online()?;
        Ok(self.channel(key).subscribe())
    }
}
