//! Real-time key-value store abstraction
//!
//! The timer lives in an external store that other clients observe. This
//! module defines the narrow interface the synchronization service needs
//! (read, write and follow a record) plus two backends: an in-memory store
//! and a JSON file store that survives restarts.

pub mod file;
pub mod memory;

use std::{fmt, future::Future};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend is not reachable.
    #[error("store is offline")]
    Offline,

    /// Reading or writing the backing file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The two records the countdown is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Timer,
    PushCycle,
}

impl RecordKey {
    pub const ALL: [RecordKey; 2] = [RecordKey::Timer, RecordKey::PushCycle];

    /// Name of the record in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKey::Timer => "timer",
            RecordKey::PushCycle => "githubPushTimer",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key-value store with change notifications.
///
/// Writes are last-write-wins. Subscribers see the latest value of a record
/// and are woken for every write that changes it, in the order writes were
/// applied. `None` means the record does not exist yet.
pub trait TimerStore: Send + Sync + 'static {
    /// One-time read of a record
    fn get(&self, key: RecordKey) -> impl Future<Output = StoreResult<Option<Value>>> + Send;

    /// Replace a record
    fn set(&self, key: RecordKey, value: Value) -> impl Future<Output = StoreResult<()>> + Send;

    /// Follow a record; the receiver starts out holding the current value
    fn subscribe(
        &self,
        key: RecordKey,
    ) -> impl Future<Output = StoreResult<watch::Receiver<Option<Value>>>> + Send;
}
