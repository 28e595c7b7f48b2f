//! Countdown Sync - a synchronized countdown server
//!
//! A shared 24 hour countdown lives in a real-time key-value store. This
//! library keeps that record consistent under admin commands, derives the
//! push-reminder cycle from it, and renders live countdowns for any number
//! of observers.

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod state;
pub mod store;
pub mod sync;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use auth::AdminGate;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{TimerError, TimerResult};
pub use state::{AppState, MainTimerState, PushCycleState};
pub use store::{FileStore, MemoryStore, TimerStore};
pub use sync::SyncService;
pub use utils::signals::shutdown_signal;
