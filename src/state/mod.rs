//! State management module
//!
//! Timer records, the push-cycle derivation and the shared server state.

pub mod app_state;
pub mod custom;
pub mod push_cycle;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use custom::CustomDuration;
pub use push_cycle::{ordinal_suffix, PushCycleState, MAX_PUSH_NUMBER, PUSH_WINDOW_MS};
pub use timer_state::{MainTimerState, FULL_DAY_MS, READY_THRESHOLD_MS};
