//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod console;
pub mod push_cycle;

// Re-export main functions
pub use console::{console_countdown_task, ConsoleRenderer};
pub use push_cycle::push_cycle_task;
