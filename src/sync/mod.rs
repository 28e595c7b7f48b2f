//! Timer synchronization
//!
//! The service in this module is the only writer of the `timer` and
//! `githubPushTimer` records. Everything else observes them through
//! subscriptions.

pub mod service;
pub mod subscription;

pub use service::{CommandOutcome, SyncService};
pub use subscription::Subscription;
