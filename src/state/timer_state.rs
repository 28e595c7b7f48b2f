//! Main timer record and its countdown math

use serde::{Deserialize, Serialize};

/// Length of a full countdown (24 hours) in milliseconds
pub const FULL_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// A stopped timer at or above this much time left is considered fresh
pub const READY_THRESHOLD_MS: i64 = FULL_DAY_MS - 1000;

/// The shared countdown, stored under the `timer` record.
///
/// `is_running` selects which field is authoritative: `end_time` while the
/// timer runs, `remaining_time` while it is stopped. Readers always derive
/// the time left from the absolute `end_time`, so clients with skewed clocks
/// never accumulate drift from a previously rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainTimerState {
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub remaining_time: i64,
}

impl MainTimerState {
    /// A stopped timer holding the given duration
    pub fn stopped(remaining_time: i64) -> Self {
        Self {
            is_running: false,
            end_time: None,
            remaining_time,
        }
    }

    /// A running timer due at `end_time`
    pub fn running_until(end_time: i64) -> Self {
        Self {
            is_running: true,
            end_time: Some(end_time),
            remaining_time: 0,
        }
    }

    /// Time left at `now`, never negative while running
    pub fn time_left_ms(&self, now: i64) -> i64 {
        match (self.is_running, self.end_time) {
            (true, Some(end_time)) => end_time.saturating_sub(now).max(0),
            _ => self.remaining_time,
        }
    }

    /// The state after a start command, or `None` if already running
    pub fn started(&self, now: i64) -> Option<Self> {
        if self.is_running {
            return None;
        }
        Some(Self {
            is_running: true,
            end_time: Some(now.saturating_add(self.remaining_time)),
            remaining_time: self.remaining_time,
        })
    }

    /// The state after a stop command, or `None` if already stopped
    pub fn stopped_at(&self, now: i64) -> Option<Self> {
        if !self.is_running {
            return None;
        }
        Some(Self::stopped(self.time_left_ms(now)))
    }
}

impl Default for MainTimerState {
    fn default() -> Self {
        Self::stopped(FULL_DAY_MS)
    }
}
