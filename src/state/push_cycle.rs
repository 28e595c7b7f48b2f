//! Push-cycle record derived from the main timer
//!
//! A 24 hour run is split into 3 hour windows. The push cycle tracks which
//! window the main countdown is in and when that window closes.

use serde::{Deserialize, Serialize};

use super::timer_state::{MainTimerState, FULL_DAY_MS};

/// Length of one push window (3 hours) in milliseconds
pub const PUSH_WINDOW_MS: i64 = 3 * 60 * 60 * 1000;

/// Highest push number the derivation produces within a 24 hour run
pub const MAX_PUSH_NUMBER: u32 = 8;

/// The push reminder, stored under the `githubPushTimer` record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushCycleState {
    pub end_time: i64,
    #[serde(rename = "pushCount")]
    pub push_number: u32,
}

impl PushCycleState {
    /// First window starting at `now`
    pub fn fresh(now: i64) -> Self {
        Self {
            end_time: now + PUSH_WINDOW_MS,
            push_number: 1,
        }
    }

    /// Derive the push cycle for `main` at `now`.
    ///
    /// A stopped main timer yields the fresh window. Elapsed time is clamped
    /// at zero so a custom run longer than a day stays in the first window
    /// until it falls under 24 hours.
    pub fn derive(main: &MainTimerState, now: i64) -> Self {
        if !main.is_running {
            return Self::fresh(now);
        }
        let elapsed = (FULL_DAY_MS - main.time_left_ms(now)).max(0);
        let push_number = (elapsed / PUSH_WINDOW_MS + 1).min(MAX_PUSH_NUMBER as i64) as u32;
        let time_left_in_cycle = PUSH_WINDOW_MS - elapsed % PUSH_WINDOW_MS;
        Self {
            end_time: now + time_left_in_cycle,
            push_number,
        }
    }

    /// The next window opened by an explicit reset
    pub fn advanced(&self, now: i64) -> Self {
        Self {
            end_time: now + PUSH_WINDOW_MS,
            push_number: self.push_number.saturating_add(1),
        }
    }

    pub fn time_left_ms(&self, now: i64) -> i64 {
        self.end_time.saturating_sub(now).max(0)
    }
}

/// English ordinal suffix for a push number ("1st", "2nd", "11th", ...)
pub fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (1, k) if k != 11 => "st",
        (2, k) if k != 12 => "nd",
        (3, k) if k != 13 => "rd",
        _ => "th",
    }
}
