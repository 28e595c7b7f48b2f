//! Countdown frames computed from timer snapshots

use serde::{Deserialize, Serialize};

use crate::state::{ordinal_suffix, MainTimerState, PushCycleState, READY_THRESHOLD_MS};

/// A snapshot the display engine can turn into frames
pub trait CountdownSource: Clone + Send + Sync + 'static {
    type Frame: Clone + Send + Sync + 'static;

    /// Render the snapshot as seen at `now`
    fn frame(&self, now: i64) -> Self::Frame;

    /// Whether the frame needs recomputing on the next refresh
    fn is_live(frame: &Self::Frame) -> bool;
}

/// Status line shown under the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayStatus {
    #[serde(rename = "Time's Up!")]
    TimesUp,
    Running,
    Ready,
    Paused,
}

impl DisplayStatus {
    /// Classify a timer by its time left
    pub fn classify(is_running: bool, time_left_ms: i64) -> Self {
        if time_left_ms <= 0 {
            DisplayStatus::TimesUp
        } else if is_running {
            DisplayStatus::Running
        } else if time_left_ms >= READY_THRESHOLD_MS {
            DisplayStatus::Ready
        } else {
            DisplayStatus::Paused
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::TimesUp => "Time's Up!",
            DisplayStatus::Running => "Running",
            DisplayStatus::Ready => "Ready",
            DisplayStatus::Paused => "Paused",
        }
    }
}

/// One rendered countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownDisplay {
    pub time_left_ms: i64,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub status: DisplayStatus,
    pub running: bool,
}

impl CountdownDisplay {
    pub fn new(is_running: bool, time_left_ms: i64) -> Self {
        let total_seconds = time_left_ms.max(0) / 1000;
        Self {
            time_left_ms,
            hours: format!("{:02}", total_seconds / 3600),
            minutes: format!("{:02}", total_seconds / 60 % 60),
            seconds: format!("{:02}", total_seconds % 60),
            status: DisplayStatus::classify(is_running, time_left_ms),
            running: is_running,
        }
    }

    /// `HH:MM:SS`, with as many hour digits as needed
    pub fn text(&self) -> String {
        format!("{}:{}:{}", self.hours, self.minutes, self.seconds)
    }

    pub fn is_live(&self) -> bool {
        self.running && self.time_left_ms > 0
    }
}

impl CountdownSource for MainTimerState {
    type Frame = CountdownDisplay;

    fn frame(&self, now: i64) -> CountdownDisplay {
        CountdownDisplay::new(self.is_running, self.time_left_ms(now))
    }

    fn is_live(frame: &CountdownDisplay) -> bool {
        frame.is_live()
    }
}

/// Push cycle paired with whether the main timer is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushReminder {
    pub cycle: PushCycleState,
    pub running: bool,
}

/// Rendered push reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushReminderDisplay {
    pub push_number: u32,
    pub label: String,
    pub countdown: CountdownDisplay,
    /// The current window ran out while the main timer is running
    pub reminder_due: bool,
}

impl CountdownSource for PushReminder {
    type Frame = PushReminderDisplay;

    fn frame(&self, now: i64) -> PushReminderDisplay {
        let countdown = CountdownDisplay::new(self.running, self.cycle.time_left_ms(now));
        let push_number = self.cycle.push_number;
        PushReminderDisplay {
            push_number,
            label: format!("{}{} GitHub Push", push_number, ordinal_suffix(push_number)),
            reminder_due: self.running && countdown.time_left_ms == 0,
            countdown,
        }
    }

    fn is_live(frame: &PushReminderDisplay) -> bool {
        frame.countdown.is_live()
    }
}
