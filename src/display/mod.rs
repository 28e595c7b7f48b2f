//! Countdown display
//!
//! Frames are recomputed from the absolute `endTime` on every redraw, never
//! from a previously rendered value, so displays on machines with skewed
//! clocks converge on the same countdown.

pub mod countdown;
pub mod engine;
pub mod flip;
pub mod live;

pub use countdown::{CountdownDisplay, CountdownSource, DisplayStatus, PushReminder, PushReminderDisplay};
pub use engine::{DisplayEngine, DisplayHandle, DEFAULT_REFRESH};
pub use flip::{FlipBoard, FlipDigit, FLIP_DURATION_MS};
pub use live::{main_countdown, push_reminder, LiveCountdown};
