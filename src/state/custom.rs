//! Custom duration entry for the admin "set timer" command

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TimerError, TimerResult};

/// Hours, minutes and seconds as entered by an admin.
///
/// Fields are not range-checked: 90 minutes is simply folded into the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomDuration {
    #[serde(default, deserialize_with = "lenient_field")]
    pub hours: i64,
    #[serde(default, deserialize_with = "lenient_field")]
    pub minutes: i64,
    #[serde(default, deserialize_with = "lenient_field")]
    pub seconds: i64,
}

impl CustomDuration {
    pub fn new(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Build from raw form fields; anything that is not a number counts as 0
    pub fn parse(hours: &str, minutes: &str, seconds: &str) -> Self {
        Self::new(parse_int(hours), parse_int(minutes), parse_int(seconds))
    }

    /// Total in milliseconds, rejecting totals that are not positive
    pub fn total_ms(&self) -> TimerResult<i64> {
        self.hours
            .checked_mul(3600)
            .and_then(|h| self.minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(self.seconds))
            .and_then(|secs| secs.checked_mul(1000))
            .filter(|total| *total > 0)
            .ok_or_else(TimerError::invalid_duration)
    }
}

/// Parse the leading integer of a form field.
///
/// Leading whitespace and a sign are accepted, parsing stops at the first
/// non-digit, and input without digits yields 0.
pub fn parse_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return 0;
    }
    // only overflow can fail here
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn lenient_field<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_int(&s),
        _ => 0,
    })
}
