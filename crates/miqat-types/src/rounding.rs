//! Minute rounding applied to every computed instant.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Serialize, Deserialize};

/// How an instant is snapped to a whole minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Closest minute; 30 seconds or more carries up.
    Nearest,
    /// Next minute whenever there are leftover seconds.
    Up,
    /// Drop the seconds.
    None,
}

impl Default for Rounding {
    fn default() -> Self {
        Self::Nearest
    }
}

/// Rounds `date` to a whole minute.
///
/// Sub-second precision is discarded first. A time already on a whole
/// minute is returned unchanged by every mode, so rounding is idempotent.
pub fn round_minute(date: DateTime<Utc>, rounding: Rounding) -> DateTime<Utc> {
    let date = date.with_nanosecond(0).unwrap_or(date);
    let seconds = i64::from(date.second());
    if seconds == 0 {
        return date;
    }
    let offset = match rounding {
        Rounding::Nearest if seconds >= 30 => 60 - seconds,
        Rounding::Nearest => -seconds,
        Rounding::Up => 60 - seconds,
        Rounding::None => -seconds,
    };
    date + Duration::seconds(offset)
}
