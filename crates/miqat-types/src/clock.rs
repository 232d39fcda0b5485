//! Local wall-clock minutes rendered as `HH:MM`.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::MiqatError;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A 24-hour wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Wall-clock time of `instant` at a fixed UTC offset given in minutes.
    pub fn from_utc(instant: DateTime<Utc>, offset_minutes: i32) -> Self {
        let local = instant + Duration::minutes(i64::from(offset_minutes));
        Self {
            hour: local.hour() as u8,
            minute: local.minute() as u8,
        }
    }

    /// Shifts by a signed number of minutes, wrapping across midnight.
    pub fn shifted(self, minutes: i64) -> Self {
        let total = (self.minutes_since_midnight() + minutes).rem_euclid(MINUTES_PER_DAY);
        Self {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = MiqatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MiqatError::invalid_config(format!("\"{}\" is not an HH:MM time", s));
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour = h.parse::<u8>().map_err(|_| invalid())?;
        let minute = m.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_utc_with_rollover() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        assert_eq!(ClockTime::from_utc(t, 60).to_string(), "00:30");
        assert_eq!(ClockTime::from_utc(t, -24 * 60).to_string(), "23:30");
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 15, 0).unwrap();
        assert_eq!(ClockTime::from_utc(early, -30).to_string(), "23:45");
    }

    #[test]
    fn test_shifted() {
        let t = ClockTime::new(23, 10).unwrap();
        assert_eq!(t.shifted(60), ClockTime::new(0, 10).unwrap());
        assert_eq!(t.shifted(-23 * 60 - 20), ClockTime::new(23, 50).unwrap());
    }

    #[test]
    fn test_parse() {
        assert_eq!("05:07".parse::<ClockTime>().unwrap(), ClockTime::new(5, 7).unwrap());
        assert!("5:07".parse::<ClockTime>().is_err());
        assert!("24:00".parse::<ClockTime>().is_err());
    }
}
