//! Minute-of-day clock values written as `HH:mm`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day with minute precision.
///
/// Arithmetic wraps at midnight; the calendar date is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour >= 24 || minute >= 60 {
            return Err(ValidationError::InvalidClock(format!("{hour}:{minute}")));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0) / 60
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0) % 60
    }

    /// Minutes since midnight.
    pub fn minute_of_day(self) -> u32 {
        u32::from(self.0)
    }

    /// Add minutes, wrapping past midnight.
    pub fn add_minutes(self, minutes: u32) -> Self {
        let total = (u32::from(self.0) + minutes % MINUTES_PER_DAY) % MINUTES_PER_DAY;
        Self(total as u16)
    }

    /// Whether `self` falls inside `[start, start + duration)`.
    ///
    /// The window is measured on the same day; a block that would run past
    /// midnight does not cover the early-morning minutes.
    pub fn within(self, start: ClockTime, duration_min: u32) -> bool {
        let now = self.minute_of_day();
        let begin = start.minute_of_day();
        now >= begin && now < begin.saturating_add(duration_min)
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(t: NaiveTime) -> Self {
        Self((t.hour() * 60 + t.minute()) as u16)
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidClock(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats() {
        let t: ClockTime = "08:05".parse().unwrap();
        assert_eq!(t.hour(), 8);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "08:05");

        let single_digit: ClockTime = "7:30".parse().unwrap();
        assert_eq!(single_digit.to_string(), "07:30");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "8", "24:00", "12:60", "ab:cd", "12:5", "123:00"] {
            assert!(bad.parse::<ClockTime>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn add_minutes_wraps_midnight() {
        let t: ClockTime = "23:50".parse().unwrap();
        assert_eq!(t.add_minutes(20).to_string(), "00:10");
        assert_eq!(t.add_minutes(24 * 60).to_string(), "23:50");
    }

    #[test]
    fn within_is_start_inclusive_end_exclusive() {
        let start: ClockTime = "09:00".parse().unwrap();
        assert!(start.within(start, 25));
        assert!("09:24".parse::<ClockTime>().unwrap().within(start, 25));
        assert!(!"09:25".parse::<ClockTime>().unwrap().within(start, 25));
        assert!(!"08:59".parse::<ClockTime>().unwrap().within(start, 25));
    }

    #[test]
    fn within_saturates_on_huge_durations() {
        let start: ClockTime = "08:00".parse().unwrap();
        let now: ClockTime = "09:00".parse().unwrap();
        assert!(now.within(start, u32::MAX));
        assert!(!"07:59".parse::<ClockTime>().unwrap().within(start, u32::MAX));
    }

    #[test]
    fn serde_uses_hh_mm() {
        let t: ClockTime = "14:00".parse().unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"14:00\"");
        let back: ClockTime = serde_json::from_str("\"06:45\"").unwrap();
        assert_eq!(back.minute_of_day(), 6 * 60 + 45);
        assert!(serde_json::from_str::<ClockTime>("\"6h45\"").is_err());
    }
}
