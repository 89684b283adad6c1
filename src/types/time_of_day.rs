use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time at hour:minute granularity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Self {
        assert!(hour < 24, "hour must be 0–23");
        assert!(minute < 60, "minute must be 0–59");

        Self { hour, minute }
    }

    /// Minutes since midnight, 0–1439.
    pub fn minute_of_day(self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    /// Builds a time from minutes since midnight, folding values past
    /// midnight back onto the clock.
    pub fn from_minute_of_day(minutes: u32) -> Self {
        let folded = minutes % MINUTES_PER_DAY;

        Self {
            hour: (folded / 60) as u8,
            minute: (folded % 60) as u8,
        }
    }

    /// The time one minute later, wrapping 23:59 to 00:00.
    pub fn next_minute(self) -> Self {
        Self::from_minute_of_day(self.minute_of_day() + 1)
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("invalid time of day: {s}"))?;

        let hour: u8 = hour
            .parse()
            .map_err(|_| anyhow!("invalid hour in time of day: {s}"))?;
        let minute: u8 = minute
            .parse()
            .map_err(|_| anyhow!("invalid minute in time of day: {s}"))?;

        if hour >= 24 || minute >= 60 {
            return Err(anyhow!("time of day out of range: {s}"));
        }

        Ok(Self { hour, minute })
    }
}
