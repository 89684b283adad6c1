use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

use crate::types::time_of_day::TimeOfDay;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NotificationMode {
    /// One fixed alarm at the start time.
    Single,
    /// `count` alarms spread across the start–end range.
    Range,
}

impl fmt::Display for NotificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Range => write!(f, "range"),
        }
    }
}

impl FromStr for NotificationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(Self::Single),
            "range" => Ok(Self::Range),
            other => Err(anyhow!("unknown notification mode: {other}")),
        }
    }
}

/// The user-facing notification configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    pub mode: NotificationMode,

    /// Start of the delivery window.
    pub start: TimeOfDay,

    /// End of the delivery window; earlier than `start` means the window
    /// wraps past midnight.
    pub end: TimeOfDay,

    /// Requested notifications per day in range mode.
    pub count: u32,

    /// How much more often user-authored quotes appear than built-ins.
    pub frequency_multiplier: f64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            mode: NotificationMode::Single,
            start: TimeOfDay::new(9, 0),
            end: TimeOfDay::new(10, 0),
            count: 1,
            frequency_multiplier: 1.0,
        }
    }
}
