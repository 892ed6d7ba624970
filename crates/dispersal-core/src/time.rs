use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time units accepted by mortality configuration.
///
/// Particle ages and tick intervals are tracked in milliseconds; hazard
/// parameters are expressed in one of these units and converted on use.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[serde(alias = "ms", alias = "millis", alias = "Milliseconds")]
    Milliseconds,
    #[serde(alias = "s", alias = "secs", alias = "Seconds")]
    Seconds,
    #[serde(alias = "min", alias = "mins", alias = "Minutes")]
    Minutes,
    #[serde(alias = "h", alias = "hrs", alias = "Hours")]
    Hours,
    #[default]
    #[serde(alias = "d", alias = "Days")]
    Days,
    #[serde(alias = "w", alias = "Weeks")]
    Weeks,
}

impl TimeUnit {
    /// Number of milliseconds in one unit.
    pub const fn millis(self) -> f64 {
        match self {
            TimeUnit::Milliseconds => 1.0,
            TimeUnit::Seconds => 1_000.0,
            TimeUnit::Minutes => 60_000.0,
            TimeUnit::Hours => 3_600_000.0,
            TimeUnit::Days => 86_400_000.0,
            TimeUnit::Weeks => 604_800_000.0,
        }
    }

    /// Convert a value expressed in this unit to milliseconds.
    pub fn to_millis(self, value: f64) -> f64 {
        value * self.millis()
    }

    /// Convert milliseconds to a value expressed in this unit.
    pub fn from_millis(self, millis: f64) -> f64 {
        millis / self.millis()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time unit `{0}`")]
pub struct UnknownTimeUnit(pub String);

impl FromStr for TimeUnit {
    type Err = UnknownTimeUnit;

    /// Case-insensitive parse of unit names as they appear in run configuration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "millis" | "millisecond" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(TimeUnit::Seconds),
            "min" | "mins" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(TimeUnit::Hours),
            "d" | "day" | "days" => Ok(TimeUnit::Days),
            "w" | "week" | "weeks" => Ok(TimeUnit::Weeks),
            _ => Err(UnknownTimeUnit(s.to_string())),
        }
    }
}
