use std::fmt;

use web_time::Duration;

use crate::error::ConfigError;

/// Whole-second tick period, never below one second.
///
/// Deserializes from any integer through [`Period::from_secs`], so stored
/// configs clamp the same way as user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "i64")
)]
pub struct Period(u32);

impl Period {
    pub const MIN: Period = Period(1);

    /// Clamps into `1..=u32::MAX`. Zero and negative inputs become one second.
    pub fn from_secs(secs: i64) -> Self {
        if secs < 1 {
            log::debug!("Period: clamping {secs}s up to 1s");
            return Self::MIN;
        }
        Period(u32::try_from(secs).unwrap_or(u32::MAX))
    }

    pub fn secs(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }

    /// Strict parse of user input. Out-of-range numbers clamp, non-numbers fail.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        input
            .trim()
            .parse::<i64>()
            .map(Self::from_secs)
            .map_err(|_| ConfigError::InvalidInterval(input.to_string()))
    }

    /// Like [`Period::parse`], but unparsable input keeps `fallback`.
    pub fn parse_or(input: &str, fallback: Period) -> Self {
        match Self::parse(input) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("{e}; keeping {fallback}");
                fallback
            }
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<i64> for Period {
    fn from(secs: i64) -> Self {
        Self::from_secs(secs)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// What `poll` does when it finds more than one tick overdue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissedTicks {
    /// Run every missed tick, oldest first.
    #[default]
    Burst,
    /// Run a single tick and realign to the next future slot.
    Skip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskConfig {
    pub period: Period,
    pub start_running: bool,
    pub missed_ticks: MissedTicks,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            period: Period::MIN,
            start_running: false,
            missed_ticks: MissedTicks::Burst,
        }
    }
}

impl TaskConfig {
    pub fn every(secs: i64) -> Self {
        Self {
            period: Period::from_secs(secs),
            ..Self::default()
        }
    }
    pub fn running(self) -> Self {
        Self {
            start_running: true,
            ..self
        }
    }
    pub fn stopped(self) -> Self {
        Self {
            start_running: false,
            ..self
        }
    }
    pub fn missed_ticks(self, missed_ticks: MissedTicks) -> Self {
        Self {
            missed_ticks,
            ..self
        }
    }
}
