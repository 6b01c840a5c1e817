//! Countdown phases and their configured durations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// Default work phase length in seconds (25 minutes)
pub const DEFAULT_WORK_SECONDS: u64 = 25 * 60;
/// Default break phase length in seconds (5 minutes)
pub const DEFAULT_BREAK_SECONDS: u64 = 5 * 60;

/// One of the two alternating countdown intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one when the countdown expires
    pub fn opposite(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    pub fn is_work(self) -> bool {
        self == Phase::Work
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Work
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Phase::Work),
            "break" => Ok(Phase::Break),
            _ => Err(ClockError::invalid_phase(s)),
        }
    }
}

/// Per-phase countdown lengths in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub work: u64,
    #[serde(rename = "break")]
    pub break_: u64,
}

impl Durations {
    pub fn new(work: u64, break_: u64) -> Self {
        Self { work, break_ }
    }

    /// Build durations from whole minutes
    pub fn from_minutes(work: u64, break_: u64) -> Self {
        Self::new(work.saturating_mul(60), break_.saturating_mul(60))
    }

    pub fn get(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work,
            Phase::Break => self.break_,
        }
    }

    pub fn set(&mut self, phase: Phase, seconds: u64) {
        match phase {
            Phase::Work => self.work = seconds,
            Phase::Break => self.break_ = seconds,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_SECONDS, DEFAULT_BREAK_SECONDS)
    }
}

/// Parse a user-entered minute count into seconds
///
/// Rejects anything that is not a whole number greater than zero, and values
/// whose second count would overflow.
pub fn parse_minutes(input: &str) -> Result<u64, ClockError> {
    let minutes: u64 = input
        .trim()
        .parse()
        .map_err(|_| ClockError::invalid_duration(input))?;

    if minutes == 0 {
        return Err(ClockError::invalid_duration(input));
    }

    minutes
        .checked_mul(60)
        .ok_or_else(|| ClockError::invalid_duration(input))
}
