//! Error types for the session clock

use thiserror::Error;

/// Errors surfaced by clock operations and its adapters
#[derive(Debug, Error)]
pub enum ClockError {
    /// User input the clock cannot act on, such as a non-positive duration
    #[error("invalid input '{input}': expected {expected}")]
    InvalidInput {
        input: String,
        expected: &'static str,
    },

    /// The snapshot storage could not be read or written
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] std::io::Error),

    /// A shared lock was poisoned by a panicking holder
    #[error("failed to lock state: {0}")]
    StateLock(String),
}

impl ClockError {
    pub fn invalid_duration(input: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.into(),
            expected: "a positive whole number of minutes",
        }
    }

    pub fn invalid_phase(input: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.into(),
            expected: "'work' or 'break'",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClockError>;
