//! Persisted projection of the clock

use serde::{Deserialize, Serialize};

use super::Phase;

/// The minimal state needed to resume a session after a restart
///
/// Run status is deliberately absent: a restored clock always starts paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub remaining_seconds: u64,
    pub phase: Phase,
}

impl Snapshot {
    pub fn new(phase: Phase, remaining_seconds: u64) -> Self {
        Self {
            remaining_seconds,
            phase,
        }
    }
}
