//! State management module
//! 
//! This module contains the session clock, its data types and the shared
//! application state that hosts it.

pub mod phase;
pub mod clock;
pub mod snapshot;
pub mod app_state;

// Re-export main types
pub use phase::{Durations, Phase};
pub use clock::{ClockState, ClockView, ReadModel, SessionClock, TickOutcome};
pub use snapshot::Snapshot;
pub use app_state::AppState;
