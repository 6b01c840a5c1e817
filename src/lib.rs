//! Session Clock - A work/break countdown timer with a local HTTP control surface
//! 
//! This library provides the phase-cycling session clock, its tick scheduling,
//! snapshot persistence and the HTTP API that drives it.

pub mod config;
pub mod error;
pub mod state;
pub mod scheduler;
pub mod persistence;
pub mod render;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::ClockError;
pub use state::{AppState, SessionClock};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
