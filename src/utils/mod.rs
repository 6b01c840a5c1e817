//! Process utilities
//! 
//! Currently only the shutdown signal listener used by the server loop.

pub mod signals;

// Re-export main functions
pub use signals::shutdown_signal;
