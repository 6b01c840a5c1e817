//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::{persistence::FileStorage, state::Durations};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "session-clock")]
#[command(about = "A work/break session clock with a local HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work phase length in minutes
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..))]
    pub work: u64,

    /// Break phase length in minutes
    #[arg(short, long = "break-minutes", default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub break_minutes: u64,

    /// Directory holding the saved clock snapshot
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Keep the snapshot in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Configured phase lengths
    pub fn durations(&self) -> Durations {
        Durations::from_minutes(self.work, self.break_minutes)
    }

    /// Where snapshots live, unless persistence is disabled or no directory is known
    pub fn state_dir(&self) -> Option<PathBuf> {
        if self.no_persist {
            return None;
        }
        self.state_dir.clone().or_else(FileStorage::default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["session-clock"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.durations(), Durations::new(1500, 300));
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_custom_durations_and_state_dir() {
        let config = Config::try_parse_from([
            "session-clock",
            "--work",
            "50",
            "--break-minutes",
            "10",
            "--state-dir",
            "/tmp/clock",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.durations(), Durations::new(3000, 600));
        assert_eq!(config.state_dir(), Some(PathBuf::from("/tmp/clock")));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_zero_minutes_rejected() {
        assert!(Config::try_parse_from(["session-clock", "--work", "0"]).is_err());
        assert!(Config::try_parse_from(["session-clock", "-b", "0"]).is_err());
    }

    #[test]
    fn test_no_persist_disables_state_dir() {
        let config =
            Config::try_parse_from(["session-clock", "--state-dir", "/tmp/clock", "--no-persist"])
                .unwrap();
        assert_eq!(config.state_dir(), None);
    }
}
