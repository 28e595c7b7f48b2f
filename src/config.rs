//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown-sync")]
#[command(about = "A synchronized countdown server with an admin control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20600")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Persist timer records to this JSON file instead of keeping them in memory
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Hex SHA-256 digest of the admin key
    #[arg(
        long,
        env = "COUNTDOWN_ADMIN_KEY_HASH",
        hide_env_values = true,
        required_unless_present = "hash_key"
    )]
    pub admin_key_hash: Option<String>,

    /// Print the digest to configure for SECRET and exit
    #[arg(long, value_name = "SECRET")]
    pub hash_key: Option<String>,

    /// Display refresh rate in frames per second
    #[arg(long, default_value = "60")]
    pub refresh_hz: u32,

    /// Render the live countdown to the log
    #[arg(long)]
    pub console: bool,

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

    /// Time between display refreshes
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_hz.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["countdown-sync", "--admin-key-hash", HASH]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20600");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.refresh_interval(), Duration::from_nanos(16_666_666));
        assert!(config.state_file.is_none());
        assert!(!config.console);
        assert_eq!(config.admin_key_hash.as_deref(), Some(HASH));
        assert!(config.hash_key.is_none());
    }

    #[test]
    fn hash_key_stands_in_for_the_digest() {
        let config = Config::try_parse_from(["countdown-sync", "--hash-key", "abc"]).unwrap();
        assert_eq!(config.hash_key.as_deref(), Some("abc"));
        assert!(config.admin_key_hash.is_none());
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from([
            "countdown-sync",
            "--admin-key-hash",
            HASH,
            "-p",
            "8080",
            "--host",
            "127.0.0.1",
            "--state-file",
            "/tmp/timer.json",
            "--refresh-hz",
            "0",
            "--console",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert_eq!(config.state_file, Some(PathBuf::from("/tmp/timer.json")));
        assert!(config.console);
    }
}
