//! Diagnostic logging setup.
//!
//! Library code reports through `tracing` macros; the binary installs a
//! `tracing-subscriber` fmt layer writing to stderr, so diagnostics never
//! interleave with chat output on stdout.

use crate::config::LoggingConfig;
use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set, otherwise the configured level.
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log level {:?}", config.level)),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "tcpchat=loudest".into(),
        };
        assert!(filter(&config).is_err());
    }

    #[test]
    fn accepts_directives() {
        let config = LoggingConfig {
            level: "info,tcpchat=debug".into(),
        };
        assert!(filter(&config).is_ok());
    }
}
