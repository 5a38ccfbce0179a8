//! Service configuration loaded via OrthoConfig.
//!
//! Values layer command-line flags over `ROTA_*` environment variables over
//! an optional configuration file. Session cookie settings are read
//! separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DEFAULT_TIME_BUDGET, GeneratorOptions};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Errors raised when settings hold unusable values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The bind address is not a `host:port` socket address.
    #[error("invalid bind address {value}: {message}")]
    InvalidBindAddr { value: String, message: String },
    /// A zero generation budget would fail every run.
    #[error("generation timeout must be at least 1 ms")]
    ZeroGenerationTimeout,
}

/// Runtime settings for the schedule generation service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROTA")]
pub struct RotaSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the service runs on the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Wall-clock budget for one roster generation, in milliseconds.
    pub generation_timeout_ms: Option<u64>,
    /// Fixed RNG seed for reproducible rosters.
    pub generation_seed: Option<u64>,
    /// Skip applying embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl RotaSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).trim();
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Return the database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
            .max(1)
    }

    /// Build generator options from the timeout and seed settings.
    pub fn generator_options(&self) -> Result<GeneratorOptions, SettingsError> {
        let time_budget = match self.generation_timeout_ms {
            Some(0) => return Err(SettingsError::ZeroGenerationTimeout),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TIME_BUDGET,
        };
        Ok(GeneratorOptions {
            time_budget,
            seed: self.generation_seed,
        })
    }
}
