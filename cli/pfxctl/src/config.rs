//! pfxctl configuration (env-driven).

use anyhow::{Context, Result};

use crate::commands::SchemeArg;

/// CLI configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub log_json: bool,

    /// Prefix used when a command is given no `--prefix`.
    pub default_prefix: String,

    /// Scheme used when a command is given no `--scheme`.
    pub default_scheme: SchemeArg,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let log_level = std::env::var("PFX_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        let log_json = std::env::var("PFX_LOG_JSON")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let default_prefix = std::env::var("PFX_DEFAULT_PREFIX").unwrap_or_default();

        let default_scheme = match std::env::var("PFX_DEFAULT_SCHEME") {
            Ok(v) => SchemeArg::parse(&v)
                .with_context(|| format!("PFX_DEFAULT_SCHEME must be 'cuid' or 'char', got '{v}'"))?,
            Err(_) => SchemeArg::default(),
        };

        Ok(Self {
            log_level,
            log_json,
            default_prefix,
            default_scheme,
        })
    }
}
