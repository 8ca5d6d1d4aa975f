//! Server configuration module.
//!
//! This module provides configuration loading for the campus server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `CAMPUS_JWT_SECRET`: HS256 secret used to sign and verify bearer tokens (required)
//! - `CAMPUS_JWT_EXPIRES_IN_SECS`: Lifetime of issued tokens in seconds (default: `604800`)
//! - `CAMPUS_LISTEN_PORT`: Port to listen on (default: `5000`)
//! - `CAMPUS_ENV`: `production` or any other value for a non-production mode
//!   (default: production)
//!
//! # Invariants
//!
//! - `jwt_secret` is never empty
//! - `token_ttl_secs` is always greater than zero
//! - The configuration is loaded once at start-up and never mutated afterwards

use thiserror::Error;

use crate::auth::{SigningSecret, SigningSecretError};

const JWT_SECRET_VAR: &str = "CAMPUS_JWT_SECRET";
const JWT_EXPIRES_IN_VAR: &str = "CAMPUS_JWT_EXPIRES_IN_SECS";
const LISTEN_PORT_VAR: &str = "CAMPUS_LISTEN_PORT";
const ENV_VAR: &str = "CAMPUS_ENV";

/// Controls whether diagnostic traces reach clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    /// Diagnostics are never exposed.
    #[default]
    Production,
    /// Diagnostic traces are attached to error envelopes.
    Development,
}

impl OperatingMode {
    /// Parse the `CAMPUS_ENV` value. Anything but `production` is non-production.
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("production") => Self::Production,
            Some(_) => Self::Development,
        }
    }

    #[must_use]
    pub const fn exposes_diagnostics(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
        }
    }
}

/// Server configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()` or `from_lookup()`:
/// - `jwt_secret` holds non-empty key material
/// - `token_ttl_secs` is positive
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Secret for signing and verifying bearer tokens.
    pub jwt_secret: SigningSecret,
    /// Lifetime of issued tokens.
    pub token_ttl_secs: u64,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
    /// Production or not; gates diagnostic traces.
    pub mode: OperatingMode,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 5000;
    /// Default token lifetime: seven days.
    pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `CAMPUS_JWT_SECRET` is not set or is empty
    /// - `CAMPUS_JWT_EXPIRES_IN_SECS` is set but not a positive integer
    /// - `CAMPUS_LISTEN_PORT` is set but not a valid port number
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = Self::load_jwt_secret(&lookup)?;
        let token_ttl_secs = Self::load_token_ttl(&lookup)?;
        let listen_port = Self::load_listen_port(&lookup)?;
        let mode = OperatingMode::from_env_value(lookup(ENV_VAR).as_deref());

        Ok(Self {
            jwt_secret,
            token_ttl_secs,
            listen_port,
            mode,
        })
    }

    fn load_jwt_secret(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<SigningSecret, ConfigError> {
        let secret = lookup(JWT_SECRET_VAR)
            .ok_or_else(|| ConfigError::MissingEnvVar(JWT_SECRET_VAR.to_string()))?;

        SigningSecret::new(secret.into_bytes()).map_err(|SigningSecretError::Empty| {
            ConfigError::InvalidValue {
                name: JWT_SECRET_VAR.to_string(),
                message: "must not be empty".to_string(),
            }
        })
    }

    fn load_token_ttl(lookup: impl Fn(&str) -> Option<String>) -> Result<u64, ConfigError> {
        let Some(value) = lookup(JWT_EXPIRES_IN_VAR) else {
            return Ok(Self::DEFAULT_TOKEN_TTL_SECS);
        };
        match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::InvalidValue {
                name: JWT_EXPIRES_IN_VAR.to_string(),
                message: format!("'{value}' is not a positive number of seconds"),
            }),
        }
    }

    fn load_listen_port(lookup: impl Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
        match lookup(LISTEN_PORT_VAR) {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: LISTEN_PORT_VAR.to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
            None => Ok(Self::DEFAULT_PORT),
        }
    }
}
