//! Server configuration module.
//!
//! This module provides configuration loading for the Knowledge Hub server
//! from environment variables.
//!
//! # Environment Variables
//!
//! - `SECRET_KEY`: Token signing secret (default: `dev-only-change-me`)
//! - `JWT_ALGORITHM`: Token signing algorithm, one of `HS256`, `HS384`, `HS512` (default: `HS256`)
//! - `ACCESS_TOKEN_EXPIRE_MINUTES`: Token lifetime in minutes (default: `60`)
//! - `DATABASE_PATH`: SQLite database file (default: `./data/knowledge_hub.db`)
//! - `LISTEN_PORT`: Port to listen on (default: `8000`)
//! - `CORS_ORIGINS`: Comma-separated allowed origins (default: the Vite dev server origins)
//!
//! # Invariants
//!
//! - The token configuration is validated once here and never mutated afterwards
//! - `listen_port` is always a valid port number (1-65535)

use std::path::PathBuf;

use crate::auth::{TokenConfig, TokenConfigError};

/// Server configuration.
///
/// Contains all configuration parameters needed to run the server.
///
/// # Post-conditions
///
/// - `token` holds a non-empty secret, an HMAC algorithm and a positive TTL
/// - `cors_origins` contains no empty entries
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Signing configuration for access tokens.
    pub token: TokenConfig,
    /// Path of the SQLite database file.
    pub database_path: PathBuf,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
    /// Origins allowed to make cross-origin requests.
    pub cors_origins: Vec<String>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 8000;
    /// Default database file.
    pub const DEFAULT_DATABASE_PATH: &'static str = "./data/knowledge_hub.db";
    /// Development-only signing secret.
    pub const DEFAULT_SECRET_KEY: &'static str = "dev-only-change-me";
    /// Default signing algorithm.
    pub const DEFAULT_ALGORITHM: &'static str = "HS256";
    /// Default token lifetime.
    pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
    /// Default CORS origins (Vite dev server).
    pub const DEFAULT_CORS_ORIGINS: &'static str = "http://localhost:5173,http://127.0.0.1:5173";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that cannot be parsed
    /// or violates the token configuration constraints.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a map so they never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = Self::load_token_config(&lookup)?;
        let database_path = lookup("DATABASE_PATH")
            .map_or_else(|| PathBuf::from(Self::DEFAULT_DATABASE_PATH), PathBuf::from);
        let listen_port = Self::load_listen_port(&lookup)?;
        let cors_origins = Self::load_cors_origins(&lookup);

        Ok(Self {
            token,
            database_path,
            listen_port,
            cors_origins,
        })
    }

    /// Whether the server is running with the built-in development secret.
    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.token.secret() == Self::DEFAULT_SECRET_KEY.as_bytes()
    }

    fn load_token_config<F>(lookup: &F) -> Result<TokenConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SECRET_KEY").unwrap_or_else(|| Self::DEFAULT_SECRET_KEY.to_string());

        let algorithm_name =
            lookup("JWT_ALGORITHM").unwrap_or_else(|| Self::DEFAULT_ALGORITHM.to_string());
        let algorithm =
            TokenConfig::parse_algorithm(&algorithm_name).map_err(|e| ConfigError::InvalidValue {
                name: "JWT_ALGORITHM".to_string(),
                message: e.to_string(),
            })?;

        let ttl_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "ACCESS_TOKEN_EXPIRE_MINUTES".to_string(),
                    message: format!("'{value}' is not an integer"),
                })?,
            None => Self::DEFAULT_TOKEN_TTL_MINUTES,
        };

        TokenConfig::new(secret.into_bytes(), algorithm, ttl_minutes).map_err(|e| {
            let name = match e {
                TokenConfigError::EmptySecret => "SECRET_KEY",
                TokenConfigError::UnsupportedAlgorithm(_) => "JWT_ALGORITHM",
                TokenConfigError::InvalidTtl(_) => "ACCESS_TOKEN_EXPIRE_MINUTES",
            };
            ConfigError::InvalidValue {
                name: name.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Load the listen port.
    ///
    /// Returns the default if not set.
    fn load_listen_port<F>(lookup: &F) -> Result<u16, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("LISTEN_PORT") {
            Some(value) => match value.trim().parse::<u16>() {
                Ok(port) if port != 0 => Ok(port),
                _ => Err(ConfigError::InvalidValue {
                    name: "LISTEN_PORT".to_string(),
                    message: format!("'{value}' is not a valid port number (must be 1-65535)"),
                }),
            },
            None => Ok(Self::DEFAULT_PORT),
        }
    }

    fn load_cors_origins<F>(lookup: &F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("CORS_ORIGINS")
            .unwrap_or_else(|| Self::DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}
