//! Service configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `HOST`: bind address (default: `127.0.0.1`)
//! - `PORT`: bind port (default: `3001`)
//! - `CATALOG_SIZE`: number of catalog items (default: `1000000`, must be > 0)
//! - `WORKER_THREADS`: tokio worker threads (default: one per logical CPU)

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

use crate::domain::DEFAULT_CATALOG_SIZE;

/// Default bind address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 3001;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `PORT` is not a valid port number.
    #[error("Invalid port: '{0}'. Expected an integer between 0 and 65535")]
    InvalidPort(String),

    /// `CATALOG_SIZE` is not a positive integer.
    #[error("Invalid catalog size: '{0}'. Expected a positive integer")]
    InvalidCatalogSize(String),

    /// `HOST` and `PORT` do not form a socket address.
    #[error("Invalid server address: '{0}'")]
    InvalidAddress(String),

    /// `WORKER_THREADS` is not a positive integer.
    #[error("Invalid worker thread count: '{0}'. Expected a positive integer")]
    InvalidWorkerThreads(String),

    /// A client base URL is not an http(s) URL.
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// A variable holds non-UTF-8 data.
    #[error("{0} contains a non-UTF-8 value")]
    NotUnicode(&'static str),
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound N of the catalog range `1..=N`.
    pub catalog_size: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            catalog_size: DEFAULT_CATALOG_SIZE,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration from environment variables.
    ///
    /// Empty or whitespace-only values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if `PORT` or `CATALOG_SIZE` cannot be
    /// parsed, or if a variable is not valid UTF-8.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let host = read_var("HOST")?;
        let port = read_var("PORT")?;
        let catalog_size = read_var("CATALOG_SIZE")?;
        Self::from_values(host.as_deref(), port.as_deref(), catalog_size.as_deref())
    }

    /// Builds a configuration from raw values, applying defaults for `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if a present value is invalid.
    pub fn from_values(
        host: Option<&str>,
        port: Option<&str>,
        catalog_size: Option<&str>,
    ) -> Result<Self, ConfigurationError> {
        let port = match port {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigurationError::InvalidPort(value.to_string()))?,
            None => DEFAULT_PORT,
        };

        let catalog_size = match catalog_size {
            Some(value) => match value.parse::<i64>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigurationError::InvalidCatalogSize(value.to_string())),
            },
            None => DEFAULT_CATALOG_SIZE,
        };

        Ok(Self {
            host: host.unwrap_or(DEFAULT_HOST).to_string(),
            port,
            catalog_size,
        })
    }

    /// Resolves the bind address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidAddress` if `host:port` does not
    /// parse as a socket address.
    pub fn socket_address(&self) -> Result<SocketAddr, ConfigurationError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigurationError::InvalidAddress(address))
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Worker thread count for the tokio runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerThreads {
    /// Let tokio choose.
    Default,
    Requested(usize),
    /// The request was above `limit` and was lowered to it.
    Capped { requested: usize, limit: usize },
}

impl WorkerThreads {
    /// Reads `WORKER_THREADS`, capped at four threads per logical CPU.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the value is not a positive integer or
    /// not valid UTF-8.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let limit = std::thread::available_parallelism()
            .map_or(64, |parallelism| parallelism.get().saturating_mul(4));
        Self::from_value(read_var("WORKER_THREADS")?.as_deref(), limit)
    }

    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidWorkerThreads` for zero or
    /// non-numeric values.
    pub fn from_value(raw: Option<&str>, limit: usize) -> Result<Self, ConfigurationError> {
        let Some(raw) = raw else {
            return Ok(Self::Default);
        };
        match raw.parse::<usize>() {
            Ok(0) | Err(_) => Err(ConfigurationError::InvalidWorkerThreads(raw.to_string())),
            Ok(requested) if requested > limit => Ok(Self::Capped { requested, limit }),
            Ok(requested) => Ok(Self::Requested(requested)),
        }
    }

    /// The count to pass to the runtime builder, if any.
    #[must_use]
    pub const fn count(self) -> Option<usize> {
        match self {
            Self::Default => None,
            Self::Requested(threads) | Self::Capped { limit: threads, .. } => Some(threads),
        }
    }
}

/// Reads an environment variable, trimming it and treating blank as unset.
///
/// # Errors
///
/// Returns `ConfigurationError::NotUnicode` for non-UTF-8 values.
pub fn read_var(name: &'static str) -> Result<Option<String>, ConfigurationError> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigurationError::NotUnicode(name)),
    }
}

// =============================================================================
// Tests
// =============================================================================
