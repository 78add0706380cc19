use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use redex_core::Catalog;

/// Server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    /// Alternative menu file; the bundled menu is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub reservation_delay: Duration,
    pub newsletter_delay: Duration,
    /// Write requests allowed per client per second.
    pub write_limit: u32,
    /// Read requests allowed per client per second.
    pub read_limit: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = std::env::var("REDEX_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("REDEX_LISTEN_ADDR", "must be a valid socket address")
            })?;

        let db_path = std::env::var("REDEX_DB_PATH")
            .unwrap_or_else(|_| "./redex.redb".to_string())
            .into();

        let catalog_path = match std::env::var("REDEX_CATALOG_PATH") {
            Ok(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => None,
        };

        let reservation_delay =
            Duration::from_millis(Self::parse_var("REDEX_RESERVATION_DELAY_MS", 2000)?);
        let newsletter_delay =
            Duration::from_millis(Self::parse_var("REDEX_NEWSLETTER_DELAY_MS", 1500)?);

        let write_limit: u32 = Self::parse_var("REDEX_WRITE_LIMIT", 5)?;
        let read_limit: u32 = Self::parse_var("REDEX_READ_LIMIT", 20)?;
        if write_limit == 0 || read_limit == 0 {
            return Err(ConfigError::Invalid(
                "REDEX_WRITE_LIMIT/REDEX_READ_LIMIT",
                "must be at least 1",
            ));
        }

        Ok(Config {
            listen_addr,
            db_path,
            catalog_path,
            reservation_delay,
            newsletter_delay,
            write_limit,
            read_limit,
        })
    }

    fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
        Self::parse_value(var, std::env::var(var).ok(), default)
    }

    /// Parse an optional raw value, rejecting anything out of range for `T`.
    fn parse_value<T: FromStr>(
        var: &'static str,
        raw: Option<String>,
        default: T,
    ) -> Result<T, ConfigError> {
        match raw {
            Some(s) if !s.is_empty() => s
                .parse()
                .map_err(|_| ConfigError::Invalid(var, "must be a non-negative integer in range")),
            _ => Ok(default),
        }
    }

    /// Load the configured menu, or the bundled one.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| ConfigError::Unreadable(path.clone(), e.to_string()))?;
                Catalog::from_json(&json)
            }
            None => Catalog::bundled(),
        };
        catalog.map_err(|e| ConfigError::Catalog(e.to_string()))
    }

    /// Create a test configuration.
    pub fn for_testing() -> Self {
        Config {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            db_path: PathBuf::from("/tmp/redex-test.redb"),
            catalog_path: None,
            reservation_delay: Duration::from_millis(2000),
            newsletter_delay: Duration::from_millis(1500),
            write_limit: 1000,
            read_limit: 1000,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str, &'static str),
    Unreadable(PathBuf, String),
    Catalog(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid(var, msg) => write!(f, "Invalid value for {}: {}", var, msg),
            ConfigError::Unreadable(path, msg) => {
                write!(f, "Cannot read {}: {}", path.display(), msg)
            }
            ConfigError::Catalog(msg) => write!(f, "Invalid catalog: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
