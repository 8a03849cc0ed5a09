//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                       | Default          |
//! |--------------------------------|------------------|
//! | `PRODTRACK_BIND_ADDR`          | `0.0.0.0`        |
//! | `PRODTRACK_PORT`               | `8080`           |
//! | `PRODTRACK_DATABASE_PATH`      | `./prodtrack.db` |
//! | `PRODTRACK_DB_MAX_CONNECTIONS` | `5`              |

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use prodtrack_db::DbConfig;

/// Default `RUST_LOG` directive when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,prodtrack=debug";

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub bind_addr: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            database_path: PathBuf::from("./prodtrack.db"),
            db_max_connections: 5,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            bind_addr: parse_or(&lookup, "PRODTRACK_BIND_ADDR", defaults.bind_addr)?,
            port: parse_or(&lookup, "PRODTRACK_PORT", defaults.port)?,
            database_path: lookup("PRODTRACK_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            db_max_connections: parse_or(
                &lookup,
                "PRODTRACK_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "PRODTRACK_DB_MAX_CONNECTIONS".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::from_path(&self.database_path).max_connections(self.db_max_connections)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load_from(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.database_path, PathBuf::from("./prodtrack.db"));
        assert_eq!(config.db_config().max_connections, 5);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::load_from(lookup(&[
            ("PRODTRACK_BIND_ADDR", "127.0.0.1"),
            ("PRODTRACK_PORT", "9090"),
            ("PRODTRACK_DATABASE_PATH", ":memory:"),
            ("PRODTRACK_DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9090");
        // In-memory databases are always pinned to a single connection
        assert_eq!(config.db_config().max_connections, 1);
    }

    #[test]
    fn test_invalid_values() {
        let err = ServerConfig::load_from(lookup(&[("PRODTRACK_PORT", "eighty")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PRODTRACK_PORT: 'eighty'");

        assert!(ServerConfig::load_from(lookup(&[("PRODTRACK_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(ServerConfig::load_from(lookup(&[("PRODTRACK_BIND_ADDR", "localhost")])).is_err());
    }
}
