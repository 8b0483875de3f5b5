use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// When unset, the standard PG* variables are used.
    pub url: Option<String>,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            ssl_mode: parse_or("PGSSLMODE", &lookup, PgSslMode::Prefer, parse_ssl_mode)?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", &lookup, 10, |v| {
                v.parse().ok().filter(|n| *n > 0)
            })?,
            acquire_timeout: parse_or("DB_ACQUIRE_TIMEOUT_SECS", &lookup, Duration::from_secs(30), |v| {
                v.parse().ok().map(Duration::from_secs)
            })?,
        };

        let server = ServerConfig {
            host: parse_or("HOST", &lookup, IpAddr::from([0, 0, 0, 0]), |v| v.parse().ok())?,
            port: parse_or("PORT", &lookup, 5001, |v| v.parse().ok())?,
        };

        Ok(Self { database, server })
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url)?,
            None => PgConnectOptions::new(),
        };

        Ok(options.ssl_mode(self.ssl_mode))
    }
}

fn parse_ssl_mode(value: &str) -> Option<PgSslMode> {
    match value.to_lowercase().as_str() {
        "disable" => Some(PgSslMode::Disable),
        "prefer" => Some(PgSslMode::Prefer),
        "require" => Some(PgSslMode::Require),
        _ => None,
    }
}

fn parse_or<T, F, P>(name: &'static str, lookup: &F, default: T, parse: P) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => parse(value.trim()).ok_or(ConfigError::Invalid { name, value }),
    }
}
