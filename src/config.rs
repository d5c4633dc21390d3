// Configuration for the engine, the HTTP boundary, and where the catalog comes from

use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CHILD_AGE_CEILING: u32 = 11;
pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3001);
pub const DEFAULT_CATALOG_DIR: &str = "samples";
// 6 adults and 7 children
pub const DEFAULT_MAX_PARTY_SIZE: u32 = 13;
pub const DEFAULT_MAX_STAY_NIGHTS: u32 = 365;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    // Child age ceiling for hotels whose multiplier rows carry no age intervals
    pub default_child_age_ceiling: Decimal,
    // Room cap for the partition search; None searches every room count
    pub max_rooms: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_child_age_ceiling: Decimal::from(DEFAULT_CHILD_AGE_CEILING),
            max_rooms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_party_size: u32,
    pub max_stay_nights: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            max_party_size: DEFAULT_MAX_PARTY_SIZE,
            max_stay_nights: DEFAULT_MAX_STAY_NIGHTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLocation {
    Directory(PathBuf),
    Url(String),
}

impl Default for CatalogLocation {
    fn default() -> Self {
        CatalogLocation::Directory(PathBuf::from(DEFAULT_CATALOG_DIR))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub server: ServerConfig,
    pub catalog: CatalogLocation,
}

impl AppConfig {
    // Read the process environment, after loading a `.env` file if one exists
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(value) = lookup("QUOTE_BIND_ADDR") {
            config.server.bind_addr = parse_value("QUOTE_BIND_ADDR", &value)?;
        }
        if let Some(value) = lookup("QUOTE_MAX_PARTY_SIZE") {
            config.server.max_party_size = parse_value("QUOTE_MAX_PARTY_SIZE", &value)?;
        }
        if let Some(value) = lookup("QUOTE_MAX_STAY_NIGHTS") {
            config.server.max_stay_nights = parse_value("QUOTE_MAX_STAY_NIGHTS", &value)?;
        }
        if let Some(value) = lookup("QUOTE_DEFAULT_CHILD_AGE_CEILING") {
            config.engine.default_child_age_ceiling =
                parse_value("QUOTE_DEFAULT_CHILD_AGE_CEILING", &value.replace(',', "."))?;
        }
        if let Some(value) = lookup("QUOTE_MAX_ROOMS") {
            let max_rooms: usize = parse_value("QUOTE_MAX_ROOMS", &value)?;
            if max_rooms == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "QUOTE_MAX_ROOMS".to_string(),
                    value,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.engine.max_rooms = Some(max_rooms);
        }

        // A URL wins over a directory
        if let Some(url) = lookup("QUOTE_CATALOG_URL").filter(|v| !v.trim().is_empty()) {
            config.catalog = CatalogLocation::Url(url);
        } else if let Some(dir) = lookup("QUOTE_CATALOG_DIR") {
            config.catalog = CatalogLocation::Directory(PathBuf::from(dir));
        }

        Ok(config)
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
