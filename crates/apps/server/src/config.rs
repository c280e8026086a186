use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub source: SourceConfig,
    pub airports_path: PathBuf,
    /// How long a fetched roster is served before the store is asked again.
    pub roster_ttl: Duration,
}

/// Where the roster comes from.
#[derive(Clone, Debug)]
pub enum SourceConfig {
    /// The external tabular store.
    Store(StoreConfig),
    /// A local JSON array of person records (`PEOPLE_PATH`), for offline use.
    File(PathBuf),
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub url: String,
    pub base: String,
    pub table: String,
    pub api_key: Option<String>,
    pub page_size: u32,
    pub max_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "invalid {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("NEIGHBORHOOD_ADDR").unwrap_or_else(|| "127.0.0.1:9200".to_string());
        let addr: SocketAddr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            key: "NEIGHBORHOOD_ADDR",
            value: raw_addr.clone(),
        })?;

        let source = match lookup("PEOPLE_PATH") {
            Some(path) => SourceConfig::File(PathBuf::from(path)),
            None => SourceConfig::Store(store_config(&lookup)?),
        };

        Ok(Self {
            addr,
            source,
            airports_path: lookup("AIRPORTS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/airports.json")),
            roster_ttl: Duration::from_secs(parse_or(&lookup, "ROSTER_TTL_SECS", 60)?),
        })
    }
}

fn store_config(lookup: &impl Fn(&str) -> Option<String>) -> Result<StoreConfig, ConfigError> {
    Ok(StoreConfig {
        url: lookup("STORE_URL").unwrap_or_else(|| "https://api.airtable.com".to_string()),
        base: lookup("STORE_BASE")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("STORE_BASE"))?,
        table: lookup("STORE_TABLE").unwrap_or_else(|| "Neighbors".to_string()),
        api_key: lookup("STORE_API_KEY").filter(|v| !v.trim().is_empty()),
        page_size: parse_or(lookup, "STORE_PAGE_SIZE", 100)?,
        max_pages: parse_or(lookup, "STORE_MAX_PAGES", 50)?,
    })
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
