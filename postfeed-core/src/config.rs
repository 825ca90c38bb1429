//! Process configuration, read once at startup from a TOML file.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::io::ErrorKind;

pub const CONFIG_PATH_ENV: &str = "POSTFEED_CONFIG";
pub const APP_ENV: &str = "APP_ENV";

/// Largest feed window a client may ask for. The configured page size is
/// also the default window, so it is held to the same bound.
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub log_level: String,
    pub server: ServerConfig,
    pub feed: FeedConfig,
    pub ads: AdsConfig,
    pub author: AuthorConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub items_per_page: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdsConfig {
    pub enabled: bool,
    pub min_organic_count: usize,
    pub positions: Vec<AdSlot>,
}

/// One `threshold -> index` entry of the ad position map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AdSlot {
    pub min_posts: usize,
    pub index: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub prefix: String,
    pub id_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Minimum organic page length mapped to the index a promoted post goes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdPositionMap(BTreeMap<usize, usize>);

impl AdPositionMap {
    pub fn from_slots(slots: &[AdSlot]) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for slot in slots {
            if map.insert(slot.min_posts, slot.index).is_some() {
                return Err(ConfigError::InvalidValue {
                    field: "ads.positions".to_string(),
                    value: format!("duplicate min_posts {}", slot.min_posts),
                });
            }
        }
        Ok(Self(map))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(min_posts, index)` pairs in threshold order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(min_posts, index)| (*min_posts, *index))
    }
}

impl FromIterator<(usize, usize)> for AdPositionMap {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "postfeed".to_string(),
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            feed: FeedConfig::default(),
            ads: AdsConfig::default(),
            author: AuthorConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { items_per_page: 25 }
    }
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_organic_count: 3,
            positions: vec![
                AdSlot {
                    min_posts: 3,
                    index: 1,
                },
                AdSlot {
                    min_posts: 17,
                    index: 16,
                },
            ],
        }
    }
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            prefix: "t2_".to_string(),
            id_length: 8,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://postfeed.db".to_string(),
            max_connections: 5,
        }
    }
}

impl AdsConfig {
    pub fn position_map(&self) -> Result<AdPositionMap, ConfigError> {
        AdPositionMap::from_slots(&self.positions)
    }
}

impl AppConfig {
    /// Reads and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::Read {
                path: path.display().to_string(),
                source: e,
            },
        })?;

        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.feed.items_per_page) {
            return Err(ConfigError::ValidationFailed {
                reason: format!("feed.items_per_page must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }
        if self.author.id_length == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "author.id_length must be greater than zero".to_string(),
            });
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "server.request_timeout_secs must be greater than zero".to_string(),
            });
        }
        self.ads.position_map()?;
        Ok(())
    }

    /// `POSTFEED_CONFIG` wins, then `config/{APP_ENV}.toml`, then `config/default.toml`.
    pub fn resolve_path() -> PathBuf {
        resolve_path_from(
            std::env::var(CONFIG_PATH_ENV).ok(),
            std::env::var(APP_ENV).ok(),
        )
    }
}

fn resolve_path_from(explicit: Option<String>, app_env: Option<String>) -> PathBuf {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    match app_env.filter(|env| !env.is_empty()) {
        Some(env) => PathBuf::from("config").join(format!("{env}.toml")),
        None => PathBuf::from("config").join("default.toml"),
    }
}
