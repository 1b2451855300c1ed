use std::{path::PathBuf, time::Duration};

use clap::Parser;
use figment::{
    Figment,
    providers::{Format, Json, Serialized, Toml, Yaml},
};
use normalize_path::NormalizePath;
use once_cell::sync::OnceCell;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};

use crate::{cli::CliArgs, error::ConfigError};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;
const DEFAULT_INDEX_PREFIX: &str = "journals";
const DEFAULT_ES_TIMEOUT: u64 = 10;
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_REDIS_KEY: &str = "search:queries";

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Server {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Search {
    /// Upper bound for a whole search request in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Elasticsearch {
    /// Base url, the local index is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_prefix: Option<String>,
    /// Per request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Redis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Sorted set holding the query popularity counters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Content {
    /// JSON snapshot of journals, pages, items and grants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub server: Server,
    pub search: Search,
    pub elasticsearch: Elasticsearch,
    pub redis: Redis,
    pub content: Content,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: Server {
                host: Some(DEFAULT_HOST.to_string()),
                port: Some(DEFAULT_PORT),
            },
            search: Search {
                request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            },
            elasticsearch: Elasticsearch {
                url: None,
                index_prefix: Some(DEFAULT_INDEX_PREFIX.to_string()),
                timeout: Some(DEFAULT_ES_TIMEOUT),
                enabled: Some(true),
            },
            redis: Redis {
                host: Some(DEFAULT_REDIS_HOST.to_string()),
                port: Some(DEFAULT_REDIS_PORT),
                key: Some(DEFAULT_REDIS_KEY.to_string()),
                enabled: Some(false),
            },
            content: Content { snapshot: None },
        }
    }
}

impl Server {
    pub fn address(&self) -> String {
        format!(
            "{}:{}",
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT)
        )
    }
}

impl Search {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
    }
}

impl Elasticsearch {
    /// The configured url, unless elasticsearch is disabled
    pub fn active_url(&self) -> Option<&str> {
        if self.enabled.unwrap_or(true) {
            self.url.as_deref()
        } else {
            None
        }
    }

    pub fn index_prefix(&self) -> &str {
        self.index_prefix.as_deref().unwrap_or(DEFAULT_INDEX_PREFIX)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_ES_TIMEOUT))
    }
}

impl Redis {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn url(&self) -> String {
        format!(
            "redis://{}:{}",
            self.host.as_deref().unwrap_or(DEFAULT_REDIS_HOST),
            self.port.unwrap_or(DEFAULT_REDIS_PORT)
        )
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(DEFAULT_REDIS_KEY)
    }
}

pub(crate) fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| match load_config(CliArgs::parse()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    })
}

pub(crate) fn load_config(args: CliArgs) -> Result<Config, ConfigError> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

    let config_path = PathBuf::from(
        args.config
            .clone()
            .unwrap_or(DEFAULT_CONFIG_PATH.to_string()),
    );

    if config_path.exists() {
        log::info!("Config file found: {}", config_path.display());
        figment = match config_path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(&config_path)),
            Some("json") => figment.merge(Json::file(&config_path)),
            Some("yaml") | Some("yml") => figment.merge(Yaml::file(&config_path)),
            _ => {
                return Err(ConfigError::UnknownFormat(
                    config_path.display().to_string(),
                ));
            }
        };
    } else if config_path.to_str() != Some(DEFAULT_CONFIG_PATH) {
        return Err(ConfigError::NotFound(config_path.display().to_string()));
    }

    let mut config: Config = figment
        .merge(Serialized::defaults(args.as_config()))
        .extract()?;

    config.content.snapshot = config
        .content
        .snapshot
        .map(|snapshot| snapshot.resolve().normalize());

    log::debug!("Loaded config: {:#?}", config);

    Ok(config)
}
