use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::config::{Config, Content, Elasticsearch, Redis, Search, Server};

#[derive(Parser, Serialize, Debug)]
#[command(name = "journal-search", about = "Ranked search across journal pages and media")]
pub(crate) struct CliArgs {
    /// Address to listen on (default: 127.0.0.1)
    #[arg(long, env = "JS_HOST")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) host: Option<String>,

    /// Port to listen on (default: 8000)
    #[arg(short, long, env = "JS_PORT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) port: Option<u16>,

    /// Config file path (default: "config.toml")
    #[arg(short, long, env = "JS_CONFIG")]
    #[serde(skip_serializing)]
    pub(crate) config: Option<String>,

    /// Search request timeout in sec (default: 30)
    #[arg(long, env = "JS_REQUEST_TIMEOUT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) request_timeout: Option<u64>,

    /// Elasticsearch base URL, the local index is used when unset
    #[arg(long, env = "JS_ELASTICSEARCH_URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) elasticsearch_url: Option<String>,

    /// Elasticsearch index prefix (default: "journals")
    #[arg(long, env = "JS_ELASTICSEARCH_INDEX_PREFIX")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) elasticsearch_index_prefix: Option<String>,

    /// Elasticsearch timeout in sec (default: 10)
    #[arg(long, env = "JS_ELASTICSEARCH_TIMEOUT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) elasticsearch_timeout: Option<u64>,

    /// Disable Elasticsearch
    #[arg(long, env = "JS_ELASTICSEARCH_DISABLED")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) elasticsearch_disabled: Option<bool>,

    /// Redis Host
    #[arg(long, env = "JS_REDIS_HOST")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) redis_host: Option<String>,

    /// Redis Port
    #[arg(long, env = "JS_REDIS_PORT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) redis_port: Option<u16>,

    /// Redis sorted set for query popularity (default: "search:queries")
    #[arg(long, env = "JS_REDIS_KEY")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) redis_key: Option<String>,

    /// Redis Disabled (default: true)
    #[arg(long, env = "JS_REDIS_DISABLED")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) redis_disabled: Option<bool>,

    /// Content snapshot (JSON)
    #[arg(short, long, env = "JS_SNAPSHOT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) snapshot: Option<PathBuf>,
}

impl CliArgs {
    pub fn as_config(self) -> Config {
        Config {
            server: Server {
                host: self.host,
                port: self.port,
            },
            search: Search {
                request_timeout: self.request_timeout,
            },
            elasticsearch: Elasticsearch {
                url: self.elasticsearch_url,
                index_prefix: self.elasticsearch_index_prefix,
                timeout: self.elasticsearch_timeout,
                enabled: self.elasticsearch_disabled.map(|b| !b),
            },
            redis: Redis {
                host: self.redis_host,
                port: self.redis_port,
                key: self.redis_key,
                enabled: self.redis_disabled.map(|b| !b),
            },
            content: Content {
                snapshot: self.snapshot,
            },
        }
    }
}
