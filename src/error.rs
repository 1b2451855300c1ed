use std::time::Duration;

use thiserror::Error;

/// Rejected request parameters, reported before any search runs
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("Invalid operator '{0}', expected 'or' or 'and'")]
    InvalidOperator(String),

    #[error("Invalid type '{0}', expected 'all', 'images', 'documents' or 'videos'")]
    InvalidType(String),
}

/// Failures that abort a whole search request
#[derive(Error, Debug)]
pub enum SearchError {
    /// The full-text index could not answer a typed search
    #[error("Scoring oracle {oracle} unavailable: {source}")]
    OracleUnavailable {
        oracle: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Pages or items could not be loaded
    #[error("Content repository error: {0}")]
    Repository(#[source] anyhow::Error),

    #[error("Search did not finish within {0:?}")]
    Timeout(Duration),

    /// A fan-out task panicked or was cancelled
    #[error("Search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot identify config file type of {0}. Must be .toml, .json or .yaml")]
    UnknownFormat(String),

    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}
