use anyhow::Result;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use crate::{
    config::Redis as RedisConfig,
    core::{PopularQuery, QueryPopularity},
};

async fn setup_redis(config: &RedisConfig) -> Option<RedisPopularity> {
    let client = match Client::open(config.url()) {
        Ok(client) => client,
        Err(err) => {
            log::error!("Failed to create a redis client - disabling redis: {}", err);
            return None;
        }
    };

    match client.get_connection_manager().await {
        Ok(manager) => {
            log::info!("Recording query popularity in redis key {}", config.key());
            Some(RedisPopularity {
                conn_manager: manager,
                key: config.key().to_string(),
            })
        }
        Err(err) => {
            log::error!("Failed to connect to redis - disabling redis: {}", err);
            None
        }
    }
}

/// Connects to redis when enabled, `None` means counting in memory
pub(crate) async fn connect(config: &RedisConfig) -> Option<RedisPopularity> {
    if !config.enabled() {
        log::info!("Redis disabled, query popularity kept in memory");
        return None;
    }
    setup_redis(config).await
}

/// Query counters in a sorted set, shared between instances
pub(crate) struct RedisPopularity {
    conn_manager: ConnectionManager,
    key: String,
}

impl RedisPopularity {
    fn connection(&self) -> ConnectionManager {
        self.conn_manager.clone()
    }
}

#[async_trait]
impl QueryPopularity for RedisPopularity {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn record_hit(&self, query: &str) -> Result<()> {
        let _: f64 = self.connection().zincr(&self.key, query, 1).await?;
        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<PopularQuery>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let entries: Vec<(String, f64)> = self
            .connection()
            .zrevrange_withscores(&self.key, 0, limit as isize - 1)
            .await?;

        Ok(entries
            .into_iter()
            .map(|(query, hits)| PopularQuery {
                query,
                hits: hits as u64,
            })
            .collect())
    }
}
