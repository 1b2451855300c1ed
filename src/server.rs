use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::{
    config::Config,
    content::MemoryContent,
    core::{MemoryPopularity, QueryPopularity, SearchOrchestrator},
    engines,
    http::{self, AppState},
    redis,
};

async fn load_content(config: &Config) -> Result<Arc<MemoryContent>> {
    match &config.content.snapshot {
        Some(path) => Ok(Arc::new(MemoryContent::from_file(path).await?)),
        None => {
            log::warn!("No content snapshot configured, every search will be empty");
            Ok(Arc::new(MemoryContent::default()))
        }
    }
}

async fn popularity(config: &Config) -> Arc<dyn QueryPopularity> {
    match redis::connect(&config.redis).await {
        Some(redis) => Arc::new(redis),
        None => Arc::new(MemoryPopularity::new()),
    }
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let content = load_content(config).await?;
    let oracle = engines::from_config(config)?;

    let orchestrator = SearchOrchestrator::new(
        content.clone(),
        content,
        oracle,
        popularity(config).await,
        config.search.request_timeout(),
    );

    Ok(AppState {
        orchestrator: Arc::new(orchestrator),
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down...");
}

pub async fn run(config: &Config) -> Result<()> {
    let app = http::router(build_state(config).await?);

    let address = config.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    log::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
