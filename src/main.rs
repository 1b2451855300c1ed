mod cli;
mod config;
mod content;
mod core;
mod engines;
mod error;
mod http;
mod models;
mod redis;
mod server;
mod types;

#[cfg(test)]
mod testing;

use crate::config::get_config;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    log::info!("Starting journal search...");

    let config = get_config();
    if let Err(err) = server::run(config).await {
        log::error!("Server error: {:#}", err);
        std::process::exit(1);
    }

    log::info!("Journal search stopped");
}
