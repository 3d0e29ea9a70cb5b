use std::sync::Arc;

use cjtp_server::{
    config::Config, logging, store::InMemoryCategoryStore, tcp::server::Server, AppState,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let store = Arc::new(InMemoryCategoryStore::seeded());
    let state = AppState::new(store, config.read_timeout);
    let server = Server::bind(config.bind_socket()?, state).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        read_timeout_ms = config.read_timeout.as_millis(),
        "server starting"
    );

    server
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("server stopped");
    Ok(())
}
