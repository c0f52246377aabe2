//! Catalogue server entry point.
//!
//! Reads configuration from the environment, starts the store connection
//! supervisor in the background and serves HTTP until Ctrl-C.

use anyhow::Context;
use catalogue_core::{
    init_logging, CatalogueService, ConnectionSupervisor, ServiceConfig, SqliteConnector,
};
use catalogue_server::{build_router, AppState};
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let supervisor = Arc::new(ConnectionSupervisor::new(
        Arc::new(SqliteConnector),
        config.store_url.clone(),
        config.retry_backoff,
    ));
    let app = build_router(AppState::new(CatalogueService::new(supervisor.handle())));

    tokio::spawn({
        let supervisor = Arc::clone(&supervisor);
        async move { supervisor.supervise_forever().await }
    });

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("event=http_listen module=server status=ok addr={addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    info!("event=http_shutdown module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=http_shutdown module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
