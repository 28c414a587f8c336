use anyhow::{Context, Result};
use calendar_api::{create_router, AppState, EventDatabase, ServerConfig};
use calendar_core::init_logging;
use log::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let database = EventDatabase::open(&config.db_path).with_context(|| {
        format!("failed to open event store at {}", config.db_path.display())
    })?;
    let database_path = database.path().to_path_buf();
    let app = create_router(AppState::new(database));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(
        "event=server_start module=api status=ok addr={} db_path={}",
        config.bind_addr,
        database_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_listen module=api status=error error={}", err);
        // Keep serving; without a signal handler the process is stopped externally.
        std::future::pending::<()>().await;
    }
}
