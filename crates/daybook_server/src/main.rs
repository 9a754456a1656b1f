use anyhow::Result;
use clap::Parser;
use daybook_server::{build_router, AppState, ServerConfig};
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    let log_dir = config.resolved_log_dir()?;
    daybook_core::init_logging(config.log_level(), &log_dir)?;

    let state = AppState::new(config.db_path.clone());
    let removed = state.prepare_storage().await?;

    let app = build_router(state, &config.allowed_origins)?;
    let addr = config.socket_addr()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=server_start module=server status=ok addr={addr} db_path={} purged_on_start={removed} version={}",
        config.db_path.display(),
        daybook_core::core_version()
    );
    println!("daybook-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=server_stop module=server status=error error={err}");
    }
}
