use jobboard_backend::{
    app,
    config::{get_config, init_config},
    database::pool::create_pool,
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobboard_backend=info,tower_http=info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool)?;
    let shutdown = app_state.shutdown.clone();
    let router = app(app_state, config.public_rps);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = ?e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown requested, cancelling in-flight searches");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
