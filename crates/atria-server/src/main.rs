use atria_core::{SystemClock, ENV_ATRIA_LOG_LEVEL};
use atria_server::{build_router, AppState, LogNotificationSink, ServerConfig};
use atria_store::SqliteStore;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_env(ENV_ATRIA_LOG_LEVEL)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env();
    if let Some(parent) = config.db_path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            error!(path = %parent.display(), error = %err, "cannot create data directory");
            std::process::exit(1);
        }
    }

    let store = match SqliteStore::open(&config.db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!(path = %config.db_path.display(), error = %err, "cannot open store");
            std::process::exit(1);
        }
    };

    let state = AppState::new(
        store,
        Arc::new(LogNotificationSink),
        Arc::new(SystemClock),
        config.clone(),
    );
    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %config.bind_addr, error = %err, "cannot bind");
            std::process::exit(1);
        }
    };
    info!(addr = %config.bind_addr, db = %config.db_path.display(), "atria-server listening");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        error!("cannot install ctrl-c handler; running until killed");
        std::future::pending::<()>().await;
    }
}
