mod api;
mod middleware;
mod views;

use std::sync::Arc;

use promos_ingest::{ParserRegistry, RemoteFileClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = promos_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "loaded configuration");

    let pool_config = promos_db::PoolConfig::from_app_config(&config);
    let pool = promos_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = promos_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied database migrations");
    }

    let fetcher = RemoteFileClient::new(config.fetch_timeout_secs, &config.fetch_user_agent)?;
    let state = AppState {
        pool,
        parsers: Arc::new(ParserRegistry::default()),
        fetcher,
        debug: config.debug,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, debug = config.debug, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
