mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use roomswap_api::auth::{AppState, AppStateInner};
use roomswap_api::password;
use roomswap_api::sessions::{self, SessionRegistry};
use roomswap_db::seed::seed_demo_data;
use roomswap_db::{Database, Store};

use crate::config::Config;

/// Password shared by every seeded demo student.
const DEMO_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomswap=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init store
    let db = match &config.db_path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    if config.seed {
        let hash = password::hash(DEMO_PASSWORD.to_string()).await?;
        if !seed_demo_data(&db, &hash)? {
            info!("Store already populated, skipping seed data");
        }
    }
    let store: Arc<dyn Store> = Arc::new(db);

    // Shared state
    let sessions = SessionRegistry::new(chrono::Duration::hours(config.session_ttl_hours));
    tokio::spawn(sessions::run_purge_loop(
        sessions.clone(),
        config.session_purge_secs,
    ));

    let state: AppState = Arc::new(AppStateInner { store, sessions });

    let app = roomswap_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Room swap server listening on {}", config.bind_address);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        else {
            ctrl_c.await.ok();
            info!("Received Ctrl+C, shutting down...");
            return;
        };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
