//! Notice Board - fixed-credential login and admin-managed notices
//!
//! Usage:
//!   noticeboard --port 5000 --database-path noticeboard.db

use anyhow::{Context, Result};
use clap::Parser;
use noticeboard_backend::{build_router, config::load_env, AppState, Config};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = Config::parse();

    info!("🚀 Notice board starting");

    if config.uses_insecure_secret() {
        warn!("⚠️  JWT_SECRET is not set; signing tokens with the built-in insecure default");
    }

    let state = AppState::from_config(&config)?;
    let existing = state.notices.count().await?;
    info!(
        "📊 Notice store opened at: {} ({} notices)",
        config.database_path, existing
    );

    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 Server running on port {}", config.port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noticeboard_backend=debug,noticeboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
