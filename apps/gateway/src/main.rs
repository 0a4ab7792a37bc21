use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gateway::analysis::scoring_client::HttpScoringService;
use gateway::config::Config;
use gateway::extraction::ExtractorRegistry;
use gateway::routes::build_router;
use gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gateway v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory {}",
                config.upload_dir.display()
            )
        })?;
    info!("Staging uploads in {}", config.upload_dir.display());

    let scoring = HttpScoringService::new(&config.scoring_service_url, config.scoring_timeout)?;
    info!(
        "Scoring service at {} (timeout {:?})",
        scoring.endpoint(),
        config.scoring_timeout
    );

    let registry = ExtractorRegistry::with_defaults();
    info!(
        "Extractors registered: {}",
        registry
            .tags()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    match config.max_upload_bytes {
        Some(limit) => info!("Upload limit: {limit} bytes"),
        None => info!("Upload limit disabled"),
    }

    let state = AppState::new(config.clone(), registry, Arc::new(scoring));

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Server running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
