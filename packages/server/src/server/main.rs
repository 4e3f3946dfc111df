// Main entry point for the annotator API server

use anyhow::{Context, Result};
use annotator_core::domains::corpus::PostgresCorpusStore;
use annotator_core::kernel::{PealimLexicon, PipelineRunner, ServerDeps};
use annotator_core::{server::build_app, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,annotator_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Hebrew corpus annotator");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        provider = ?config.oracle_provider,
        model = %config.oracle_model,
        lexicon = %config.lexicon_base_url,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let store = PostgresCorpusStore::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    store.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // External collaborators
    let oracle = config
        .oracle_provider
        .build(
            config.oracle_api_key.clone(),
            config.oracle_model.clone(),
            config.oracle_timeout,
        )
        .context("Failed to create oracle client")?;
    let lexicon = PealimLexicon::new(config.lexicon_base_url.clone(), config.lexicon_timeout)
        .context("Failed to create lexicon client")?;

    let deps = ServerDeps::new(
        Arc::new(store),
        oracle,
        Arc::new(lexicon),
        config.annotation.clone(),
        config.roots.clone(),
    )
    .context("Failed to build pipelines")?;

    // Build application
    let app = build_app(PipelineRunner::new(deps));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
