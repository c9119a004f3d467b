use std::sync::Arc;

use anyhow::Context;
use cinegraph_api::{
    config::Config,
    db::Neo4jExecutor,
    routes::{create_router, AppState},
    services::RecommendationEngine,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinegraph_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let executor = Neo4jExecutor::connect(&config)
        .await
        .context("Failed to connect to Neo4j")?;

    let engine = RecommendationEngine::new(Arc::new(executor), config.scoring_mode);
    let state = Arc::new(AppState::new(engine, &config));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        scoring_mode = ?config.scoring_mode,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
