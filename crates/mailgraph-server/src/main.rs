//! Mailgraph API server.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mailgraph_core::AppConfig;
use mailgraph_graph::{GraphClient, GraphConfig};
use mailgraph_server::llm::LlmClient;
use mailgraph_server::{build_router, AppState};

#[derive(Parser)]
#[command(name = "mailgraph-server")]
#[command(about = "Serve the Mailgraph HTTP API")]
struct Cli {
    /// Config file prefix (default: mailgraph).
    #[arg(short, long, default_value = "mailgraph")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Missing settings stop startup instead of surfacing per request.
    let config = AppConfig::load(&cli.config)?;
    config.validate_for_server()?;

    let graph = GraphClient::connect(&GraphConfig::from(&config.neo4j)).await?;

    let llm = LlmClient::new(&config.llm)?;
    info!(
        base_url = %config.llm.base_url,
        default_model = %config.llm.default_model,
        "LLM client ready"
    );

    let bind = config.server.bind.clone();
    let state = Arc::new(AppState::new(config, graph, llm));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Mailgraph server listening on {}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
