//! CLI entry point for the mailgraph-ingest loader.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use mailgraph_core::AppConfig;
use mailgraph_graph::{GraphClient, GraphConfig};

use mailgraph_ingest::config::IngestConfig;
use mailgraph_ingest::{reader, run_ingestion};

#[derive(Parser)]
#[command(name = "mailgraph-ingest")]
#[command(about = "Load email records into the Mailgraph Neo4j graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: mailgraph).
    #[arg(short, long, default_value = "mailgraph", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a JSON array of email records.
    Load {
        /// Input file (default: ingest.input_path from config).
        path: Option<PathBuf>,

        /// Print the run report as JSON instead of a summary line.
        #[arg(long)]
        json: bool,
    },
    /// Check that Neo4j is reachable with the configured credentials.
    Check,
    /// Print a few SENT edges as `sender subject` lines.
    Sample {
        #[arg(short, long, default_value_t = 5)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let app_config = AppConfig::load(&cli.config)?;
    let graph_config = GraphConfig::from(&app_config.neo4j);

    match cli.command {
        Command::Load { path, json } => {
            let ingest_config = IngestConfig::load(&cli.config)?;
            let path = path.unwrap_or_else(|| PathBuf::from(&ingest_config.input_path));

            // Validate before connecting so a bad file never touches the store.
            let records = reader::read_batch(&path)?;
            tracing::info!(path = %path.display(), records = records.len(), "Input validated");

            let graph = GraphClient::connect(&graph_config).await?;
            let report = run_ingestion(&graph, &records, &ingest_config).await?;

            if json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("Ingested {} emails.", report.records);
            }
        }
        Command::Check => {
            let graph = GraphClient::connect(&graph_config).await?;
            let msg = graph.hello().await?.unwrap_or_default();
            println!("{} ({})", msg, graph_config.uri);
        }
        Command::Sample { limit } => {
            let graph = GraphClient::connect(&graph_config).await?;
            for row in graph.sample_sent(limit).await? {
                println!(
                    "{} {}",
                    row.sender.as_deref().unwrap_or("-"),
                    row.subject.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}
