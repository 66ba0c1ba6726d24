//! CLI entry point for friendgraph.
//!
//! Writes JSON results to stdout and logs to stderr, so output can be piped
//! straight into other tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{fmt, EnvFilter};

use friendgraph_core::{Diagnostics, PipelineConfig};
use friendgraph_ingest::multiquery;
use friendgraph_pipeline::{Orchestrator, ReplaySource};

#[derive(Parser)]
#[command(name = "friendgraph")]
#[command(about = "Batched friend-graph ingestion and analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: friendgraph).
    #[arg(short, long, default_value = "friendgraph", global = true)]
    config: String,

    /// Override the batch size for friendship queries.
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Shuffle friends before batching.
    #[arg(long, global = true)]
    randomize: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded dump through the full pipeline and print the report.
    Analyze {
        /// Path to the dump JSON file.
        #[arg(long)]
        dump: PathBuf,
    },
    /// Parse a multiquery envelope from stdin and print its named result sets.
    Parse,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { ref dump } => {
            let config = load_config(&cli)?;
            let source = ReplaySource::from_path(dump)?;
            let orchestrator = Orchestrator::new(source, config)?;
            let outcome = orchestrator.run().await?;
            println!("{}", serde_json::to_string(&outcome.report)?);
        }
        Command::Parse => {
            let input = std::io::read_to_string(std::io::stdin())?;
            let envelope: Value = serde_json::from_str(&input)?;
            println!("{}", render_parsed(&envelope)?);
        }
    }

    Ok(())
}

/// Named result sets in envelope order, plus any warnings raised while parsing.
fn render_parsed(envelope: &Value) -> anyhow::Result<Value> {
    let mut diagnostics = Diagnostics::new();
    let parsed = multiquery::parse::<Value>(envelope, &mut diagnostics)?;
    let results: Vec<Value> = parsed
        .iter()
        .map(|(name, rows)| json!({ "name": name, "rows": rows }))
        .collect();

    Ok(json!({ "results": results, "warnings": diagnostics.warnings() }))
}

fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut config = PipelineConfig::load(&cli.config)?;
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    if cli.randomize {
        config.randomize_chunks = true;
    }
    config.validate()?;
    Ok(config)
}
