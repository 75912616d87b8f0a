use anyhow::Result;
use clap::{Parser, Subcommand};
use triage::cli::client::{ClientConfig, TriageClient};
use triage::cli::commands;
use triage::model::DemandMetadata;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Demand Triage - classify, summarize and look up support demands")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
struct Cli {
  /// Base URL of the triage server
  #[arg(long, global = true, env = "TRIAGE_SERVER", default_value = "http://localhost:9000")]
  server: String,

  /// Request timeout in seconds
  #[arg(long, global = true, default_value_t = 150)]
  timeout_secs: u64,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Classify a demand by type and urgency
  Classify {
    /// Demand text
    content: String,
  },
  /// Summarize a demand in at most three sentences
  Summarize {
    /// Demand text
    content: String,
  },
  /// Find stored demands similar to the given text
  Similar {
    /// Demand text
    content: String,
    /// Maximum number of matches
    #[arg(short, long, default_value_t = 3)]
    k: usize,
  },
  /// Store a demand for future similarity lookups
  Store {
    /// Unique demand id; storing an existing id replaces it
    #[arg(long)]
    id: String,
    /// Demand text
    content: String,
    /// Channel the demand came from
    #[arg(long)]
    source: Option<String>,
    /// Department responsible for the demand
    #[arg(long)]
    department: Option<String>,
  },
  /// Show vector index statistics and the active model
  Stats,
  /// Check that the server is up
  Health,
}

async fn handle(client: &TriageClient, command: Command) -> Result<()> {
  match command {
    Command::Classify { content } => commands::classify(client, &content).await,
    Command::Summarize { content } => commands::summarize(client, &content).await,
    Command::Similar { content, k } => commands::find_similar(client, &content, k).await,
    Command::Store { id, content, source, department } => {
      let metadata = (source.is_some() || department.is_some())
        .then(|| DemandMetadata { source, department, ..Default::default() });
      commands::store(client, &id, &content, metadata).await
    }
    Command::Stats => commands::stats(client).await,
    Command::Health => commands::health(client).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let client = TriageClient::with_config(ClientConfig { base_url: cli.server, timeout_secs: cli.timeout_secs })?;

  handle(&client, cli.command).await
}
