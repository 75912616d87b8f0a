//! Demand Triage REST Server
//!
//! HTTP API for demand classification, summaries and similar-demand lookup.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use triage::config::Settings;
use triage::server::startup::start_server;

#[tokio::main]
async fn main() -> Result<()> {
  let settings = Settings::parse();

  let filter = EnvFilter::try_new(settings.log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Demand Triage REST Server v{}", env!("CARGO_PKG_VERSION"));
  tracing::info!("Binding to address: {}", settings.bind);

  start_server(settings).await
}
