use anyhow::{anyhow, Result};
use colored::*;

use crate::cli::client::TriageClient;
use crate::cli::display::{format_classification, format_match};
use crate::model::DemandMetadata;
use crate::server::types::VectorDbStats;

pub async fn classify(client: &TriageClient, content: &str) -> Result<()> {
  let response = client.classify(content).await?;

  match response.data {
    Some(result) if response.success => {
      println!("{}", format_classification(&result));
      Ok(())
    }
    _ => {
      let error = response.error.unwrap_or_else(|| "unknown error".to_string());
      eprintln!("{} {}", "✗".red(), error);
      if let Some(raw) = response.raw {
        eprintln!("{}\n{}", "Model output:".dimmed(), raw);
      }
      Err(anyhow!("Classification failed"))
    }
  }
}

pub async fn summarize(client: &TriageClient, content: &str) -> Result<()> {
  let response = client.summarize(content).await?;
  match response.summary {
    Some(summary) => {
      println!("{summary}");
      Ok(())
    }
    None => Err(anyhow!(response.error.unwrap_or_else(|| "Summary failed".to_string()))),
  }
}

pub async fn find_similar(client: &TriageClient, content: &str, k: usize) -> Result<()> {
  let response = client.find_similar(content, k).await?;

  if response.similar_demands.is_empty() {
    println!("No similar demands found.");
    return Ok(());
  }

  for (rank, similar) in response.similar_demands.iter().enumerate() {
    println!("{}", format_match(rank + 1, similar));
  }
  Ok(())
}

pub async fn store(
  client: &TriageClient,
  demand_id: &str,
  content: &str,
  metadata: Option<DemandMetadata>,
) -> Result<()> {
  let response = client.store(demand_id, content, metadata).await?;
  println!("{} {}", "✓".green(), response.message);
  Ok(())
}

pub async fn stats(client: &TriageClient) -> Result<()> {
  let response = client.stats().await?;

  println!("{} {}", "model:".dimmed(), response.model.cyan());
  match response.vector_db {
    Some(VectorDbStats::Available(stats)) => {
      println!("{} {}", "collection:".dimmed(), stats.collection_name.yellow());
      println!("{} {}", "documents:".dimmed(), stats.total_documents);
    }
    Some(VectorDbStats::Unavailable { error }) => {
      println!("{} {}", "vector index unavailable:".red(), error);
    }
    None => println!("{}", "vector index not initialized".dimmed()),
  }
  Ok(())
}

pub async fn health(client: &TriageClient) -> Result<()> {
  let response = client.health().await?;
  println!("{} {} is {} at {}", "✓".green(), response.service, response.status, client.base_url());
  Ok(())
}
