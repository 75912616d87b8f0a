//! Service settings, resolved from command-line flags and environment variables

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::llm::OllamaConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "triage_server")]
#[command(about = "Demand triage REST API server")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
pub struct Settings {
  /// Base URL of the Ollama-compatible model backend
  #[arg(long, env = "OLLAMA_BASE_URL", default_value = "http://localhost:11434")]
  pub ollama_base_url: String,

  /// Chat model used for classification and summaries
  #[arg(long, env = "MODEL_NAME", default_value = "qwen2.5:7b")]
  pub model_name: String,

  /// Model used to embed demand text
  #[arg(long, env = "EMBEDDING_MODEL", default_value = "qwen2.5:7b")]
  pub embedding_model: String,

  /// Directory holding the vector index (defaults to ~/.triage/vector_db)
  #[arg(long, env = "VECTOR_PERSIST_DIR")]
  pub persist_dir: Option<PathBuf>,

  /// Name of the demand collection inside the vector index
  #[arg(long, env = "COLLECTION_NAME", default_value = "demands")]
  pub collection_name: String,

  /// Log filter level (error, warn, info, debug, trace)
  #[arg(long, env = "LOG_LEVEL", default_value = "info")]
  pub log_level: String,

  /// Server bind address
  #[arg(long, env = "TRIAGE_BIND", default_value = "0.0.0.0:9000")]
  pub bind: SocketAddr,

  /// Timeout for each model backend request, in seconds
  #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 120)]
  pub request_timeout_secs: u64,

  /// Enable verbose logging, including storage engine internals
  #[arg(short, long)]
  pub verbose: bool,
}

impl Settings {
  /// Directory of the vector index, falling back to the home directory
  pub fn persist_dir(&self) -> PathBuf {
    self.persist_dir.clone().unwrap_or_else(default_persist_dir)
  }

  pub fn ollama(&self) -> OllamaConfig {
    OllamaConfig { base_url: self.ollama_base_url.clone(), timeout_secs: self.request_timeout_secs }
  }

  /// Tracing filter directive for the configured level
  pub fn log_filter(&self) -> String {
    let level = self.log_level.to_lowercase();
    if self.verbose {
      // Keep the storage engine below our own output even when verbose
      format!("{level},lance=warn,lance_datafusion=warn,datafusion=warn")
    } else {
      format!("triage={level},tower_http={level},lance=error,lance_datafusion=error,datafusion=error,warn")
    }
  }
}

fn default_persist_dir() -> PathBuf {
  dirs::home_dir()
    .unwrap_or_else(|| std::path::Path::new("/tmp").to_path_buf())
    .join(".triage")
    .join("vector_db")
}
