//! Intake pipeline: classification, summaries and similar-demand retrieval

pub mod classifier;
pub mod parser;
pub mod retriever;
pub mod summarizer;

pub use classifier::Classifier;
pub use retriever::{Retriever, DEFAULT_SIMILAR_LIMIT};
pub use summarizer::Summarizer;
