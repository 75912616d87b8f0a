//! Display formatting utilities for CLI output

use colored::*;

use crate::model::{ClassifyResult, SimilarityMatch, Urgency};

pub fn urgency_label(urgency: Urgency) -> ColoredString {
  match urgency {
    Urgency::Urgent => urgency.as_str().red().bold(),
    Urgency::Normal => urgency.as_str().yellow(),
    Urgency::Low => urgency.as_str().green(),
  }
}

pub fn format_classification(result: &ClassifyResult) -> String {
  format!(
    "{} {}\n{} {}\n{} {}\n{} {}",
    "type:".dimmed(),
    result.demand_type.as_str().cyan().bold(),
    "urgency:".dimmed(),
    urgency_label(result.urgency),
    "department:".dimmed(),
    result.department,
    "reason:".dimmed(),
    result.reason
  )
}

/// One line header plus the content preview
pub fn format_match(rank: usize, similar: &SimilarityMatch) -> String {
  let id = similar.demand_id.as_deref().unwrap_or("<unknown>");
  format!(
    "{}. {} {}\n   {}",
    rank,
    id.yellow().bold(),
    format!("(score {:.4})", similar.score).dimmed(),
    similar.content
  )
}
