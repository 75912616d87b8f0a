//! Demand Triage - intake pipeline for support-desk demands
//!
//! Classifies free-form demands into a fixed taxonomy, summarises them, and
//! stores them in a persistent vector index so similar past demands can be
//! found again.

pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod server;
