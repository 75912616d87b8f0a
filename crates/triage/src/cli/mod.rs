//! Command-line client for a running triage server

pub mod client;
pub mod commands;
pub mod display;
