//! REST API module for the demand triage service
//!
//! Uses axum for routing and schemars for OpenAPI documentation generation.

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod state;
pub mod types;
