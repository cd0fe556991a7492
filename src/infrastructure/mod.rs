//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - reqwest-based client for the KPI backend REST API
//! - Tokio runtime bridge for async operations

pub mod api;
pub mod runtime;

pub use api::{ApiConfig, DashboardApi, HttpDashboardApi};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
