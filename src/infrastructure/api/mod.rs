//! KPI backend REST API

mod client;

pub use client::{normalize_base_url, ApiConfig, DashboardApi, HttpDashboardApi, DEFAULT_API_URL};
