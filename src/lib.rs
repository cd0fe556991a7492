//! secdash: terminal dashboard for security-operations KPIs
//!
//! The binary in `main.rs` owns the terminal; everything else lives here so
//! integration tests can drive the application state directly.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod store;
pub mod ui;
