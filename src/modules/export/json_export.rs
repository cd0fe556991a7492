//! JSON Export
//!
//! Writes the active filters together with the full payload.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::domain::{DashboardData, DashboardQuery};

#[derive(Serialize)]
struct ExportableDashboard<'a> {
    exported_at: String,
    title: &'a str,
    filters: &'a DashboardQuery,
    data: &'a DashboardData,
}

/// Write the payload as pretty JSON, returns the number of chart points
pub fn write_dashboard(
    path: &Path,
    title: &str,
    query: &DashboardQuery,
    data: &DashboardData,
) -> Result<usize, Box<dyn std::error::Error>> {
    let exportable = ExportableDashboard {
        exported_at: Local::now().to_rfc3339(),
        title,
        filters: query,
        data,
    };

    let json = serde_json::to_string_pretty(&exportable)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(data.personnel_data.len() + data.tech_data.len() + data.time_data.len())
}
