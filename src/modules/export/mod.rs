//! Export Module
//!
//! Writes the dashboard payload currently on screen to disk.
//!
//! - 'e' key or `:export` writes both formats
//! - `:export csv` / `:export json` writes one
//! - Files saved to `<data dir>/exports/dashboard-<timestamp>.<ext>`

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::{Action, Context, ExportFormat, NotifyLevel};

/// Resolve the export directory, creating it if needed
fn ensure_export_dir(dir: Option<PathBuf>) -> std::io::Result<PathBuf> {
    let export_dir = dir.unwrap_or_else(|| PathBuf::from(".secdash").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export the current payload into the configured exports directory
pub fn export_dashboard(ctx: &Context, format: ExportFormat) -> Action {
    export_dashboard_to(ctx, format, crate::config::exports_dir())
}

/// Export the current payload into `dir` (defaults to `./.secdash/exports`)
pub fn export_dashboard_to(ctx: &Context, format: ExportFormat, dir: Option<PathBuf>) -> Action {
    let Some(data) = ctx.dashboard.data().filter(|data| !data.is_empty()) else {
        return Action::Notify("Aucune donnée à exporter".to_string(), NotifyLevel::Warn);
    };

    let export_dir = match ensure_export_dir(dir) {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Impossible de créer le dossier d'export: {}", e),
                NotifyLevel::Error,
            )
        }
    };

    let mut written = Vec::new();
    if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
        let path = export_dir.join(generate_filename("dashboard", "csv"));
        if let Err(e) = csv_export::write_dashboard(&path, data) {
            return export_failed(&path, e);
        }
        written.push(path);
    }
    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let path = export_dir.join(generate_filename("dashboard", "json"));
        let title = ctx.filters.dynamic_title();
        if let Err(e) = json_export::write_dashboard(&path, &title, &ctx.filters.query(), data) {
            return export_failed(&path, e);
        }
        written.push(path);
    }

    let names: Vec<String> = written
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    tracing::info!(dir = %export_dir.display(), files = ?names, "dashboard exported");
    Action::Notify(
        format!("Exporté vers {}: {}", export_dir.display(), names.join(", ")),
        NotifyLevel::Info,
    )
}

fn export_failed(path: &Path, err: Box<dyn std::error::Error>) -> Action {
    tracing::warn!(path = %path.display(), error = %err, "export failed");
    Action::Notify(format!("Échec de l'export: {}", err), NotifyLevel::Error)
}
