//! Shared context passed to modules

use crate::domain::{DashboardState, FilterStore};
use crate::ui::theme::Palette;

/// Application state handed explicitly to every module
#[derive(Debug, Clone)]
pub struct Context {
    /// Current query parameters
    pub filters: FilterStore,

    /// Payload, loading flag and error of the last dashboard request
    pub dashboard: DashboardState,

    /// Colours for the active theme
    pub palette: Palette,

    /// Backend endpoint display string
    pub api_endpoint: String,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            filters: FilterStore::default(),
            dashboard: DashboardState::default(),
            palette: Palette::light(),
            api_endpoint: String::new(),
        }
    }
}

impl Context {
    pub fn new(filters: FilterStore) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }
}
