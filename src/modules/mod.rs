//! UI Modules
//!
//! Each module implements the Module trait and handles its own:
//! - Key input processing
//! - Rendering
//!
//! Modules:
//! - dashboard: filters, KPI charts and summary table
//! - placeholder: "coming soon" pages for tickets and incidents
//! - export: CSV / JSON export of the current payload

pub mod dashboard;
pub mod export;
pub mod placeholder;

use crate::core::Module;
use crate::domain::ModuleId;

/// Static id -> module mapping
pub fn build(id: ModuleId) -> Box<dyn Module> {
    match id {
        ModuleId::Dashboard => Box::new(dashboard::Dashboard::new()),
        ModuleId::Tickets => Box::new(placeholder::ComingSoon::tickets()),
        ModuleId::Incidents => Box::new(placeholder::ComingSoon::incidents()),
    }
}

/// One instance per module, built once at startup
pub struct ModuleSet {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self {
            modules: ModuleId::ALL.iter().copied().map(build).collect(),
        }
    }

    pub fn get(&self, id: ModuleId) -> Option<&dyn Module> {
        self.modules
            .iter()
            .find(|module| module.id() == id)
            .map(|module| module.as_ref())
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Box<dyn Module>> {
        self.modules.iter_mut().find(|module| module.id() == id)
    }
}

impl Default for ModuleSet {
    fn default() -> Self {
        Self::new()
    }
}
