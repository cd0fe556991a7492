//! Tab registry and path based tab resolution

use serde::Deserialize;

pub const DEFAULT_TAB: &str = "dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStatus {
    Active,
    /// Shown with an "En développement" badge
    Dev,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub status: TabStatus,
    pub enabled: bool,
}

/// Identifier of a module that has a registered view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleId {
    Dashboard,
    Tickets,
    Incidents,
}

impl ModuleId {
    pub const ALL: [ModuleId; 3] = [ModuleId::Dashboard, ModuleId::Tickets, ModuleId::Incidents];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "dashboard" => Some(ModuleId::Dashboard),
            "tickets" => Some(ModuleId::Tickets),
            "incidents" => Some(ModuleId::Incidents),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleId::Dashboard => "dashboard",
            ModuleId::Tickets => "tickets",
            ModuleId::Incidents => "incidents",
        }
    }
}

/// Fixed list of top-level tabs
#[derive(Debug, Clone)]
pub struct TabRegistry {
    tabs: Vec<TabDescriptor>,
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self {
            tabs: vec![
                TabDescriptor {
                    id: "dashboard",
                    title: "Dashboard",
                    status: TabStatus::Active,
                    enabled: true,
                },
                TabDescriptor {
                    id: "tickets",
                    title: "Ticket Landesk",
                    status: TabStatus::Dev,
                    enabled: true,
                },
                TabDescriptor {
                    id: "incidents",
                    title: "Incidents Sécurité",
                    status: TabStatus::Dev,
                    enabled: true,
                },
            ],
        }
    }
}

impl TabRegistry {
    pub fn all(&self) -> &[TabDescriptor] {
        &self.tabs
    }

    pub fn get(&self, id: &str) -> Option<&TabDescriptor> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn is_module_available(&self, id: &str) -> bool {
        self.get(id).is_some_and(|tab| tab.enabled)
    }

    pub fn enabled_tabs(&self) -> Vec<&TabDescriptor> {
        self.tabs.iter().filter(|tab| tab.enabled).collect()
    }

    /// Resolve a navigation path to the module that should render it
    pub fn resolve(&self, path: &str) -> Route {
        let id = active_tab_from_path(path);
        match ModuleId::from_id(id) {
            Some(module) if self.is_module_available(id) => Route::Module(module),
            _ => Route::NotFound,
        }
    }
}

/// Outcome of resolving a navigation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Module(ModuleId),
    NotFound,
}

/// First path segment, or [`DEFAULT_TAB`] when the path has none
pub fn active_tab_from_path(path: &str) -> &str {
    path.split('/')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_TAB)
}

/// Normalize user input into a location; `/` redirects to the default tab
pub fn normalize_path(input: &str) -> String {
    let trimmed = input.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        format!("/{DEFAULT_TAB}")
    } else {
        format!("/{trimmed}")
    }
}

/// Module description served by `GET /api/modules`
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl ModuleInfo {
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| format_module_title(&self.name))
    }
}

fn default_enabled() -> bool {
    true
}

/// `security-incidents` -> `Security Incidents`
pub fn format_module_title(id: &str) -> String {
    id.replace(['-', '_'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
