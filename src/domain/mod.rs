//! Domain models: filters, tabs, theme and the dashboard payload
//!
//! Independent of the terminal frontend and of the HTTP client.

pub mod data;
pub mod filters;
pub mod tabs;
pub mod theme;

pub use data::{DashboardData, DashboardState, DataPoint, FetchError, RequestToken};
pub use filters::{DashboardQuery, DisplayType, FilterError, FilterState, FilterStore, ViewType};
pub use tabs::{ModuleId, ModuleInfo, Route, TabDescriptor, TabRegistry, TabStatus};
pub use theme::{EnvSchemeProbe, MemoryPreferences, PreferenceStore, SchemeProbe, ThemeStore};
