//! Actions that modules can return to communicate with the app

/// Actions returned by modules to communicate state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Navigate to a location path (e.g. `/tickets/open`)
    Navigate(String),

    /// Re-issue the dashboard request with the current filters
    Refresh,

    /// Flip dark/light theme
    ToggleTheme,

    /// Switch to the dark (true) or light theme
    SetTheme(bool),

    /// Export the current payload
    Export(ExportFormat),

    /// Fetch the backend module list
    FetchModules,

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Open the key binding overlay
    OpenHelp,

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Both,
}
