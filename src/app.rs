use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;

use crate::core::{parse_command, Action, Command, Context, ExportFormat, NotifyLevel};
use crate::domain::tabs::{active_tab_from_path, normalize_path};
use crate::domain::{FilterStore, ModuleId, Route, TabRegistry, ThemeStore};
use crate::infrastructure::runtime::{RuntimeCommand, RuntimeEvent};
use crate::modules::{self, ModuleSet};
use crate::ui::theme::Palette;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl From<NotifyLevel> for StatusLevel {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Info => StatusLevel::Info,
            NotifyLevel::Warn => StatusLevel::Warn,
            NotifyLevel::Error => StatusLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

pub struct App {
    pub ctx: Context,
    pub tabs: TabRegistry,
    /// Current navigation path, e.g. `/dashboard` or `/tickets/sub/path`
    pub location: String,
    pub theme: ThemeStore,
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    modules: ModuleSet,
    splash_until: Option<Instant>,
    /// Filter revision the last dashboard request was issued for
    fetched_revision: Option<u64>,
    pending: Vec<RuntimeCommand>,
}

impl App {
    pub fn new(theme: ThemeStore, filters: FilterStore) -> Self {
        let mut ctx = Context::new(filters);
        ctx.palette = Palette::for_mode(theme.dark_mode());

        let mut app = Self {
            ctx,
            tabs: TabRegistry::default(),
            location: String::new(),
            theme,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            status: None,
            help_open: false,
            should_quit: false,
            modules: ModuleSet::new(),
            splash_until: None,
            fetched_revision: None,
            pending: Vec::new(),
        };
        app.navigate("/");
        app
    }

    // ---- Navigation ----

    pub fn route(&self) -> Route {
        self.tabs.resolve(&self.location)
    }

    pub fn active_tab(&self) -> &str {
        active_tab_from_path(&self.location)
    }

    /// Move to `path`; `/` lands on the dashboard. Mounting a module runs its `on_mount`.
    pub fn navigate(&mut self, path: &str) {
        let location = normalize_path(path);
        tracing::info!(from = %self.location, to = %location, "navigate");
        self.location = location;

        if let Route::Module(id) = self.route() {
            let action = match self.modules.get_mut(id) {
                Some(module) => module.on_mount(&mut self.ctx),
                None => Action::None,
            };
            self.apply_action(action);
        }
    }

    /// Module rendered for the current location, if any
    pub fn current_module(&self) -> Option<&dyn crate::core::Module> {
        match self.route() {
            Route::Module(id) => self.modules.get(id),
            Route::NotFound => None,
        }
    }

    /// Jump to the n-th enabled tab (0-based)
    pub fn select_tab(&mut self, index: usize) {
        let target = self.tabs.enabled_tabs().get(index).map(|tab| tab.id);
        if let Some(id) = target {
            if self.active_tab() != id {
                self.navigate(&format!("/{id}"));
            }
        }
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        let ids: Vec<&'static str> = self.tabs.enabled_tabs().iter().map(|tab| tab.id).collect();
        if ids.is_empty() {
            return;
        }
        let current = ids.iter().position(|id| *id == self.active_tab());
        let next = match (current, forward) {
            (Some(idx), true) => (idx + 1) % ids.len(),
            (Some(idx), false) => (idx + ids.len() - 1) % ids.len(),
            (None, _) => 0,
        };
        self.navigate(&format!("/{}", ids[next]));
    }

    // ---- Splash / tick ----

    pub fn start_splash(&mut self, delay: Duration) {
        self.splash_until = (!delay.is_zero()).then(|| Instant::now() + delay);
    }

    pub fn is_splash(&self) -> bool {
        self.splash_until
            .map(|until| Instant::now() < until)
            .unwrap_or(false)
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
        if !self.is_splash() {
            self.splash_until = None;
        }
    }

    // ---- Status line ----

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    // ---- Keys ----

    /// Forward a key to the module behind the current route
    pub fn handle_module_key(&mut self, key: KeyEvent) {
        let Route::Module(id) = self.route() else {
            return;
        };
        let action = match self.modules.get_mut(id) {
            Some(module) => module.handle_key(key, &mut self.ctx),
            None => Action::None,
        };
        self.apply_action(action);
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(!self.theme.dark_mode());
    }

    pub fn set_theme(&mut self, dark: bool) {
        if let Err(err) = self.theme.set(dark) {
            tracing::warn!("theme not persisted: {err:#}");
            self.set_status(format!("Thème non enregistré: {err}"), StatusLevel::Warn);
        }
        self.ctx.palette = Palette::for_mode(self.theme.dark_mode());
    }

    // ---- Command bar ----

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }

        let cmd = parse_command(&input);
        let action = self.execute_command(&cmd);
        self.apply_action(action);
        self.command.last = Some(input);
        self.exit_command();
    }

    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        let filters = &mut self.ctx.filters;
        let result = match cmd {
            Command::Go(path) => return Action::Navigate(path.clone()),
            Command::View(view) => {
                filters.set_view(*view);
                Ok(())
            }
            Command::Display(display_type) => {
                filters.set_display_type(*display_type);
                Ok(())
            }
            Command::Week(week) => filters.set_week(*week),
            Command::Month(month) => filters.set_month(*month),
            Command::Year(year) => {
                filters.set_year(*year);
                Ok(())
            }
            Command::Theme => return Action::ToggleTheme,
            Command::SetTheme(dark) => return Action::SetTheme(*dark),
            Command::Refresh => return Action::Refresh,
            Command::Export(format) => return Action::Export(*format),
            Command::Modules => return Action::FetchModules,
            Command::Help => return Action::OpenHelp,
            Command::Quit => return Action::Quit,
            Command::Unknown(input) => {
                return Action::Notify(
                    format!("Commande inconnue: {input}"),
                    NotifyLevel::Warn,
                )
            }
        };

        match result {
            Ok(()) => Action::None,
            Err(err) => Action::Notify(err.to_string(), NotifyLevel::Warn),
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(path) => self.navigate(&path),
            Action::Refresh => self.fetched_revision = None,
            Action::ToggleTheme => self.toggle_theme(),
            Action::SetTheme(dark) => self.set_theme(dark),
            Action::Export(format) => {
                let action = self.export(format);
                self.apply_action(action);
            }
            Action::FetchModules => {
                self.pending.push(RuntimeCommand::FetchModules);
                self.set_status("Chargement des modules...", StatusLevel::Info);
            }
            Action::Notify(msg, level) => self.set_status(msg, level.into()),
            Action::OpenHelp => self.help_open = true,
            Action::Quit => self.should_quit = true,
        }
    }

    fn export(&self, format: ExportFormat) -> Action {
        if self.route() != Route::Module(ModuleId::Dashboard) {
            return Action::Notify(
                "Export disponible uniquement sur le Dashboard".to_string(),
                NotifyLevel::Warn,
            );
        }
        modules::export::export_dashboard(&self.ctx, format)
    }

    // ---- Dashboard fetch ----

    /// Issue a dashboard request when the dashboard is shown and the filters
    /// changed since the last one (or a refresh was requested).
    pub fn sync_fetch(&mut self) {
        if self.route() != Route::Module(ModuleId::Dashboard) {
            return;
        }
        let revision = self.ctx.filters.revision();
        if self.fetched_revision == Some(revision) {
            return;
        }
        let token = self.ctx.dashboard.begin();
        let query = self.ctx.filters.query();
        tracing::info!(token, revision, ?query, "dashboard fetch issued");
        self.pending
            .push(RuntimeCommand::FetchDashboard { token, query });
        self.fetched_revision = Some(revision);
    }

    pub fn take_pending_commands(&mut self) -> Vec<RuntimeCommand> {
        std::mem::take(&mut self.pending)
    }

    pub fn ingest_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::DashboardLoaded { token, result } => {
                if self.ctx.dashboard.complete(token, result) {
                    tracing::debug!(token, "dashboard data applied");
                }
            }
            RuntimeEvent::ModulesLoaded { result } => match result {
                Ok(modules) => {
                    let titles: Vec<String> = modules
                        .iter()
                        .filter(|module| module.enabled)
                        .map(|module| module.display_title())
                        .collect();
                    let text = if titles.is_empty() {
                        "Aucun module actif".to_string()
                    } else {
                        format!("Modules: {}", titles.join(", "))
                    };
                    self.set_status(text, StatusLevel::Info);
                }
                Err(err) => self.set_status(err.to_string(), StatusLevel::Error),
            },
            RuntimeEvent::SchemeChanged { prefers_dark } => {
                if self.theme.apply_system_preference(prefers_dark) {
                    self.ctx.palette = Palette::for_mode(self.theme.dark_mode());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DashboardData, FetchError, FilterState, MemoryPreferences, ModuleInfo};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App {
        let theme = ThemeStore::load(Box::new(MemoryPreferences::default()), None);
        App::new(theme, FilterStore::new(FilterState::for_month(3, 2025)))
    }

    fn fetch_tokens(app: &mut App) -> Vec<u64> {
        app.take_pending_commands()
            .into_iter()
            .filter_map(|cmd| match cmd {
                RuntimeCommand::FetchDashboard { token, .. } => Some(token),
                _ => None,
            })
            .collect()
    }

    fn press(app: &mut App, ch: char) {
        app.handle_module_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }

    #[test]
    fn test_root_redirects_to_dashboard() {
        let app = app();
        assert_eq!(app.location, "/dashboard");
        assert_eq!(app.active_tab(), "dashboard");
        assert_eq!(app.route(), Route::Module(ModuleId::Dashboard));
    }

    #[test]
    fn test_mount_fetches_once() {
        let mut app = app();
        app.sync_fetch();
        app.sync_fetch();
        assert_eq!(fetch_tokens(&mut app), vec![1]);
        assert!(app.ctx.dashboard.is_loading());
    }

    #[test]
    fn test_filter_change_refetches() {
        let mut app = app();
        app.sync_fetch();
        app.take_pending_commands();

        press(&mut app, 'v');
        app.sync_fetch();
        let tokens = fetch_tokens(&mut app);
        assert_eq!(tokens, vec![2]);

        press(&mut app, 'r');
        app.sync_fetch();
        assert_eq!(fetch_tokens(&mut app), vec![3]);
    }

    #[test]
    fn test_no_fetch_off_dashboard() {
        let mut app = app();
        app.navigate("/tickets/sub/path");
        assert_eq!(app.active_tab(), "tickets");
        app.sync_fetch();
        assert!(fetch_tokens(&mut app).is_empty());
    }

    #[test]
    fn test_remount_refetches() {
        let mut app = app();
        app.sync_fetch();
        app.take_pending_commands();

        app.select_tab(1);
        app.select_tab(0);
        app.sync_fetch();
        assert_eq!(fetch_tokens(&mut app), vec![2]);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let mut app = app();
        app.navigate("/reports");
        assert_eq!(app.route(), Route::NotFound);
        app.cycle_tab(true);
        assert_eq!(app.active_tab(), "dashboard");
    }

    #[test]
    fn test_cycle_tabs_wraps() {
        let mut app = app();
        app.cycle_tab(false);
        assert_eq!(app.active_tab(), "incidents");
        app.cycle_tab(true);
        assert_eq!(app.active_tab(), "dashboard");
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut app = app();
        app.sync_fetch();
        app.ctx.filters.set_year(2024);
        app.sync_fetch();
        let tokens = fetch_tokens(&mut app);
        assert_eq!(tokens, vec![1, 2]);

        app.ingest_event(RuntimeEvent::DashboardLoaded {
            token: 2,
            result: Ok(DashboardData::default()),
        });
        app.ingest_event(RuntimeEvent::DashboardLoaded {
            token: 1,
            result: Err(FetchError::Network("timeout".to_string())),
        });
        assert!(app.ctx.dashboard.error().is_none());
        assert!(app.ctx.dashboard.data().is_some());
        assert!(!app.ctx.dashboard.is_loading());
    }

    #[test]
    fn test_command_out_of_range_warns() {
        let mut app = app();
        app.enter_command();
        app.command.input = "month 13".to_string();
        app.apply_command();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.ctx.filters.state().selected_month, 3);
        assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
    }

    #[test]
    fn test_command_go_and_quit() {
        let mut app = app();
        app.command.input = "go /incidents".to_string();
        app.apply_command();
        assert_eq!(app.active_tab(), "incidents");
        assert_eq!(app.command.last.as_deref(), Some("go /incidents"));

        app.command.input = "quit".to_string();
        app.apply_command();
        assert!(app.should_quit);
    }

    #[test]
    fn test_theme_toggle_and_system_events() {
        let mut app = app();
        assert!(!app.ctx.palette.dark);

        app.ingest_event(RuntimeEvent::SchemeChanged { prefers_dark: true });
        assert!(app.ctx.palette.dark);

        app.toggle_theme();
        assert!(!app.ctx.palette.dark);
        app.ingest_event(RuntimeEvent::SchemeChanged { prefers_dark: true });
        assert!(!app.ctx.palette.dark);
    }

    #[test]
    fn test_dark_and_light_commands_select_theme() {
        let theme = ThemeStore::load(Box::new(MemoryPreferences::default()), Some(true));
        let mut app = App::new(theme, FilterStore::new(FilterState::for_month(3, 2025)));
        assert!(app.theme.dark_mode());

        for _ in 0..2 {
            app.command.input = "dark".to_string();
            app.apply_command();
            assert!(app.theme.dark_mode());
            assert!(app.ctx.palette.dark);
        }
        assert!(app.theme.has_explicit_choice());

        app.command.input = "light".to_string();
        app.apply_command();
        app.command.input = "light".to_string();
        app.apply_command();
        assert!(!app.theme.dark_mode());
        assert!(!app.ctx.palette.dark);

        app.command.input = "theme".to_string();
        app.apply_command();
        assert!(app.theme.dark_mode());
    }

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_and_stale_completions_not_logged_as_warnings() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut app = app();
        app.sync_fetch();
        let first = fetch_tokens(&mut app)[0];
        app.ctx.filters.set_year(2024);
        app.sync_fetch();
        let second = fetch_tokens(&mut app)[0];

        tracing::subscriber::with_default(subscriber, || {
            app.ingest_event(RuntimeEvent::DashboardLoaded {
                token: first,
                result: Err(FetchError::Network("connection refused".to_string())),
            });
            app.ingest_event(RuntimeEvent::DashboardLoaded {
                token: second,
                result: Err(FetchError::Network("connection refused".to_string())),
            });
        });

        assert_eq!(app.ctx.dashboard.error(), Some("connection refused"));
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.is_empty(), "{output}");
    }

    #[test]
    fn test_modules_command_round_trip() {
        let mut app = app();
        app.apply_action(Action::FetchModules);
        assert!(app
            .take_pending_commands()
            .iter()
            .any(|cmd| matches!(cmd, RuntimeCommand::FetchModules)));

        let modules: Vec<ModuleInfo> = serde_json::from_str(
            r#"[{"name": "dashboard", "title": "Dashboard"}, {"name": "security-incidents", "enabled": false}]"#,
        )
        .unwrap();
        app.ingest_event(RuntimeEvent::ModulesLoaded { result: Ok(modules) });
        assert_eq!(app.status_text().map(|(text, _)| text), Some("Modules: Dashboard"));
    }

    #[test]
    fn test_export_off_dashboard_warns() {
        let mut app = app();
        app.navigate("/tickets");
        app.apply_action(Action::Export(ExportFormat::Csv));
        assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
    }
}
