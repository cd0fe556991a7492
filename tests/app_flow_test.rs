//! App flows without the terminal: tabs, filters, commands and theme persistence

use secdash::app::{App, StatusLevel};
use secdash::domain::{
    DisplayType, FilterState, FilterStore, MemoryPreferences, Route, ThemeStore, ViewType,
};
use secdash::infrastructure::runtime::RuntimeCommand;
use secdash::store::SettingsStore;

fn app_with(theme: ThemeStore) -> App {
    App::new(theme, FilterStore::new(FilterState::for_month(6, 2025)))
}

fn app() -> App {
    app_with(ThemeStore::load(Box::new(MemoryPreferences::default()), None))
}

fn run(app: &mut App, command: &str) {
    app.enter_command();
    app.command.input = command.to_string();
    app.apply_command();
}

fn fetch_queries(app: &mut App) -> Vec<(u64, i32, u8, &'static str)> {
    app.sync_fetch();
    app.take_pending_commands()
        .into_iter()
        .filter_map(|cmd| match cmd {
            RuntimeCommand::FetchDashboard { token, query } => {
                Some((token, query.year, query.week, query.view_type))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_tab_navigation() {
    let mut app = app();
    assert_eq!(app.active_tab(), "dashboard");

    run(&mut app, "go /tickets/sub/path");
    assert_eq!(app.active_tab(), "tickets");
    assert!(matches!(app.route(), Route::Module(_)));

    run(&mut app, "go /");
    assert_eq!(app.location, "/dashboard");

    run(&mut app, "go /unknown");
    assert_eq!(app.route(), Route::NotFound);
    assert!(app.current_module().is_none());

    app.select_tab(2);
    assert_eq!(app.active_tab(), "incidents");
}

#[test]
fn test_filter_commands_drive_requests() {
    let mut app = app();
    assert_eq!(fetch_queries(&mut app), vec![(1, 2025, 1, "monthly")]);

    run(&mut app, "view weekly");
    run(&mut app, "week 3");
    run(&mut app, "year 2024");
    // Several changes between two frames collapse into one request
    assert_eq!(fetch_queries(&mut app), vec![(2, 2024, 3, "weekly")]);

    let state = app.ctx.filters.state();
    assert_eq!(state.view, ViewType::Weekly);
    assert_eq!(
        app.ctx.filters.dynamic_title(),
        "Dashboard KPI Sécurité - Total - Semaine 3 de Juin 2024"
    );

    run(&mut app, "display average");
    assert_eq!(app.ctx.filters.state().display_type, DisplayType::Average);
    assert!(app.ctx.filters.dynamic_title().contains("Moyenne"));
}

#[test]
fn test_invalid_commands_warn() {
    let mut app = app();
    fetch_queries(&mut app);

    run(&mut app, "week 9");
    assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
    run(&mut app, "frobnicate");
    assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));

    assert!(fetch_queries(&mut app).is_empty());
}

#[test]
fn test_refresh_reissues_request() {
    let mut app = app();
    fetch_queries(&mut app);
    run(&mut app, "refresh");
    assert_eq!(fetch_queries(&mut app), vec![(2, 2025, 1, "monthly")]);
}

#[test]
fn test_theme_choice_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("settings.sqlite3");

    // System prefers dark and nothing saved yet
    let mut first = app_with(ThemeStore::load(
        Box::new(SettingsStore::open(&db).unwrap()),
        Some(true),
    ));
    assert!(first.theme.dark_mode());
    run(&mut first, "theme");
    assert!(!first.theme.dark_mode());
    drop(first);

    let store = SettingsStore::open(&db).unwrap();
    assert_eq!(store.get_value("theme").unwrap().as_deref(), Some("light"));

    let second = app_with(ThemeStore::load(Box::new(store), Some(true)));
    assert!(!second.theme.dark_mode());
    assert!(!second.ctx.palette.dark);
}
