use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use secdash::app::{App, InputMode, StatusLevel};
use secdash::config::{self, Config};
use secdash::domain::{
    EnvSchemeProbe, FilterStore, MemoryPreferences, PreferenceStore, SchemeProbe, ThemeStore,
};
use secdash::infrastructure::api::{normalize_base_url, HttpDashboardApi};
use secdash::infrastructure::runtime::{RuntimeBridge, RuntimeCommand};
use secdash::store::SettingsStore;
use secdash::ui;

#[derive(Debug, Parser)]
#[command(
    name = "secdash",
    version,
    about = "secdash: security-operations KPI dashboard for the terminal"
)]
struct Args {
    /// Backend base URL (e.g. http://localhost:5001)
    #[arg(long)]
    api: Option<String>,

    /// Config file (defaults to ~/.config/secdash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of the data directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Skip the loading screen
    #[arg(long)]
    no_splash: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = config::load(args.config.as_deref());
    if let Some(api) = args.api.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        config.api_url = normalize_base_url(api);
    }
    if let Some(path) = args.log_file.clone() {
        config.log_file = Some(path);
    }
    init_logging(&config);
    tracing::info!(api = %config.api_url, "starting secdash");

    let api_config = config.api();
    let api = HttpDashboardApi::new(&api_config).context("building HTTP client")?;

    let probe = EnvSchemeProbe;
    let (storage, storage_warning) = open_preferences();
    let theme = ThemeStore::load(storage, probe.prefers_dark());

    let mut app = App::new(theme, FilterStore::default());
    app.ctx.api_endpoint = api_config.display();
    if !args.no_splash {
        app.start_splash(config.startup_delay());
    }
    if let Some(warning) = storage_warning {
        app.set_status(warning, StatusLevel::Warn);
    }

    // Create the runtime bridge
    let runtime = RuntimeBridge::new(Arc::new(api), Box::new(probe))?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("{err:#}");
        eprintln!("{err:?}");
    }

    Ok(())
}

/// File logging; the terminal belongs to the UI. Logging stays off if the file cannot be opened.
fn init_logging(config: &Config) {
    let Some(path) = config.log_path() else {
        return;
    };
    let Ok(file) = open_log_file(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_env("SECDASH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// SQLite settings when available, in-memory otherwise
fn open_preferences() -> (Box<dyn PreferenceStore>, Option<String>) {
    let Some(db_path) = config::settings_db_path() else {
        return (
            Box::new(MemoryPreferences::default()),
            Some("Préférences non persistées: aucun dossier de données".to_string()),
        );
    };
    if let Some(parent) = db_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match SettingsStore::open(&db_path) {
        Ok(store) => (Box::new(store), None),
        Err(err) => {
            tracing::warn!(path = %db_path.display(), "settings store disabled: {err:#}");
            (
                Box::new(MemoryPreferences::default()),
                Some(format!("Préférences non persistées: {err}")),
            )
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        app.ingest_event(event);
    }

    // Hold requests back until the splash is gone
    if app.is_splash() {
        return;
    }
    app.sync_fetch();
    for cmd in app.take_pending_commands() {
        if let Err(err) = runtime.send(cmd) {
            app.set_status(err.to_string(), StatusLevel::Error);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    if app.is_splash() {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.enter_command(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char(ch @ '1'..='9') => app.select_tab(ch as usize - '1' as usize),
        KeyCode::Tab => app.cycle_tab(true),
        KeyCode::BackTab => app.cycle_tab(false),
        _ => app.handle_module_key(key),
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Up => {
            if let Some(last) = app.command.last.clone() {
                app.command.input = last;
            }
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}
