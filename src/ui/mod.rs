use chrono::{Datelike, Local};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod tabs;
pub mod theme;

use crate::app::{App, InputMode, StatusLevel};

pub const SPLASH_TEXT: &str = "Chargement du tableau de bord...";

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    let palette = &app.ctx.palette;
    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        size,
    );

    if app.is_splash() {
        draw_splash(f, size, app);
        return;
    }

    let areas = layout::areas(size);

    tabs::draw_tab_bar(f, areas.header, app);
    match app.current_module() {
        Some(module) => module.render(f, areas.main, &app.ctx),
        None => draw_not_found(f, areas.main, app),
    }
    draw_footer(f, areas.footer, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_splash(f: &mut Frame, area: Rect, app: &App) {
    let palette = &app.ctx.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let lines = vec![
        Line::from(Span::styled(
            "◌",
            Style::default().fg(palette.accent),
        )),
        Line::from(Span::styled(
            SPLASH_TEXT,
            Style::default().fg(palette.text),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[1],
    );
}

fn draw_not_found(f: &mut Frame, area: Rect, app: &App) {
    let palette = &app.ctx.palette;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "404",
            Style::default()
                .fg(palette.negative)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Page non trouvée",
            Style::default().fg(palette.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} n'existe pas. Appuyez sur 1 pour revenir au Dashboard.", app.location),
            Style::default().fg(palette.text_muted),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let text = format!("© {} - Dashboard KPI Sécurité", Local::now().year());
    f.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default().fg(app.ctx.palette.text_muted),
        ))
        .alignment(Alignment::Center),
        area,
    );
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let palette = &app.ctx.palette;
    let muted = Style::default().fg(palette.text_muted);
    let theme = if app.theme.dark_mode() { "sombre" } else { "clair" };
    let fetch = if app.ctx.dashboard.is_loading() {
        "en cours"
    } else if app.ctx.dashboard.error().is_some() {
        "erreur"
    } else if app.ctx.dashboard.data().is_some() {
        "ok"
    } else {
        "--"
    };

    let line = Line::from(vec![
        Span::styled("API ", muted),
        Span::raw(format!("{}  ", app.ctx.api_endpoint)),
        Span::styled("Page ", muted),
        Span::raw(format!("{}  ", app.location)),
        Span::styled("Requête ", muted),
        Span::raw(format!("#{} {}  ", app.ctx.dashboard.latest_token(), fetch)),
        Span::styled("Thème ", muted),
        Span::raw(theme),
    ]);

    f.render_widget(
        Paragraph::new(line).style(Style::default().fg(palette.text)),
        area,
    );
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("go", "Aller à un chemin (/dashboard, /tickets, /incidents)"),
        ("view", "Vue: weekly | monthly | yearly"),
        ("display", "Affichage: total | average"),
        ("week", "Semaine 1-4"),
        ("month", "Mois 1-12"),
        ("year", "Année"),
        ("theme", "Thème: [dark | light], sans argument bascule"),
        ("refresh", "Recharger les données"),
        ("export", "Exporter: csv | json"),
        ("modules", "Lister les modules du serveur"),
        ("help", "Aide"),
        ("quit", "Quitter"),
    ];

    for (cmd, desc) in commands {
        if cmd.starts_with(&input) {
            return Some(desc);
        }
    }
    None
}

fn action_hints(app: &App) -> Line<'static> {
    let palette = &app.ctx.palette;
    let key = Style::default().fg(palette.accent);
    let muted = Style::default().fg(palette.text_muted);
    let mut spans = vec![
        Span::styled("1-3", key),
        Span::styled(" onglets  ", muted),
    ];
    if app.active_tab() == "dashboard" {
        spans.extend([
            Span::styled("v/d", key),
            Span::styled(" vue/affichage  ", muted),
            Span::styled("w m y", key),
            Span::styled(" période  ", muted),
            Span::styled("r", key),
            Span::styled(" recharger  ", muted),
            Span::styled("e", key),
            Span::styled(" exporter  ", muted),
        ]);
    }
    spans.extend([
        Span::styled("t", key),
        Span::styled(" thème  ", muted),
        Span::styled(":", key),
        Span::styled(" commande  ", muted),
        Span::styled("?", key),
        Span::styled(" aide  ", muted),
        Span::styled("q", key),
        Span::styled(" quitter", muted),
    ]);
    Line::from(spans)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let palette = &app.ctx.palette;
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command.input).unwrap_or("go view display week month year theme export");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(palette.warning)),
                Span::raw(app.command.input.clone()),
                Span::styled(format!("  {}", hint), Style::default().fg(palette.text_muted)),
            ])
        }
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => palette.positive,
                    StatusLevel::Warn => palette.warning,
                    StatusLevel::Error => palette.negative,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(palette.text_muted)),
                    Span::styled(text.to_string(), Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    f.render_widget(
        Paragraph::new(content).style(Style::default().fg(palette.text)),
        area,
    );
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = layout::centered_rect(70, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  1 / 2 / 3    Dashboard / Tickets / Incidents"),
        Line::from("  Tab / S-Tab  Onglet suivant / précédent"),
        Line::from("  :go <path>   Aller à un chemin"),
        Line::from(""),
        Line::from("Filtres (Dashboard)"),
        Line::from("  v            Vue hebdomadaire / mensuelle / annuelle"),
        Line::from("  d            Total / Moyenne"),
        Line::from("  w / W        Semaine suivante / précédente"),
        Line::from("  m / M        Mois suivant / précédent"),
        Line::from("  y / Y        Année suivante / précédente"),
        Line::from("  r            Recharger"),
        Line::from("  e            Exporter CSV + JSON"),
        Line::from(""),
        Line::from("Application"),
        Line::from("  t            Thème clair / sombre"),
        Line::from("  :            Barre de commande"),
        Line::from("  ?            Aide"),
        Line::from("  q            Quitter"),
        Line::from(""),
        Line::from(format!("Page active: {}", app.location)),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("Aide")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.ctx.palette.border_focused)),
        )
        .style(Style::default().bg(app.ctx.palette.surface).fg(app.ctx.palette.text))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FilterState, FilterStore, MemoryPreferences, ThemeStore};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn app() -> App {
        let theme = ThemeStore::load(Box::new(MemoryPreferences::default()), Some(true));
        App::new(theme, FilterStore::new(FilterState::for_month(3, 2025)))
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_command_hint() {
        assert_eq!(command_hint("exp"), Some("Exporter: csv | json"));
        assert_eq!(command_hint(""), None);
        assert_eq!(command_hint("zzz"), None);
    }

    #[test]
    fn test_splash_then_shell() {
        let mut app = app();
        app.start_splash(Duration::from_secs(60));
        assert!(render(&app).contains(SPLASH_TEXT));

        app.start_splash(Duration::ZERO);
        let text = render(&app);
        assert!(!text.contains(SPLASH_TEXT));
        assert!(text.contains("Ticket Landesk"));
        assert!(text.contains(tabs::DEV_BADGE));
        assert!(text.contains("Dashboard KPI Sécurité"));
    }

    #[test]
    fn test_not_found_view() {
        let mut app = app();
        app.navigate("/nowhere");
        let text = render(&app);
        assert!(text.contains("404"));
        assert!(text.contains("Page non trouvée"));
    }

    #[test]
    fn test_help_popup() {
        let mut app = app();
        app.help_open = true;
        assert!(render(&app).contains("Barre de commande"));
    }
}
