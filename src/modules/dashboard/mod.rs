//! Dashboard module - filters, KPI charts and the summary table

pub mod charts;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, Context, ExportFormat, Module};
use crate::domain::filters::month_name;
use crate::domain::{DashboardData, ModuleId, ViewType};
use crate::ui::theme::Palette;

const LOADING: &str = "Chargement des données...";
const NO_DATA_HINT: &str = "Aucune donnée disponible. Veuillez ajuster les filtres et réessayer.";

#[derive(Debug, Default)]
pub struct Dashboard;

impl Dashboard {
    pub fn new() -> Self {
        Self
    }
}

impl Module for Dashboard {
    fn id(&self) -> ModuleId {
        ModuleId::Dashboard
    }

    fn on_mount(&mut self, _ctx: &mut Context) -> Action {
        Action::Refresh
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        let filters = &mut ctx.filters;
        match key.code {
            KeyCode::Char('v') => filters.cycle_view(),
            KeyCode::Char('d') => filters.toggle_display_type(),
            KeyCode::Char('w') => filters.step_week(true),
            KeyCode::Char('W') => filters.step_week(false),
            KeyCode::Char('m') => filters.step_month(true),
            KeyCode::Char('M') => filters.step_month(false),
            KeyCode::Char('y') => filters.step_year(true),
            KeyCode::Char('Y') => filters.step_year(false),
            KeyCode::Char('r') => return Action::Refresh,
            KeyCode::Char('e') => return Action::Export(ExportFormat::Both),
            _ => {}
        }
        Action::None
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        render_filter_panel(frame, chunks[0], ctx);

        let body = chunks[1];
        let palette = &ctx.palette;
        if ctx.dashboard.is_loading() {
            render_notice(frame, body, LOADING, palette.accent, palette);
            return;
        }
        if let Some(error) = ctx.dashboard.error() {
            render_error(frame, body, error, palette);
            return;
        }
        match ctx.dashboard.data() {
            Some(data) if !data.is_empty() => render_data(frame, body, ctx, data),
            _ => render_notice(frame, body, NO_DATA_HINT, palette.warning, palette),
        }
    }
}

/// Current selections plus the keys that change them
fn filter_spans(ctx: &Context) -> Vec<Span<'static>> {
    let state = ctx.filters.state();
    let palette = &ctx.palette;
    let label = Style::default().fg(palette.text_muted);
    let value = Style::default()
        .fg(palette.text)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled("Vue [v] ", label),
        Span::styled(state.view.label(), value),
        Span::styled("   Affichage [d] ", label),
        Span::styled(state.display_type.label(), value),
    ];
    if state.view == ViewType::Weekly {
        spans.push(Span::styled("   Semaine [w/W] ", label));
        spans.push(Span::styled(format!("Semaine {}", state.selected_week), value));
    }
    if state.view != ViewType::Yearly {
        spans.push(Span::styled("   Mois [m/M] ", label));
        spans.push(Span::styled(
            month_name(state.selected_month).unwrap_or("?"),
            value,
        ));
    }
    spans.push(Span::styled("   Année [y/Y] ", label));
    spans.push(Span::styled(state.selected_year.to_string(), value));
    spans
}

fn render_filter_panel(frame: &mut Frame, area: Rect, ctx: &Context) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Filtres")
        .border_style(Style::default().fg(ctx.palette.border));
    frame.render_widget(
        Paragraph::new(Line::from(filter_spans(ctx))).block(block),
        area,
    );
}

fn render_notice(
    frame: &mut Frame,
    area: Rect,
    text: &str,
    color: ratatui::style::Color,
    palette: &Palette,
) {
    let paragraph = Paragraph::new(Span::styled(text.to_string(), Style::default().fg(color)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );
    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, area: Rect, error: &str, palette: &Palette) {
    let style = Style::default().fg(palette.negative);
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled("Erreur! ", style.add_modifier(Modifier::BOLD)),
        Span::styled(error.to_string(), style),
    ]))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style),
    );
    frame.render_widget(paragraph, area);
}

fn render_data(frame: &mut Frame, area: Rect, ctx: &Context, data: &DashboardData) {
    let palette = &ctx.palette;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Min(8),
            Constraint::Min(8),
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        ctx.filters.dynamic_title(),
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, rows[0]);

    charts::personnel_cards(frame, rows[1], &data.personnel_data, palette);

    let halves = |area: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    };
    let top = halves(rows[2]);
    let bottom = halves(rows[3]);

    charts::tickets_by_technology(frame, top[0], &data.tech_data, palette);
    charts::incidents_by_person(frame, top[1], &data.personnel_data, palette);
    charts::processing_time(frame, bottom[0], &data.time_data, palette);
    charts::summary_table(frame, bottom[1], &data.summary_data, &data.trends, palette);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayType, FetchError, FilterState, FilterStore};
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn key(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
    }

    fn context() -> Context {
        Context::new(FilterStore::new(FilterState::for_month(3, 2025)))
    }

    fn screen(ctx: &Context) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|f| Dashboard::new().render(f, f.size(), ctx))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_mount_requests_fetch() {
        let mut ctx = context();
        assert_eq!(Dashboard::new().on_mount(&mut ctx), Action::Refresh);
    }

    #[test]
    fn test_filter_keys_bump_revision() {
        let mut dashboard = Dashboard::new();
        let mut ctx = context();

        assert_eq!(dashboard.handle_key(key('d'), &mut ctx), Action::None);
        assert_eq!(ctx.filters.state().display_type, DisplayType::Average);
        assert_eq!(ctx.filters.revision(), 1);

        dashboard.handle_key(key('M'), &mut ctx);
        assert_eq!(ctx.filters.state().selected_month, 2);

        dashboard.handle_key(key('y'), &mut ctx);
        assert_eq!(ctx.filters.state().selected_year, 2026);
        assert_eq!(ctx.filters.revision(), 3);
    }

    #[test]
    fn test_refresh_and_export_keys() {
        let mut dashboard = Dashboard::new();
        let mut ctx = context();
        assert_eq!(dashboard.handle_key(key('r'), &mut ctx), Action::Refresh);
        assert_eq!(
            dashboard.handle_key(key('e'), &mut ctx),
            Action::Export(ExportFormat::Both)
        );
        assert_eq!(ctx.filters.revision(), 0);
    }

    #[test]
    fn test_render_states() {
        let mut ctx = context();
        let token = ctx.dashboard.begin();
        assert!(screen(&ctx).contains(LOADING));

        ctx.dashboard.complete(
            token,
            Err(FetchError::Request {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            }),
        );
        assert!(screen(&ctx).contains("Erreur 500: Internal Server Error"));

        let token = ctx.dashboard.begin();
        ctx.dashboard.complete(token, Ok(DashboardData::default()));
        assert!(screen(&ctx).contains("Aucune donnée disponible"));
    }

    #[test]
    fn test_render_title_with_data() {
        let mut ctx = context();
        let data: DashboardData = serde_json::from_str(
            r##"{"tech_data": [{"name": "Firewall", "value": 31, "color": "#4299E1"}]}"##,
        )
        .unwrap();
        let token = ctx.dashboard.begin();
        ctx.dashboard.complete(token, Ok(data));

        let text = screen(&ctx);
        assert!(text.contains("Dashboard KPI Sécurité - Total - Mars 2025"));
        assert!(text.contains("Firewall"));
    }
}
