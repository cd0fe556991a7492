//! Header tab bar

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Tabs as RataTabs};
use ratatui::Frame;

use crate::app::App;
use crate::domain::TabStatus;

pub const DEV_BADGE: &str = "En développement";

/// Draw the enabled tabs with their shortcut and status badge
pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let palette = &app.ctx.palette;
    let enabled = app.tabs.enabled_tabs();

    let titles: Vec<Line> = enabled
        .iter()
        .enumerate()
        .map(|(idx, tab)| {
            let mut spans = vec![
                Span::styled(
                    format!("{}:", idx + 1),
                    Style::default().fg(palette.text_muted),
                ),
                Span::raw(tab.title),
            ];
            if tab.status == TabStatus::Dev {
                spans.push(Span::styled(
                    format!(" [{DEV_BADGE}]"),
                    Style::default().fg(palette.warning),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let active = app.active_tab();
    let selected = enabled.iter().position(|tab| tab.id == active);

    let mut tabs = RataTabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(Span::styled(
                    " Dashboard KPI Sécurité ",
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .style(Style::default().fg(palette.text))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" │ ");
    // No highlight on the 404 view
    if let Some(selected) = selected {
        tabs = tabs.select(selected);
    } else {
        tabs = tabs.highlight_style(Style::default().fg(palette.text));
    }

    f.render_widget(tabs, area);
}
