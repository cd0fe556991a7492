//! Chart and table components for the dashboard tab
//!
//! Every function here renders one slice of the payload and nothing else.
//! An empty slice renders the neutral "Aucune donnée disponible" message.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;

use crate::domain::tabs::format_module_title;
use crate::domain::DataPoint;
use crate::ui::theme::{parse_hex_color, Palette};

pub const NO_DATA: &str = "Aucune donnée disponible";

/// Minutes to `"{h}h {mm}min"`
pub fn format_time(minutes: u64) -> String {
    format!("{}h {:02}min", minutes / 60, minutes % 60)
}

/// Integers without decimals, everything else with one
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// Trend percentage with its arrow: `▲ +12%` / `▼ -7%`
pub fn format_trend(value: f64) -> String {
    let pct = format_value(value.abs());
    if value < 0.0 {
        format!("▼ -{pct}%")
    } else {
        format!("▲ +{pct}%")
    }
}

fn point_style(point: &DataPoint, palette: &Palette) -> Style {
    Style::default().fg(parse_hex_color(&point.color).unwrap_or(palette.accent))
}

fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(palette.border))
}

fn render_empty(frame: &mut Frame, area: Rect, title: &str, palette: &Palette) {
    let paragraph = Paragraph::new(Span::styled(NO_DATA, Style::default().fg(palette.text_muted)))
        .block(panel(title, palette));
    frame.render_widget(paragraph, area);
}

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    points: &[DataPoint],
    palette: &Palette,
    text_value: impl Fn(f64) -> String,
) {
    if points.is_empty() {
        render_empty(frame, area, title, palette);
        return;
    }

    let bars: Vec<Bar> = points
        .iter()
        .map(|point| {
            let style = point_style(point, palette);
            Bar::default()
                .value(point.value.max(0.0).round() as u64)
                .text_value(text_value(point.value))
                .label(Line::from(point.name.clone()))
                .style(style)
                .value_style(style.add_modifier(Modifier::REVERSED))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let count = points.len() as u16;
    let bar_width = (inner_width / count.max(1)).saturating_sub(1).clamp(3, 12);

    let chart = BarChart::default()
        .block(panel(title, palette))
        .bar_width(bar_width)
        .bar_gap(1)
        .label_style(Style::default().fg(palette.text_muted))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

/// "Nombre de tickets par personne": one bordered card per person
pub fn personnel_cards(frame: &mut Frame, area: Rect, points: &[DataPoint], palette: &Palette) {
    const TITLE: &str = "Nombre de tickets par personne";
    if points.is_empty() {
        render_empty(frame, area, TITLE, palette);
        return;
    }

    let outer = panel(TITLE, palette);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let constraints = vec![Constraint::Ratio(1, points.len() as u32); points.len()];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (point, cell) in points.iter().zip(cells.iter()) {
        let style = point_style(point, palette);
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                point.name.clone(),
                Style::default().fg(palette.text_muted),
            )),
            Line::from(Span::styled(
                format_value(point.value),
                style.add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::TOP).border_style(style));
        frame.render_widget(card, *cell);
    }
}

pub fn tickets_by_technology(
    frame: &mut Frame,
    area: Rect,
    points: &[DataPoint],
    palette: &Palette,
) {
    render_bars(frame, area, "Tickets par technologie", points, palette, format_value);
}

pub fn incidents_by_person(frame: &mut Frame, area: Rect, points: &[DataPoint], palette: &Palette) {
    render_bars(frame, area, "Incidents SOC par personne", points, palette, format_value);
}

/// Bars labelled with `format_time`, values are minutes
pub fn processing_time(frame: &mut Frame, area: Rect, points: &[DataPoint], palette: &Palette) {
    render_bars(
        frame,
        area,
        "Temps de traitement par technologie",
        points,
        palette,
        |minutes| format_time(minutes.max(0.0) as u64),
    );
}

/// One line of the summary table
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
    /// Signed percentage from `trends`, when the backend sent one
    pub trend: Option<f64>,
}

fn summary_label(key: &str) -> String {
    match key {
        "total_tickets" => "Total des tickets".to_string(),
        "avg_processing_time" => "Temps moyen de traitement".to_string(),
        "critical_incidents" => "Incidents critiques".to_string(),
        "resolution_rate" => "Taux de résolution".to_string(),
        other => format_module_title(other),
    }
}

fn summary_value(key: &str, value: &serde_json::Value) -> String {
    match (key, value.as_f64()) {
        ("avg_processing_time", Some(minutes)) => format_time(minutes.max(0.0) as u64),
        ("resolution_rate", Some(rate)) => format!("{}%", format_value(rate)),
        (_, Some(number)) => format_value(number),
        _ => match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "-".to_string(),
            other => other.to_string(),
        },
    }
}

/// Flatten `summary_data` + `trends` into display rows, keeping backend key order
pub fn summary_rows(summary: &serde_json::Value, trends: &serde_json::Value) -> Vec<SummaryRow> {
    let Some(map) = summary.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| SummaryRow {
            label: summary_label(key),
            value: summary_value(key, value),
            trend: trends.get(key).and_then(serde_json::Value::as_f64),
        })
        .collect()
}

pub fn summary_table(
    frame: &mut Frame,
    area: Rect,
    summary: &serde_json::Value,
    trends: &serde_json::Value,
    palette: &Palette,
) {
    const TITLE: &str = "Tableau de synthèse";
    let rows = summary_rows(summary, trends);
    if rows.is_empty() {
        render_empty(frame, area, TITLE, palette);
        return;
    }

    let header = Row::new(vec!["Indicateur", "Valeur", "Tendance"]).style(
        Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::BOLD),
    );
    let body = rows.into_iter().map(|row| {
        let trend = match row.trend {
            Some(pct) => {
                let color = if pct < 0.0 { palette.negative } else { palette.positive };
                Span::styled(format_trend(pct), Style::default().fg(color))
            }
            None => Span::raw(""),
        };
        Row::new(vec![
            Line::from(row.label),
            Line::from(Span::styled(
                row.value,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(trend),
        ])
        .style(Style::default().fg(palette.text))
    });

    let table = Table::new(
        body,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(panel(TITLE, palette));
    frame.render_widget(table, area);
}
