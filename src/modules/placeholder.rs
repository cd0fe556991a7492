//! "Coming soon" pages for the tabs that are still in development

use crossterm::event::KeyEvent;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, Context, Module};
use crate::domain::ModuleId;

pub const IN_DEVELOPMENT: &str = "Ce module est actuellement en développement.";

/// Static content of a placeholder page
#[derive(Debug, Clone, Copy)]
pub struct Preview {
    pub heading: &'static str,
    pub features: &'static [&'static str],
    pub availability: &'static str,
    pub contact: &'static str,
}

pub const TICKETS: Preview = Preview {
    heading: "Module Tickets Landesk",
    features: &[
        "Intégration avec Landesk pour la récupération des tickets",
        "Visualisation des tickets par statut, priorité et catégorie",
        "Suivi des SLA et des temps de résolution",
        "Tableau de bord des performances par technicien",
        "Rapports personnalisables et exportables",
    ],
    availability: "T2 2024",
    contact: "Pour plus d'informations sur ce module, veuillez contacter l'équipe de développement.",
};

pub const INCIDENTS: Preview = Preview {
    heading: "Module Incidents Sécurité",
    features: &[
        "Suivi des incidents de sécurité en temps réel",
        "Classification par type, gravité et source",
        "Flux de travail pour la gestion des incidents",
        "Tableau de bord des tendances et des menaces",
        "Intégration avec le SIEM et les outils de détection",
        "Rapports de conformité et d'audit",
    ],
    availability: "T3 2024",
    contact: "Pour plus d'informations sur ce module, veuillez contacter l'équipe SOC.",
};

pub struct ComingSoon {
    id: ModuleId,
    preview: Preview,
}

impl ComingSoon {
    pub fn new(id: ModuleId, preview: Preview) -> Self {
        Self { id, preview }
    }

    pub fn tickets() -> Self {
        Self::new(ModuleId::Tickets, TICKETS)
    }

    pub fn incidents() -> Self {
        Self::new(ModuleId::Incidents, INCIDENTS)
    }
}

impl Module for ComingSoon {
    fn id(&self) -> ModuleId {
        self.id
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut Context) -> Action {
        Action::None
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let palette = &ctx.palette;
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let header = Paragraph::new(vec![
            Line::from(Span::styled("⚠", Style::default().fg(palette.warning))),
            Line::from(Span::styled(
                self.preview.heading,
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                IN_DEVELOPMENT,
                Style::default().fg(palette.text_muted),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, chunks[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        let heading = Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD);
        let body = Style::default().fg(palette.text_muted);

        let mut features = vec![Line::from(Span::styled("Fonctionnalités prévues :", heading))];
        features.extend(
            self.preview
                .features
                .iter()
                .map(|feature| Line::from(Span::styled(format!("• {feature}"), body))),
        );
        frame.render_widget(
            Paragraph::new(features)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(palette.border))),
            columns[0],
        );

        let details = vec![
            Line::from(Span::styled("Date de disponibilité estimée :", heading)),
            Line::from(Span::styled(self.preview.availability, body)),
            Line::from(""),
            Line::from(Span::styled("Contact :", heading)),
            Line::from(Span::styled(self.preview.contact, body)),
        ];
        frame.render_widget(
            Paragraph::new(details)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(palette.border))),
            columns[1],
        );
    }
}
