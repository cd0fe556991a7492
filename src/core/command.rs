//! Command parser for the : command system

use super::ExportFormat;
use crate::domain::{DisplayType, ViewType};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Navigation
    Go(String),

    // Filters
    View(ViewType),
    Display(DisplayType),
    Week(u8),
    Month(u8),
    Year(i32),

    // Application
    Theme,
    SetTheme(bool),
    Refresh,
    Export(ExportFormat),
    Modules,
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim().to_string());
    let unknown = || Command::Unknown(input.to_string());

    match cmd.to_lowercase().as_str() {
        "go" | "open" | "cd" => Command::Go(args.unwrap_or_else(|| "/".to_string())),
        "dashboard" | "tickets" | "incidents" => Command::Go(format!("/{}", cmd.to_lowercase())),

        "view" | "vue" => args
            .as_deref()
            .and_then(ViewType::parse)
            .map(Command::View)
            .unwrap_or_else(unknown),
        "display" | "affichage" => args
            .as_deref()
            .and_then(DisplayType::parse)
            .map(Command::Display)
            .unwrap_or_else(unknown),
        "week" | "semaine" => args
            .and_then(|s| s.parse().ok())
            .map(Command::Week)
            .unwrap_or_else(unknown),
        "month" | "mois" => args
            .and_then(|s| s.parse().ok())
            .map(Command::Month)
            .unwrap_or_else(unknown),
        "year" | "annee" | "année" => args
            .and_then(|s| s.parse().ok())
            .map(Command::Year)
            .unwrap_or_else(unknown),

        "theme" => match args.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("") | Some("toggle") => Command::Theme,
            Some("dark") | Some("sombre") => Command::SetTheme(true),
            Some("light") | Some("clair") => Command::SetTheme(false),
            Some(_) => unknown(),
        },
        "dark" | "sombre" => Command::SetTheme(true),
        "light" | "clair" => Command::SetTheme(false),
        "refresh" | "reload" => Command::Refresh,
        "export" => match args.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("") | Some("all") => Command::Export(ExportFormat::Both),
            Some("csv") => Command::Export(ExportFormat::Csv),
            Some("json") => Command::Export(ExportFormat::Json),
            Some(_) => unknown(),
        },
        "modules" | "mods" => Command::Modules,
        "help" | "h" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        _ => unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation_commands() {
        assert_eq!(parse_command("go /tickets/sub"), Command::Go("/tickets/sub".to_string()));
        assert_eq!(parse_command("go"), Command::Go("/".to_string()));
        assert_eq!(parse_command("Incidents"), Command::Go("/incidents".to_string()));
    }

    #[test]
    fn test_parse_filter_commands() {
        assert_eq!(parse_command("view weekly"), Command::View(ViewType::Weekly));
        assert_eq!(parse_command("display moyenne"), Command::Display(DisplayType::Average));
        assert_eq!(parse_command("week 3"), Command::Week(3));
        assert_eq!(parse_command("mois 12"), Command::Month(12));
        assert_eq!(parse_command("year 2023"), Command::Year(2023));
    }

    #[test]
    fn test_parse_app_commands() {
        assert_eq!(parse_command("theme"), Command::Theme);
        assert_eq!(parse_command("dark"), Command::SetTheme(true));
        assert_eq!(parse_command("Light"), Command::SetTheme(false));
        assert_eq!(parse_command("theme sombre"), Command::SetTheme(true));
        assert_eq!(parse_command("theme blue"), Command::Unknown("theme blue".to_string()));
        assert_eq!(parse_command("export"), Command::Export(ExportFormat::Both));
        assert_eq!(parse_command("export CSV"), Command::Export(ExportFormat::Csv));
        assert_eq!(parse_command("modules"), Command::Modules);
        assert_eq!(parse_command("q"), Command::Quit);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
        assert_eq!(parse_command("view daily"), Command::Unknown("view daily".to_string()));
        assert_eq!(parse_command("week x"), Command::Unknown("week x".to_string()));
        assert_eq!(parse_command("export xml"), Command::Unknown("export xml".to_string()));
    }
}
