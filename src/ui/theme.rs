//! Colour palettes for the dark and light themes

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub dark: bool,

    // Base
    pub background: Color,
    pub surface: Color,

    // Text hierarchy
    pub text: Color,
    pub text_muted: Color,

    // Semantic
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn dark() -> Self {
        Self {
            dark: true,
            background: Color::Rgb(17, 24, 39),
            surface: Color::Rgb(31, 41, 55),
            text: Color::Rgb(229, 231, 235),
            text_muted: Color::Rgb(156, 163, 175),
            accent: Color::Rgb(96, 165, 250),
            positive: Color::Rgb(72, 187, 120),
            negative: Color::Rgb(245, 101, 101),
            warning: Color::Rgb(246, 173, 85),
            border: Color::Rgb(75, 85, 99),
            border_focused: Color::Rgb(96, 165, 250),
        }
    }

    pub fn light() -> Self {
        Self {
            dark: false,
            background: Color::Rgb(243, 244, 246),
            surface: Color::Rgb(255, 255, 255),
            text: Color::Rgb(31, 41, 55),
            text_muted: Color::Rgb(107, 114, 128),
            accent: Color::Rgb(59, 130, 246),
            positive: Color::Rgb(22, 163, 74),
            negative: Color::Rgb(220, 38, 38),
            warning: Color::Rgb(217, 119, 6),
            border: Color::Rgb(209, 213, 219),
            border_focused: Color::Rgb(59, 130, 246),
        }
    }
}

/// Parse `#RRGGBB` / `#RGB` into an RGB colour
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#4299E1"), Some(Color::Rgb(0x42, 0x99, 0xE1)));
        assert_eq!(parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("4299E1"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#é1"), None);
    }

    #[test]
    fn test_palette_for_mode() {
        assert!(Palette::for_mode(true).dark);
        assert!(!Palette::for_mode(false).dark);
    }
}
