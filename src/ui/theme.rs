//! Color palette for the terminal UI.

use ratatui::style::Color;

/// Palette used across all screens. The orange accent matches the
/// product branding.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub dim: Color,
    pub user_accent: Color,
    pub assistant_accent: Color,
    pub theme_tag: Color,
    pub success: Color,
    pub danger: Color,
    pub border: Color,
    pub border_active: Color,
    pub code: Color,
}

impl Theme {
    pub fn default_dark() -> Self {
        Self {
            accent: Color::Rgb(255, 107, 53),
            text: Color::Gray,
            muted: Color::DarkGray,
            dim: Color::Rgb(100, 100, 100),
            user_accent: Color::Blue,
            assistant_accent: Color::Cyan,
            theme_tag: Color::Rgb(129, 140, 248),
            success: Color::Green,
            danger: Color::Red,
            border: Color::DarkGray,
            border_active: Color::Rgb(255, 107, 53),
            code: Color::Yellow,
        }
    }
}
