//! Rendering. Pure functions from state to frames; no state mutation.

pub mod detail;
pub mod list;
pub mod markdown;
pub mod theme;
pub mod upload;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{App, Screen};
use self::theme::Theme;

/// Draw the active screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = Theme::default_dark();
    match app.screen {
        Screen::List => list::draw(frame, app, &theme),
        Screen::Detail => {
            if let Some(screen) = &app.detail {
                detail::draw(frame, screen, &theme);
            }
        }
    }
}

/// Centered popup rectangle taking the given percentages of `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
