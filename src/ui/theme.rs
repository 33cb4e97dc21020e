//! Colours and glyphs shared by the panels and the main view

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // ─────────────────────────────────────────────────────────────────────
    // Palette
    // ─────────────────────────────────────────────────────────────────────

    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);
    pub const GREY_700: Color = Color::Rgb(35, 35, 35);

    /// Staged changes, additions, ahead counts
    pub const GREEN: Color = Color::Rgb(100, 200, 100);
    /// Unstaged changes, removals, errors
    pub const RED: Color = Color::Rgb(200, 100, 100);
    pub const YELLOW: Color = Color::Rgb(220, 200, 90);
    pub const CYAN: Color = Color::Rgb(90, 190, 210);
    pub const MAGENTA: Color = Color::Rgb(190, 120, 210);
    pub const BLUE: Color = Color::Rgb(110, 150, 230);

    // ─────────────────────────────────────────────────────────────────────
    // Styles
    // ─────────────────────────────────────────────────────────────────────

    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    /// Row under the cursor in the focused panel
    pub fn selected_row() -> Style {
        Style::default()
            .bg(Self::GREY_700)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    /// Border of the focused window
    pub fn border_active() -> Style {
        Style::default().fg(Self::GREEN).add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::WHITE).add_modifier(Modifier::BOLD)
    }

    /// Inactive tab label in a window title
    pub fn tab() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    pub fn key() -> Style {
        Style::default().fg(Self::BLUE).add_modifier(Modifier::BOLD)
    }

    pub fn staged() -> Style {
        Style::default().fg(Self::GREEN)
    }

    pub fn unstaged() -> Style {
        Style::default().fg(Self::RED)
    }

    pub fn sha() -> Style {
        Style::default().fg(Self::YELLOW)
    }

    /// Short sha of the commit under the cursor
    pub fn sha_selected() -> Style {
        Style::default()
            .fg(Self::GREY_700)
            .bg(Self::YELLOW)
            .add_modifier(Modifier::BOLD)
    }

    pub fn author() -> Style {
        Style::default().fg(Self::CYAN)
    }

    pub fn graph() -> Style {
        Style::default().fg(Self::MAGENTA)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED).add_modifier(Modifier::BOLD)
    }

    /// Style for one line of patch text in the main view
    pub fn diff_line(line: &str) -> Style {
        if line.starts_with("diff ") || line.starts_with("commit ") {
            Style::default().fg(Self::YELLOW).add_modifier(Modifier::BOLD)
        } else if line.starts_with("@@") {
            Style::default().fg(Self::CYAN)
        } else if line.starts_with("+++") || line.starts_with("---") {
            Self::text().add_modifier(Modifier::BOLD)
        } else if line.starts_with('+') || line.starts_with("++") {
            Style::default().fg(Self::GREEN)
        } else if line.starts_with('-') {
            Style::default().fg(Self::RED)
        } else {
            Self::text()
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Glyphs
    // ─────────────────────────────────────────────────────────────────────

    pub const GRAPH_COMMIT: char = '◯';
    pub const GRAPH_MERGE: char = '⏣';
    pub const HEAD_MARKER: char = '*';
    pub const ARROW_UP: char = '↑';
    pub const ARROW_DOWN: char = '↓';
    pub const TAB_SEPARATOR: &'static str = " - ";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_line_colours() {
        assert_eq!(Theme::diff_line("+added").fg, Some(Theme::GREEN));
        assert_eq!(Theme::diff_line("++both").fg, Some(Theme::GREEN));
        assert_eq!(Theme::diff_line("-gone").fg, Some(Theme::RED));
        assert_eq!(Theme::diff_line("@@ -1 +1 @@").fg, Some(Theme::CYAN));
        assert_eq!(Theme::diff_line("context").fg, Some(Theme::GREY_100));
    }
}
