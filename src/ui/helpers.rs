//! Layout helpers

use crate::ui::theme::Theme;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};

/// Create a centered rect using up certain percentage of the available rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A `percent_x` wide box of exactly `height` rows (borders included),
/// centred in `r` and shrunk to fit
pub fn centered_box(percent_x: u16, height: u16, r: Rect) -> Rect {
    let width = r.width.saturating_mul(percent_x) / 100;
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Tab strip for a window title, the active tab highlighted
pub fn tab_title(tabs: &[&str], active: usize) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(Theme::TAB_SEPARATOR, Theme::tab()));
        }
        let style = if i == active {
            Theme::title()
        } else {
            Theme::tab()
        };
        spans.push(Span::styled(tab.to_string(), style));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let parent = Rect::new(0, 0, 100, 100);
        let centered = centered_rect(50, 50, parent);
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < 100);
        assert!(centered.height < 100);
    }

    #[test]
    fn centered_box_fits_small_areas() {
        let r = centered_box(50, 10, Rect::new(0, 0, 80, 4));
        assert_eq!(r.height, 4);
        assert_eq!(r.width, 40);
        assert_eq!(r.x, 20);
        assert_eq!(r.y, 0);
    }

    #[test]
    fn tab_title_marks_active() {
        let line = tab_title(&["Local Branches", "Remotes", "Tags"], 1);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " Local Branches - Remotes - Tags ");
        assert_eq!(line.spans[3].style, Theme::title());
    }
}
