use crate::app::Gui;
use crate::context::ContextKey;
use crate::ui::helpers::tab_title;
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// One side window: whichever of its contexts is active, with its tabs
/// in the title
pub(super) fn render_window(frame: &mut Frame, area: Rect, gui: &mut Gui, window: &str) {
    let key = gui.focus().active_in_window(window);
    let focused = gui.focus().current_side() == key;
    let height = area.height.saturating_sub(2) as usize;
    if focused {
        gui.set_page_height(height);
    }

    let title = window_title(gui, window, key);
    let (count, selected) = gui
        .registry()
        .get(key)
        .map(|c| (c.item_count(gui.model()), c.panel_state().selected()))
        .unwrap_or_default();
    let (visible, rows) = gui.visible_rows(key, height);

    let lines: Vec<Line> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let line = Line::from(row);
            if focused && count > 0 && visible.start + i == selected {
                line.style(Theme::selected_row())
            } else {
                line
            }
        })
        .collect();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_active()
        } else {
            Theme::border()
        })
        .title(title);
    if focused && count > 0 {
        block = block.title_bottom(
            Line::styled(format!(" {} of {} ", selected + 1, count), Theme::text_muted())
                .right_aligned(),
        );
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Tabs for top-level contexts; a drilled-in context shows just its title
fn window_title(gui: &Gui, window: &str, active: ContextKey) -> Line<'static> {
    let tabs = gui.tabs(window);
    let titles: Vec<&str> = tabs
        .iter()
        .filter_map(|k| gui.registry().get(*k).map(|c| c.title()))
        .collect();

    match tabs.iter().position(|k| *k == active) {
        Some(index) => tab_title(&titles, index),
        None => {
            let title = gui.registry().get(active).map(|c| c.title()).unwrap_or("");
            tab_title(&[title], 0)
        }
    }
}
