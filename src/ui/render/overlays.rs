use crate::app::popup::Popup;
use crate::app::Gui;
use crate::context::ContextKey;
use crate::ui::helpers::centered_box;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const MENU_MAX_ROWS: u16 = 20;
const SUGGESTION_ROWS: u16 = 8;

pub(super) fn render_popups(frame: &mut Frame, area: Rect, gui: &mut Gui) {
    if gui.focus().stack().contains(&ContextKey::MENU) {
        render_menu(frame, area, gui);
    }

    let Some(popup) = gui.popup().cloned() else {
        return;
    };
    let input_area = match &popup {
        Popup::CommitMessage { input } | Popup::Prompt { input, .. } => {
            let height = input.lines().len() as u16 + 2;
            let rect = centered_box(60, height, area);
            let lines: Vec<Line> = input
                .lines()
                .iter()
                .map(|l| Line::from(Span::styled(l.clone(), Theme::text())))
                .collect();
            render_box(frame, rect, popup.title(), Paragraph::new(lines));

            // cursor sits after the last character typed
            let last = input.lines().last().map(String::as_str).unwrap_or("");
            let x = rect.x + 1 + unicode_width::UnicodeWidthStr::width(last) as u16;
            let y = rect.y + input.lines().len() as u16;
            frame.set_cursor_position(Position::new(x.min(rect.right().saturating_sub(2)), y));
            rect
        }
        Popup::Confirm { body, .. } => {
            let rect = centered_box(50, 5, area);
            let paragraph = Paragraph::new(Span::styled(body.clone(), Theme::text()))
                .wrap(Wrap { trim: true });
            render_box(frame, rect, popup.title(), paragraph);
            rect
        }
    };

    if gui.focus().stack().contains(&ContextKey::SUGGESTIONS) {
        render_suggestions(frame, input_area, gui);
    }
}

fn render_box(frame: &mut Frame, rect: Rect, title: &str, paragraph: Paragraph) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border_active())
        .title(Span::styled(format!(" {} ", title), Theme::title()));
    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph.block(block), rect);
}

fn render_menu(frame: &mut Frame, area: Rect, gui: &mut Gui) {
    let count = gui.model().menu_items.len() as u16;
    let rect = centered_box(50, count.min(MENU_MAX_ROWS) + 2, area);
    let lines = list_lines(gui, ContextKey::MENU, rect.height.saturating_sub(2));
    render_box(frame, rect, "Keybindings", Paragraph::new(lines));
}

/// Suggestions hang below the prompt they complete
fn render_suggestions(frame: &mut Frame, prompt: Rect, gui: &mut Gui) {
    let count = gui.model().suggestions.len() as u16;
    if count == 0 {
        return;
    }
    let height = (count.min(SUGGESTION_ROWS) + 2).min(frame.area().bottom().saturating_sub(prompt.bottom()));
    if height < 3 {
        return;
    }
    let rect = Rect {
        y: prompt.bottom(),
        height,
        ..prompt
    };
    let lines = list_lines(gui, ContextKey::SUGGESTIONS, height - 2);
    render_box(frame, rect, "Suggestions", Paragraph::new(lines));
}

fn list_lines(gui: &mut Gui, key: ContextKey, height: u16) -> Vec<Line<'static>> {
    let selected = gui
        .registry()
        .get(key)
        .map(|c| c.panel_state().selected())
        .unwrap_or(0);
    let (window, rows) = gui.visible_rows(key, height as usize);
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let line = Line::from(row);
            if window.start + i == selected {
                line.style(Theme::selected_row())
            } else {
                line
            }
        })
        .collect()
}
