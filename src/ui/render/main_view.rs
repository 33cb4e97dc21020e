use crate::app::Gui;
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Patch text, logs and detail views rendered by the focused context
pub(super) fn render_main_view(frame: &mut Frame, area: Rect, gui: &Gui) {
    let main = gui.main_view();
    let height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = main
        .lines()
        .iter()
        .skip(main.origin())
        .take(height)
        .map(|line| Line::from(Span::styled(line.clone(), Theme::diff_line(line))))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(format!(" {} ", main.title()), Theme::title()));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
