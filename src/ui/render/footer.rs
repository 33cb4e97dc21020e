use crate::app::{Action, Gui};
use crate::ui::theme::Theme;
use crate::util::fit_width;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Hints shown on the right when they apply to the focused context
const HINTED: [Action; 7] = [
    Action::ToggleStaged,
    Action::Commit,
    Action::AmendToCommit,
    Action::CheckoutBranch,
    Action::NewBranch,
    Action::OpenMenu,
    Action::Quit,
];

pub(super) fn render_footer(frame: &mut Frame, area: Rect, gui: &Gui) {
    let mut spans = vec![Span::raw(" ")];

    let views = gui.views();
    let room = (area.width as usize).saturating_sub(1);
    if let Some(error) = &views.error {
        spans.push(Span::styled(fit_width(error, room), Theme::error()));
    } else if let Some(status) = &views.status {
        spans.push(Span::styled(fit_width(status, room), Theme::staged()));
    } else {
        let branch = gui.model().head_branch.as_deref().unwrap_or("(detached)");
        spans.push(Span::styled(branch.to_string(), Theme::text_muted()));
    }

    let mut hints = Vec::new();
    let current = gui.current_context();
    for action in HINTED {
        if let Some(binding) = gui.keybindings.binding_for(current, action) {
            hints.push(Span::styled(format!(" {} ", binding.label()), Theme::key()));
            hints.push(Span::styled(
                format!("{} ", action.label().to_lowercase()),
                Theme::text_muted(),
            ));
        }
    }

    let width = |s: &[Span]| s.iter().map(|s| s.content.width()).sum::<usize>();
    let spacer_len = (area.width as usize).saturating_sub(width(&spans) + width(&hints));
    if spacer_len > 0 {
        spans.push(Span::styled(" ".repeat(spacer_len), Style::default()));
        spans.extend(hints);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
