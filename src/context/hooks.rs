//! What a lifecycle hook is allowed to touch

use crate::app::actions::Action;
use crate::context::ContextKey;
use crate::git::GitCommands;
use crate::model::Model;

/// Follow-up work a hook asks for.
///
/// Applied by the dispatcher after the hook has returned, so a hook that
/// moves focus never runs inside another context's hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Focus(ContextKey),
    Pop,
    Run(Action),
    SetPromptText(String),
    Refresh,
}

/// The secondary content area on the right of the screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainView {
    title: String,
    lines: Vec<String>,
    origin: usize,
}

impl MainView {
    pub fn set_content(&mut self, title: impl Into<String>, content: &str) {
        self.title = title.into();
        self.lines = content.lines().map(str::to_string).collect();
        self.origin = 0;
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.lines.clear();
        self.origin = 0;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn scroll(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.origin = if delta < 0 {
            self.origin.saturating_sub(delta.unsigned_abs())
        } else {
            self.origin.saturating_add(delta.unsigned_abs()).min(max)
        };
    }
}

/// Borrowed access handed to `on_focus`, `render_to_main` and
/// `on_click_selected_item`.
pub struct HookContext<'a> {
    pub model: &'a mut Model,
    pub main: &'a mut MainView,
    pub git: &'a GitCommands,
    effects: &'a mut Vec<Effect>,
}

impl<'a> HookContext<'a> {
    pub fn new(
        model: &'a mut Model,
        main: &'a mut MainView,
        git: &'a GitCommands,
        effects: &'a mut Vec<Effect>,
    ) -> Self {
        Self {
            model,
            main,
            git,
            effects,
        }
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_content_splits_lines_and_resets_scroll() {
        let mut main = MainView::default();
        main.set_content("Patch", "a\nb\nc");
        main.scroll(2);
        assert_eq!(main.origin(), 2);

        main.set_content("Log", "first line\n\nthird line");
        assert_eq!(main.origin(), 0);
        assert_eq!(main.lines().len(), 3);
        assert_eq!(main.content(), "first line\n\nthird line");
        assert_eq!(main.title(), "Log");
    }

    #[test]
    fn scroll_stays_inside_content() {
        let mut main = MainView::default();
        main.set_content("", "a\nb");
        main.scroll(10);
        assert_eq!(main.origin(), 1);
        main.scroll(-10);
        assert_eq!(main.origin(), 0);
    }
}
