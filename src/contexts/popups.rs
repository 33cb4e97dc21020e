//! List popups: the options menu and prompt suggestions

use crate::context::{
    pick, window_of, BaseContext, Clickable, ContextKey, ContextKind, Effect, HookContext,
    ListContext, RenderScope, Row,
};
use crate::model::{ListItem, Model};
use crate::presentation;
use anyhow::Result;

pub struct MenuContext {
    base: BaseContext,
}

impl MenuContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::new(
                ContextKey::MENU,
                "menu",
                None,
                ContextKind::PersistentPopup,
                "Menu",
            ),
        }
    }
}

impl Default for MenuContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for MenuContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.menu_items.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.menu_items, start, length)
            .iter()
            .map(presentation::menu_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.menu_items, self.panel_state())
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        Some(self)
    }
}

impl Clickable for MenuContext {
    /// Close the menu, then run the picked action from where it was opened
    fn on_click_selected_item(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(item) = ctx.model.menu_items.get(self.base.panel.selected()) else {
            return Ok(());
        };
        let action = item.action;
        ctx.push(Effect::Pop);
        ctx.push(Effect::Run(action));
        Ok(())
    }
}

pub struct SuggestionsContext {
    base: BaseContext,
}

impl SuggestionsContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::new(
                ContextKey::SUGGESTIONS,
                "suggestions",
                Some("suggestions"),
                ContextKind::PersistentPopup,
                "Suggestions",
            ),
        }
    }
}

impl Default for SuggestionsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for SuggestionsContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.suggestions.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.suggestions, start, length)
            .iter()
            .map(presentation::suggestion_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.suggestions, self.panel_state())
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        Some(self)
    }
}

impl Clickable for SuggestionsContext {
    fn on_click_selected_item(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        if let Some(value) = self.selected_item(ctx.model).map(|s| s.id().to_string()) {
            ctx.push(Effect::SetPromptText(value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::Action;
    use crate::git::GitCommands;
    use crate::context::MainView;
    use crate::model::MenuItem;

    #[test]
    fn menu_click_pops_then_runs() {
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        let git = GitCommands::open(dir.path()).unwrap();

        let mut model = Model {
            menu_items: vec![MenuItem {
                label: "Refresh".into(),
                key_hint: "R".into(),
                action: Action::Refresh,
            }],
            ..Model::default()
        };
        let mut main = MainView::default();
        let mut effects = Vec::new();

        let menu = MenuContext::new();
        let mut ctx = HookContext::new(&mut model, &mut main, &git, &mut effects);
        menu.on_click_selected_item(&mut ctx).unwrap();

        assert_eq!(effects, vec![Effect::Pop, Effect::Run(Action::Refresh)]);
    }

    #[test]
    fn menu_has_no_window_of_its_own() {
        let menu = MenuContext::new();
        assert_eq!(menu.window_name(), "menu");
        assert!(menu.kind().is_popup());
    }
}
