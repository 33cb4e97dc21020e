use crate::context::{
    pick, window_of, BaseContext, ContextKey, HookContext, ListContext, RenderScope,
    RendersToMain, Row,
};
use crate::git::show;
use crate::model::{ListItem, Model};
use crate::presentation;
use anyhow::Result;

pub struct StashContext {
    base: BaseContext,
}

impl StashContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::side(ContextKey::STASH, "stash", "stash", "Stash"),
        }
    }
}

impl Default for StashContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for StashContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.stash_entries.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.stash_entries, start, length)
            .iter()
            .map(presentation::stash_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.stash_entries, self.panel_state())
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }
}

impl RendersToMain for StashContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(stash_ref) = self.selected_item(ctx.model).map(|s| s.id().to_string()) else {
            ctx.main.set_content("", "No stash entries");
            return Ok(());
        };
        let repo = ctx.git.repo()?;
        let text = show::stash_show(&repo, &stash_ref)?;
        ctx.main.set_content("Stash", &text);
        Ok(())
    }
}
