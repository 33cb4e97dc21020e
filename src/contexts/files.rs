//! Working tree files and submodules (both live in the files window)

use crate::context::{
    pick, window_of, BaseContext, Clickable, ContextKey, Focusable, HookContext, ListContext,
    RenderScope, RendersToMain, Row,
};
use crate::git::{loaders, show};
use crate::model::{File, ListItem, Model, Submodule};
use crate::presentation;
use anyhow::Result;

pub struct FilesContext {
    base: BaseContext,
}

impl FilesContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::side(ContextKey::FILES, "files", "files", "Files"),
        }
    }

    pub fn selected_file<'m>(&self, model: &'m Model) -> Option<&'m File> {
        model.files.get(self.base.panel.selected())
    }
}

impl Default for FilesContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for FilesContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.files.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.files, start, length)
            .iter()
            .map(presentation::file_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.files, self.panel_state())
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        Some(self)
    }
}

impl Focusable for FilesContext {
    /// Statuses go stale while the user is elsewhere; re-read them so the
    /// panel matches the disk. The model is only replaced on a real change.
    fn on_focus(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let repo = ctx.git.repo()?;
        let files = loaders::load_files(&repo)?;
        if files != ctx.model.files {
            tracing::debug!(files = files.len(), "file statuses changed");
            ctx.model.files = files;
            ctx.model.bump_generation();
        }
        Ok(())
    }
}

impl RendersToMain for FilesContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(file) = self.selected_file(ctx.model) else {
            ctx.main.set_content("", "No changed files");
            return Ok(());
        };

        let repo = ctx.git.repo()?;
        let text = show::file_diff(&repo, &file.name, file.tracked)?;
        let title = if file.has_unstaged_changes {
            "Unstaged changes"
        } else {
            "Staged changes"
        };
        ctx.main.set_content(title, &text);
        Ok(())
    }
}

impl Clickable for FilesContext {
    fn on_click_selected_item(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(file) = self.selected_file(ctx.model) else {
            return Ok(());
        };
        ctx.git.toggle_file(&file.name, file.has_unstaged_changes)?;
        ctx.push(crate::context::Effect::Refresh);
        Ok(())
    }
}

pub struct SubmodulesContext {
    base: BaseContext,
}

impl SubmodulesContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::side(ContextKey::SUBMODULES, "files", "files", "Submodules"),
        }
    }

    fn selected_submodule<'m>(&self, model: &'m Model) -> Option<&'m Submodule> {
        model.submodules.get(self.base.panel.selected())
    }
}

impl Default for SubmodulesContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for SubmodulesContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.submodules.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.submodules, start, length)
            .iter()
            .map(presentation::submodule_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.submodules, self.panel_state())
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }
}

impl RendersToMain for SubmodulesContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        match self.selected_submodule(ctx.model) {
            Some(sub) => {
                let text = format!(
                    "Name: {}\nPath: {}\nUrl:  {}",
                    sub.name, sub.path, sub.url
                );
                ctx.main.set_content("Submodule", &text);
            }
            None => ctx.main.set_content("", "No submodules"),
        }
        Ok(())
    }
}
