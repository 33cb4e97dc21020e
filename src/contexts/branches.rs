//! Refs: local branches, remotes and their branches, tags

use crate::context::{
    pick, window_of, BaseContext, Clickable, ContextKey, Effect, HookContext, ListContext,
    RenderScope, RendersToMain, Row,
};
use crate::git::{loaders, show};
use crate::model::{ListItem, Model};
use crate::presentation;
use anyhow::Result;

/// Commits shown under a branch in the main view
const LOG_PREVIEW: usize = 100;

fn render_log(ctx: &mut HookContext<'_>, rev: &str) -> Result<()> {
    let repo = ctx.git.repo()?;
    let commits = loaders::load_sub_commits(&repo, rev, LOG_PREVIEW)?;
    ctx.main.set_content("Log", &show::log_text(&commits));
    Ok(())
}

pub struct LocalBranchesContext {
    base: BaseContext,
}

impl LocalBranchesContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::side(
                ContextKey::LOCAL_BRANCHES,
                "branches",
                "branches",
                "Local Branches",
            ),
        }
    }

    fn selected_name(&self, model: &Model) -> Option<String> {
        model
            .branches
            .get(self.base.panel.selected())
            .map(|b| b.name.clone())
    }
}

impl Default for LocalBranchesContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for LocalBranchesContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.branches.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.branches, start, length)
            .iter()
            .map(presentation::branch_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.branches, self.panel_state())
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        Some(self)
    }
}

impl RendersToMain for LocalBranchesContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(name) = self.selected_name(ctx.model) else {
            ctx.main.set_content("", "No branches");
            return Ok(());
        };
        // an unborn branch has nothing to log yet
        if ctx.model.head_commit().is_none() {
            ctx.main.set_content("Log", "");
            return Ok(());
        }
        render_log(ctx, &name)
    }
}

impl Clickable for LocalBranchesContext {
    /// Open the branch's history in the sub-commits panel
    fn on_click_selected_item(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(name) = self.selected_name(ctx.model) else {
            return Ok(());
        };
        let repo = ctx.git.repo()?;
        let commits = loaders::load_sub_commits(&repo, &name, ctx.model.commit_limit)?;

        ctx.model.sub_commits = commits;
        ctx.model.sub_commits_ref = Some(name);
        ctx.model.bump_generation();
        ctx.push(Effect::Focus(ContextKey::SUB_COMMITS));
        Ok(())
    }
}

pub struct RemotesContext {
    base: BaseContext,
}

impl RemotesContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::side(ContextKey::REMOTES, "branches", "branches", "Remotes"),
        }
    }
}

impl Default for RemotesContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for RemotesContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.remotes.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.remotes, start, length)
            .iter()
            .map(presentation::remote_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.remotes, self.panel_state())
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        Some(self)
    }
}

impl RendersToMain for RemotesContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(remote) = ctx.model.remotes.get(self.base.panel.selected()) else {
            ctx.main.set_content("", "No remotes");
            return Ok(());
        };

        let mut text = format!("{}\n", remote.name);
        for url in &remote.urls {
            text.push_str(&format!("  {}\n", url));
        }
        text.push_str(&format!("\n{} branches", remote.branches.len()));
        ctx.main.set_content("Remote", &text);
        Ok(())
    }
}

impl Clickable for RemotesContext {
    /// Drill into the remote's branches
    fn on_click_selected_item(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(remote) = ctx.model.remotes.get(self.base.panel.selected()) else {
            return Ok(());
        };
        let (name, branches) = (remote.name.clone(), remote.branches.clone());

        ctx.model.remote_branches = branches;
        ctx.model.remote_branches_remote = Some(name);
        ctx.model.bump_generation();
        ctx.push(Effect::Focus(ContextKey::REMOTE_BRANCHES));
        Ok(())
    }
}

pub struct RemoteBranchesContext {
    base: BaseContext,
}

impl RemoteBranchesContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::side(
                ContextKey::REMOTE_BRANCHES,
                "branches",
                "branches",
                "Remote Branches",
            ),
        }
    }
}

impl Default for RemoteBranchesContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for RemoteBranchesContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.remote_branches.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.remote_branches, start, length)
            .iter()
            .map(presentation::remote_branch_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.remote_branches, self.panel_state())
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }
}

impl RendersToMain for RemoteBranchesContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(rev) = self.selected_item(ctx.model).map(|b| b.id().to_string()) else {
            ctx.main.set_content("", "No branches");
            return Ok(());
        };
        render_log(ctx, &rev)
    }
}

pub struct TagsContext {
    base: BaseContext,
}

impl TagsContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::side(ContextKey::TAGS, "branches", "branches", "Tags"),
        }
    }
}

impl Default for TagsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for TagsContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.tags.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.tags, start, length)
            .iter()
            .map(presentation::tag_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.tags, self.panel_state())
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }
}

impl RendersToMain for TagsContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(name) = self.selected_item(ctx.model).map(|t| t.id().to_string()) else {
            ctx.main.set_content("", "No tags");
            return Ok(());
        };
        let repo = ctx.git.repo()?;
        let text = show::tag_show(&repo, &name)?;
        ctx.main.set_content("Tag", &text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScreenMode;
    use crate::model::{Branch, Remote, RemoteBranch};
    use crate::presentation::row_text;

    #[test]
    fn branch_rows_respect_window() {
        let model = Model {
            branches: vec![
                Branch {
                    name: "main".into(),
                    is_head: true,
                    ..Default::default()
                },
                Branch {
                    name: "topic".into(),
                    ..Default::default()
                },
            ],
            ..Model::default()
        };
        let ctx = LocalBranchesContext::new();
        let scope = RenderScope {
            model: &model,
            screen_mode: ScreenMode::Normal,
            current: ContextKey::LOCAL_BRANCHES,
        };
        let rows = ctx.display_rows(&scope, 1, 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(row_text(&rows[0]), "  topic");
    }

    #[test]
    fn remote_branch_ids_are_qualified() {
        let model = Model {
            remote_branches: vec![RemoteBranch::new("origin", "main")],
            remotes: vec![Remote {
                name: "origin".into(),
                ..Default::default()
            }],
            ..Model::default()
        };
        let ctx = RemoteBranchesContext::new();
        assert_eq!(ctx.selected_item(&model).map(|b| b.id()), Some("origin/main"));
    }
}
