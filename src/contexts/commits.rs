//! Commit lists (branch history, reflog, sub-commits) and a commit's files

use crate::config::ShowGraph;
use crate::context::{
    pick, window_of, BaseContext, Clickable, ContextKey, Effect, Focusable, HookContext,
    ListContext, RenderScope, RendersToMain, Row,
};
use crate::git::{loaders, show};
use crate::model::{Commit, ListItem, Model};
use crate::presentation::{self, CommitColumns};
use crate::ui::theme::Theme;
use anyhow::Result;
use ratatui::text::Span;

/// Start paging in more history this many rows before the end
const LOAD_MORE_THRESHOLD: usize = 100;

/// Commit list settings fixed at startup
#[derive(Debug, Clone, Copy)]
pub struct CommitDisplay {
    pub show_graph: ShowGraph,
    pub parse_emoji: bool,
}

impl CommitDisplay {
    fn rows(
        self,
        commits: &[Commit],
        scope: &RenderScope<'_>,
        start: usize,
        length: usize,
        highlight: Option<usize>,
    ) -> Vec<Row> {
        let graph = self.show_graph.should_show(scope.screen_mode);
        let author = scope.screen_mode.is_maximised();
        let skipped = start.min(commits.len());

        window_of(commits, start, length)
            .iter()
            .enumerate()
            .map(|(i, commit)| {
                presentation::commit_row(
                    commit,
                    CommitColumns {
                        graph,
                        author,
                        parse_emoji: self.parse_emoji,
                        highlighted: highlight == Some(skipped + i),
                    },
                )
            })
            .collect()
    }
}

fn render_commit(ctx: &mut HookContext<'_>, sha: Option<String>) -> Result<()> {
    let Some(sha) = sha else {
        ctx.main.set_content("", "No commits");
        return Ok(());
    };
    let repo = ctx.git.repo()?;
    let text = show::commit_show(&repo, &sha)?;
    ctx.main.set_content("Patch", &text);
    Ok(())
}

/// The selected row, if this context is the one with focus
fn focused_highlight(context: &dyn ListContext, scope: &RenderScope<'_>) -> Option<usize> {
    (scope.current == context.key()).then(|| context.panel_state().selected())
}

pub struct BranchCommitsContext {
    base: BaseContext,
    display: CommitDisplay,
}

impl BranchCommitsContext {
    pub fn new(display: CommitDisplay) -> Self {
        Self {
            base: BaseContext::side(ContextKey::BRANCH_COMMITS, "commits", "commits", "Commits"),
            display,
        }
    }

    fn selected_sha(&self, model: &Model) -> Option<String> {
        model
            .commits
            .get(self.base.panel.selected())
            .map(|c| c.sha.clone())
    }
}

impl ListContext for BranchCommitsContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.commits.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        let highlight = focused_highlight(self, scope);
        self.display
            .rows(&scope.model.commits, scope, start, length, highlight)
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.commits, self.panel_state())
    }

    fn renders_selection(&self) -> bool {
        true
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

impl Focusable for BranchCommitsContext {
    fn on_focus(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let selected = self.base.panel.selected();
        if selected + LOAD_MORE_THRESHOLD >= ctx.model.commits.len() {
            ctx.git.load_more_commits(ctx.model)?;
        }
        Ok(())
    }
}

impl RendersToMain for BranchCommitsContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let sha = self.selected_sha(ctx.model);
        render_commit(ctx, sha)
    }
}

impl Clickable for BranchCommitsContext {
    /// Show the files the commit touched
    fn on_click_selected_item(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(sha) = self.selected_sha(ctx.model) else {
            return Ok(());
        };
        let repo = ctx.git.repo()?;
        let files = loaders::load_commit_files(&repo, &sha)?;

        ctx.model.commit_files = files;
        ctx.model.commit_files_ref = Some(sha);
        ctx.model.bump_generation();
        ctx.push(Effect::Focus(ContextKey::COMMIT_FILES));
        Ok(())
    }
}

pub struct ReflogCommitsContext {
    base: BaseContext,
    display: CommitDisplay,
}

impl ReflogCommitsContext {
    pub fn new(display: CommitDisplay) -> Self {
        Self {
            base: BaseContext::side(ContextKey::REFLOG_COMMITS, "commits", "commits", "Reflog"),
            display,
        }
    }
}

impl ListContext for ReflogCommitsContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.reflog_commits.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.reflog_commits, start, length)
            .iter()
            .map(|c| presentation::reflog_row(c, self.display.parse_emoji))
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.reflog_commits, self.panel_state())
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }
}

impl RendersToMain for ReflogCommitsContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let sha = self.selected_item(ctx.model).map(|c| c.id().to_string());
        render_commit(ctx, sha)
    }
}

/// History of whatever ref was entered from the branches window
pub struct SubCommitsContext {
    base: BaseContext,
    display: CommitDisplay,
}

impl SubCommitsContext {
    pub fn new(display: CommitDisplay) -> Self {
        Self {
            base: BaseContext::side(ContextKey::SUB_COMMITS, "branches", "branches", "Commits"),
            display,
        }
    }
}

impl ListContext for SubCommitsContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.sub_commits.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        let highlight = focused_highlight(self, scope);
        self.display
            .rows(&scope.model.sub_commits, scope, start, length, highlight)
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.sub_commits, self.panel_state())
    }

    fn renders_selection(&self) -> bool {
        true
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }
}

impl RendersToMain for SubCommitsContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let sha = self.selected_item(ctx.model).map(|c| c.id().to_string());
        render_commit(ctx, sha)
    }
}

pub struct CommitFilesContext {
    base: BaseContext,
}

impl CommitFilesContext {
    pub fn new() -> Self {
        Self {
            base: BaseContext::side(
                ContextKey::COMMIT_FILES,
                "commitFiles",
                "commits",
                "Commit Files",
            ),
        }
    }
}

impl Default for CommitFilesContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListContext for CommitFilesContext {
    base_accessors!();

    fn item_count(&self, model: &Model) -> usize {
        model.commit_files.len()
    }

    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row> {
        window_of(&scope.model.commit_files, start, length)
            .iter()
            .map(presentation::commit_file_row)
            .collect()
    }

    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem> {
        pick(&model.commit_files, self.panel_state())
    }

    fn empty_placeholder(&self) -> Option<Row> {
        Some(vec![Span::styled("(none)", Theme::unstaged())])
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        Some(self)
    }
}

impl Focusable for CommitFilesContext {
    /// Nothing to show without a commit; otherwise make sure the files
    /// belong to it (a reload may have dropped them).
    fn on_focus(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let Some(sha) = ctx.model.commit_files_ref.clone() else {
            ctx.push(Effect::Focus(ContextKey::BRANCH_COMMITS));
            return Ok(());
        };
        if ctx.model.commit_files.is_empty() {
            let repo = ctx.git.repo()?;
            ctx.model.commit_files = loaders::load_commit_files(&repo, &sha)?;
            if !ctx.model.commit_files.is_empty() {
                ctx.model.bump_generation();
            }
        }
        Ok(())
    }
}

impl RendersToMain for CommitFilesContext {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()> {
        let (Some(sha), Some(path)) = (
            ctx.model.commit_files_ref.clone(),
            self.selected_item(ctx.model).map(|f| f.id().to_string()),
        ) else {
            ctx.main.set_content("", "No files");
            return Ok(());
        };
        let repo = ctx.git.repo()?;
        let text = show::commit_file_diff(&repo, &sha, &path)?;
        ctx.main.set_content("Patch", &text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScreenMode;
    use crate::presentation::row_text;

    fn display(show_graph: ShowGraph) -> CommitDisplay {
        CommitDisplay {
            show_graph,
            parse_emoji: false,
        }
    }

    fn model(n: usize) -> Model {
        Model {
            commits: (0..n)
                .map(|i| Commit {
                    sha: format!("{:040}", i),
                    name: format!("commit {}", i),
                    author_name: "Ada Lovelace".into(),
                    parents: vec!["p".into()],
                    ..Default::default()
                })
                .collect(),
            ..Model::default()
        }
    }

    fn scope(model: &Model, screen_mode: ScreenMode, current: ContextKey) -> RenderScope<'_> {
        RenderScope {
            model,
            screen_mode,
            current,
        }
    }

    #[test]
    fn graph_follows_policy_and_screen_mode() {
        let model = model(3);
        let ctx = BranchCommitsContext::new(display(ShowGraph::WhenMaximised));

        let normal = ctx.display_rows(&scope(&model, ScreenMode::Normal, ContextKey::FILES), 0, 1);
        assert!(!row_text(&normal[0]).contains('◯'));

        let full = ctx.display_rows(&scope(&model, ScreenMode::Full, ContextKey::FILES), 0, 1);
        assert!(row_text(&full[0]).contains('◯'));
        assert!(row_text(&full[0]).contains("AL"));

        let never = BranchCommitsContext::new(display(ShowGraph::Never));
        let rows = never.display_rows(&scope(&model, ScreenMode::Full, ContextKey::FILES), 0, 1);
        assert!(!row_text(&rows[0]).contains('◯'));
    }

    #[test]
    fn selection_highlight_only_when_focused() {
        let model = model(5);
        let mut ctx = BranchCommitsContext::new(display(ShowGraph::Never));
        ctx.panel_state_mut().select(3, 5);

        let rows = ctx.display_rows(
            &scope(&model, ScreenMode::Normal, ContextKey::BRANCH_COMMITS),
            2,
            3,
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0].style, Theme::sha_selected());
        assert_eq!(rows[0][0].style, Theme::sha());

        let rows = ctx.display_rows(&scope(&model, ScreenMode::Normal, ContextKey::FILES), 2, 3);
        assert!(rows.iter().all(|r| r[0].style == Theme::sha()));
    }

    #[test]
    fn commit_files_placeholder_is_not_a_row() {
        let model = Model::default();
        let ctx = CommitFilesContext::new();
        let rows = ctx.display_rows(&scope(&model, ScreenMode::Normal, ContextKey::COMMIT_FILES), 0, 10);
        assert!(rows.is_empty());
        assert_eq!(row_text(&ctx.empty_placeholder().unwrap()), "(none)");
    }
}
