//! List contexts
//!
//! Every side panel and list popup is a [`ListContext`]: something that can
//! count its items, render a window of them, and report what is selected.
//! The focus manager in [`crate::app`] drives them; it never needs to know
//! which collection sits behind a given panel.
//!
//! Optional behaviour is split into capability traits ([`Focusable`],
//! [`RendersToMain`], [`Clickable`]) that a context may expose through the
//! `as_*` accessors. A context that doesn't expose one simply has nothing to
//! do for that event.

pub mod hooks;
pub mod panel_state;
pub mod registry;

pub use hooks::{Effect, HookContext, MainView};
pub use panel_state::{clamp_window, PanelState, Window};
pub use registry::ContextRegistry;

use crate::model::{ListItem, Model};
use anyhow::Result;
use ratatui::text::Span;
use std::fmt;

/// One rendered line: ordered, styled segments.
pub type Row = Vec<Span<'static>>;

/// Stable identifier used for routing and for the focus stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(&'static str);

impl ContextKey {
    pub const MENU: ContextKey = ContextKey("menu");
    pub const FILES: ContextKey = ContextKey("files");
    pub const LOCAL_BRANCHES: ContextKey = ContextKey("localBranches");
    pub const REMOTES: ContextKey = ContextKey("remotes");
    pub const REMOTE_BRANCHES: ContextKey = ContextKey("remoteBranches");
    pub const TAGS: ContextKey = ContextKey("tags");
    pub const BRANCH_COMMITS: ContextKey = ContextKey("commits");
    pub const REFLOG_COMMITS: ContextKey = ContextKey("reflogCommits");
    pub const SUB_COMMITS: ContextKey = ContextKey("subCommits");
    pub const STASH: ContextKey = ContextKey("stash");
    pub const COMMIT_FILES: ContextKey = ContextKey("commitFiles");
    pub const SUBMODULES: ContextKey = ContextKey("submodules");
    pub const SUGGESTIONS: ContextKey = ContextKey("suggestions");

    /// Every key the application registers, in registry order
    pub const ALL: [ContextKey; 13] = [
        Self::MENU,
        Self::FILES,
        Self::LOCAL_BRANCHES,
        Self::REMOTES,
        Self::REMOTE_BRANCHES,
        Self::TAGS,
        Self::BRANCH_COMMITS,
        Self::REFLOG_COMMITS,
        Self::SUB_COMMITS,
        Self::STASH,
        Self::COMMIT_FILES,
        Self::SUBMODULES,
        Self::SUGGESTIONS,
    ];

    pub const fn new(key: &'static str) -> Self {
        ContextKey(key)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Stacking policy tag, interpreted only by the focus manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    SideContext,
    MainContext,
    PersistentPopup,
    TemporaryPopup,
}

impl ContextKind {
    pub fn is_popup(self) -> bool {
        matches!(
            self,
            ContextKind::PersistentPopup | ContextKind::TemporaryPopup
        )
    }
}

/// Normal, half and full screen layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenMode {
    #[default]
    Normal,
    Half,
    Full,
}

impl ScreenMode {
    pub fn next(self) -> Self {
        match self {
            ScreenMode::Normal => ScreenMode::Half,
            ScreenMode::Half => ScreenMode::Full,
            ScreenMode::Full => ScreenMode::Normal,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ScreenMode::Normal => ScreenMode::Full,
            ScreenMode::Half => ScreenMode::Normal,
            ScreenMode::Full => ScreenMode::Half,
        }
    }

    pub fn is_maximised(self) -> bool {
        self != ScreenMode::Normal
    }
}

/// Identity and panel state shared by every context.
#[derive(Debug, Clone)]
pub struct BaseContext {
    pub key: ContextKey,
    pub view_name: &'static str,
    pub window_name: Option<&'static str>,
    pub kind: ContextKind,
    /// Tab label shown in the window title
    pub title: &'static str,
    pub panel: PanelState,
}

impl BaseContext {
    pub fn new(
        key: ContextKey,
        view_name: &'static str,
        window_name: Option<&'static str>,
        kind: ContextKind,
        title: &'static str,
    ) -> Self {
        Self {
            key,
            view_name,
            window_name,
            kind,
            title,
            panel: PanelState::default(),
        }
    }

    pub fn side(key: ContextKey, view_name: &'static str, window: &'static str, title: &'static str) -> Self {
        Self::new(key, view_name, Some(window), ContextKind::SideContext, title)
    }
}

/// What the display provider gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct RenderScope<'a> {
    pub model: &'a Model,
    pub screen_mode: ScreenMode,
    /// The currently focused context
    pub current: ContextKey,
}

/// A domain collection exposed as a navigable, windowed panel.
pub trait ListContext {
    fn base(&self) -> &BaseContext;
    fn base_mut(&mut self) -> &mut BaseContext;

    fn item_count(&self, model: &Model) -> usize;

    /// Rows for items `start..start + length`, clamped to what exists. Must
    /// not touch panel state and must not fail.
    fn display_rows(&self, scope: &RenderScope<'_>, start: usize, length: usize) -> Vec<Row>;

    /// The item under the cursor, or `None` when there isn't one.
    fn selected_item<'m>(&self, model: &'m Model) -> Option<&'m dyn ListItem>;

    /// Rows depend on the selection and must be refetched when it moves.
    fn renders_selection(&self) -> bool {
        false
    }

    /// Shown by the renderer instead of an empty list
    fn empty_placeholder(&self) -> Option<Row> {
        None
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        None
    }

    fn as_main_renderer(&self) -> Option<&dyn RendersToMain> {
        None
    }

    fn as_clickable(&self) -> Option<&dyn Clickable> {
        None
    }

    fn key(&self) -> ContextKey {
        self.base().key
    }

    fn kind(&self) -> ContextKind {
        self.base().kind
    }

    fn view_name(&self) -> &'static str {
        self.base().view_name
    }

    /// Falls back to the view name for contexts without a window
    fn window_name(&self) -> &'static str {
        self.base().window_name.unwrap_or(self.base().view_name)
    }

    fn title(&self) -> &'static str {
        self.base().title
    }

    fn panel_state(&self) -> &PanelState {
        &self.base().panel
    }

    fn panel_state_mut(&mut self) -> &mut PanelState {
        &mut self.base_mut().panel
    }
}

/// Runs when the context becomes active, and again when its selection moves.
pub trait Focusable {
    fn on_focus(&self, ctx: &mut HookContext<'_>) -> Result<()>;
}

/// Fills the main view from the current selection; runs after `on_focus`.
pub trait RendersToMain {
    fn render_to_main(&self, ctx: &mut HookContext<'_>) -> Result<()>;
}

/// Runs when the user confirms the current selection.
pub trait Clickable {
    fn on_click_selected_item(&self, ctx: &mut HookContext<'_>) -> Result<()>;
}

/// The rows of `items` that fall inside the requested window.
pub fn window_of<T>(items: &[T], start: usize, length: usize) -> &[T] {
    &items[clamp_window(items.len(), start, length)]
}

/// `items[cursor]` as a list item, if the cursor points at one.
pub fn pick<'m, T: ListItem>(items: &'m [T], panel: &PanelState) -> Option<&'m dyn ListItem> {
    items.get(panel.selected()).map(|item| item as &dyn ListItem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_mode_cycles() {
        let mode = ScreenMode::Normal;
        assert_eq!(mode.next().next().next(), mode);
        assert_eq!(mode.prev(), ScreenMode::Full);
        assert!(!mode.is_maximised());
        assert!(mode.next().is_maximised());
    }

    #[test]
    fn popup_kinds() {
        assert!(ContextKind::PersistentPopup.is_popup());
        assert!(ContextKind::TemporaryPopup.is_popup());
        assert!(!ContextKind::SideContext.is_popup());
    }

    #[test]
    fn all_keys_are_distinct() {
        let mut keys: Vec<_> = ContextKey::ALL.iter().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), ContextKey::ALL.len());
    }

    #[test]
    fn window_of_clamps() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(window_of(&items, 1, 2), &[2, 3]);
        assert_eq!(window_of(&items, 3, 10), &[4, 5]);
        assert!(window_of(&items, 9, 3).is_empty());
    }
}
