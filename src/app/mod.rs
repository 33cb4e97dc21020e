//! Application shell
//!
//! [`Gui`] owns every context, the model and the focus stack. Key presses
//! become [`Action`]s; actions and context hooks run here, one at a time, and
//! any error they return is logged and shown in the footer instead of
//! unwinding the loop.

pub mod actions;
pub mod focus;
pub mod input;
pub mod keys;
pub mod popup;
pub mod runtime;

pub use actions::Action;
pub use runtime::run_tui;

use crate::config::Config;
use crate::context::{
    ContextKey, ContextRegistry, Effect, HookContext, ListContext, MainView,
    PanelState, RenderScope, Row, ScreenMode, Window,
};
use crate::contexts;
use crate::git::GitCommands;
use crate::model::{Model, Suggestion};
use anyhow::{anyhow, bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use focus::{FocusManager, SIDE_WINDOWS};
use keys::Keybindings;
use popup::{ConfirmAction, Popup, PromptAction};
use std::collections::HashMap;
use std::path::Path;

/// Text areas outside the panels
#[derive(Debug, Default)]
pub struct Views {
    pub main: MainView,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Rows rendered for one context and what they were rendered from
struct CachedRows {
    window: Window,
    generation: u64,
    screen_mode: ScreenMode,
    /// Cursor and focus, for contexts whose rows depend on them
    selection: Option<(usize, bool)>,
    rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy)]
enum Hook {
    Focus,
    RenderToMain,
    Click,
}

pub struct Gui {
    pub config: Config,
    pub keybindings: Keybindings,
    git: GitCommands,
    model: Model,
    registry: ContextRegistry,
    views: Views,
    focus: FocusManager,
    screen_mode: ScreenMode,
    popup: Option<Popup>,
    row_cache: HashMap<ContextKey, CachedRows>,
    row_fetches: usize,
    page_height: usize,
    should_quit: bool,
}

impl Gui {
    /// Resolve configuration, build the contexts, load the repository and
    /// focus the files panel. Setup errors are returned; a failing first
    /// render is only reported.
    pub fn new(config: Config, repo_path: &Path) -> Result<Self> {
        let keybindings = Keybindings::from_config(&config.keybinding)?;
        let mut registry = contexts::build_registry(&config)?;
        let git = GitCommands::open(repo_path)?;
        let model = git.load_model(&Model::default())?;
        registry.refresh_all(&model);

        tracing::info!(repo = %git.repo_path().display(), "opened repository");

        let mut gui = Self {
            config,
            keybindings,
            git,
            model,
            registry,
            views: Views::default(),
            focus: FocusManager::new(ContextKey::FILES),
            screen_mode: ScreenMode::Normal,
            popup: None,
            row_cache: HashMap::new(),
            row_fetches: 0,
            page_height: 10,
            should_quit: false,
        };
        let result = gui.focus_context(ContextKey::FILES);
        gui.report(result);
        Ok(gui)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn main_view(&self) -> &MainView {
        &self.views.main
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn registry(&self) -> &ContextRegistry {
        &self.registry
    }

    pub fn focus(&self) -> &FocusManager {
        &self.focus
    }

    pub fn current_context(&self) -> ContextKey {
        self.focus.current()
    }

    pub fn screen_mode(&self) -> ScreenMode {
        self.screen_mode
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// How many times rows were actually rebuilt (cache misses)
    pub fn row_fetches(&self) -> usize {
        self.row_fetches
    }

    pub fn set_page_height(&mut self, height: usize) {
        self.page_height = height.max(1);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────

    /// Dispatch one key press. Never fails: errors go to the footer.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.views.error = None;
        let result = input::handle_key_event(self, key);
        self.report(result);
    }

    /// Type `text` one character at a time
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    /// Press whatever key is bound to `action` in the current context
    pub fn press(&mut self, action: Action) -> Result<()> {
        let event = self
            .keybindings
            .binding_for(self.current_context(), action)
            .map(|b| b.to_event())
            .ok_or_else(|| anyhow!("No key bound to {:?}", action))?;
        self.handle_key(event);
        Ok(())
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!(context = %self.focus.current(), "{:#}", e);
            self.views.error = Some(format!("{:#}", e));
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Focus and hooks
    // ─────────────────────────────────────────────────────────────────────

    /// Make `key` the current context and run its focus hooks
    pub fn focus_context(&mut self, key: ContextKey) -> Result<()> {
        let context = self
            .registry
            .get(key)
            .ok_or_else(|| anyhow!("No context registered for '{}'", key))?;
        let (kind, window) = (context.kind(), context.window_name());

        self.focus.push(key, kind, window);
        tracing::debug!(context = %key, "focus");
        self.focus_hooks(key)
    }

    /// Close the top popup, or step back out of a drilled-in panel
    pub fn pop_context(&mut self) -> Result<()> {
        if let Some(key) = self.focus.pop() {
            tracing::debug!(context = %key, "pop");
            return self.focus_hooks(key);
        }
        match contexts::parent_of(self.focus.current()) {
            Some(parent) => self.focus_context(parent),
            None => Ok(()),
        }
    }

    /// `on_focus` then `render_to_main`, then whatever they asked for. The
    /// main view is rendered even when `on_focus` fails, and cleared when it
    /// can't be, so it never shows the previous panel's content.
    fn focus_hooks(&mut self, key: ContextKey) -> Result<()> {
        let focused = self.call_hook(key, Hook::Focus);
        let rendered = self.call_hook(key, Hook::RenderToMain);
        if rendered.is_err() {
            self.views.main.clear();
        }
        let mut effects = focused?;
        effects.extend(rendered?);
        self.apply_effects(effects)
    }

    fn call_hook(&mut self, key: ContextKey, hook: Hook) -> Result<Vec<Effect>> {
        let mut effects = Vec::new();
        let generation = self.model.generation;

        let context = self
            .registry
            .get(key)
            .ok_or_else(|| anyhow!("No context registered for '{}'", key))?;
        let mut ctx = HookContext::new(
            &mut self.model,
            &mut self.views.main,
            &self.git,
            &mut effects,
        );
        let result = match hook {
            Hook::Focus => context.as_focusable().map(|c| c.on_focus(&mut ctx)),
            Hook::RenderToMain => context
                .as_main_renderer()
                .map(|c| c.render_to_main(&mut ctx)),
            Hook::Click => context
                .as_clickable()
                .map(|c| c.on_click_selected_item(&mut ctx)),
        };

        // the hook may have reloaded a collection under other panels
        if self.model.generation != generation {
            self.registry.refresh_all(&self.model);
        }
        result.transpose()?;
        Ok(effects)
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Focus(key) => self.focus_context(key)?,
                Effect::Pop => self.pop_context()?,
                Effect::Run(action) => self.run_action(action)?,
                Effect::SetPromptText(text) => {
                    if let Some(input) = self.popup.as_mut().and_then(Popup::input_mut) {
                        input.set_text(&text);
                    }
                }
                Effect::Refresh => self.refresh()?,
            }
        }
        Ok(())
    }

    /// Reload from git, clamp every panel, and redraw the main view
    pub fn refresh(&mut self) -> Result<()> {
        self.model = self.git.load_model(&self.model)?;
        self.registry.refresh_all(&self.model);
        let effects = self.call_hook(self.focus.current_side(), Hook::RenderToMain)?;
        self.apply_effects(effects)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────

    pub fn run_action(&mut self, action: Action) -> Result<()> {
        tracing::trace!(?action, "action");
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextWindow => self.cycle_window(1)?,
            Action::PrevWindow => self.cycle_window(-1)?,
            Action::JumpToWindow(i) => {
                if let Some(window) = SIDE_WINDOWS.get(i) {
                    self.focus_context(self.focus.active_in_window(window))?;
                }
            }
            Action::NextTab => self.cycle_tab(1)?,
            Action::PrevTab => self.cycle_tab(-1)?,
            Action::CursorUp => self.move_cursor(|p, n| p.move_selection(-1, n))?,
            Action::CursorDown => self.move_cursor(|p, n| p.move_selection(1, n))?,
            Action::PageUp => {
                let page = self.page_height as isize;
                self.move_cursor(|p, n| p.move_selection(-page, n))?
            }
            Action::PageDown => {
                let page = self.page_height as isize;
                self.move_cursor(|p, n| p.move_selection(page, n))?
            }
            Action::GotoTop => self.move_cursor(|p, n| p.select(0, n))?,
            Action::GotoBottom => self.move_cursor(|p, n| p.select(usize::MAX, n))?,
            Action::ScrollMainUp => {
                let step = self.main_scroll_step();
                self.views.main.scroll(-step);
            }
            Action::ScrollMainDown => {
                let step = self.main_scroll_step();
                self.views.main.scroll(step);
            }
            Action::Confirm => {
                let effects = self.call_hook(self.focus.current(), Hook::Click)?;
                self.apply_effects(effects)?;
            }
            Action::Return => {
                if self.popup.is_some() {
                    self.close_popup();
                } else {
                    self.pop_context()?;
                }
            }
            Action::ToggleStaged => {
                let Some(file) = self.model.files.get(self.selected(ContextKey::FILES)) else {
                    return Ok(());
                };
                self.git.toggle_file(&file.name, file.has_unstaged_changes)?;
                self.refresh()?;
            }
            Action::ToggleStagedAll => {
                self.git.toggle_staged_all(&self.model)?;
                self.refresh()?;
            }
            Action::Commit => {
                if !self.model.has_staged_files() {
                    bail!("There are no staged files to commit");
                }
                self.popup = Some(Popup::commit_message());
            }
            Action::AmendToCommit => {
                let index = self.selected(ContextKey::BRANCH_COMMITS);
                let Some(commit) = self.model.commits.get(index) else {
                    return Ok(());
                };
                if index != 0 {
                    bail!("Only the HEAD commit can be amended");
                }
                if !self.model.has_staged_files() {
                    bail!("There are no staged files to amend with");
                }
                self.popup = Some(Popup::amend_confirmation(commit.sha.clone()));
            }
            Action::CheckoutBranch => {
                let Some(branch) = self.model.branches.get(self.selected(ContextKey::LOCAL_BRANCHES))
                else {
                    return Ok(());
                };
                if branch.is_head {
                    return Ok(());
                }
                let name = branch.name.clone();
                self.git.checkout_branch(&name)?;
                self.views.status = Some(format!("Checked out {}", name));
                self.refresh()?;
            }
            Action::NewBranch => self.open_new_branch_prompt()?,
            Action::OpenMenu => {
                let current = self.focus.current();
                if current == ContextKey::MENU {
                    return Ok(());
                }
                self.model.menu_items = actions::menu_items(self.keybindings.entries(current));
                self.reset_list(ContextKey::MENU);
                self.focus_context(ContextKey::MENU)?;
            }
            Action::NextScreenMode => self.screen_mode = self.screen_mode.next(),
            Action::PrevScreenMode => self.screen_mode = self.screen_mode.prev(),
            Action::Refresh => self.refresh()?,
        }
        Ok(())
    }

    fn main_scroll_step(&self) -> isize {
        (self.page_height / 2).max(1) as isize
    }

    fn selected(&self, key: ContextKey) -> usize {
        self.registry
            .get(key)
            .map(|c| c.panel_state().selected())
            .unwrap_or(0)
    }

    /// New list contents for a popup: cursor back to the top
    fn reset_list(&mut self, key: ContextKey) {
        if let Some(context) = self.registry.get_mut(key) {
            context.panel_state_mut().reset();
        }
        self.model.bump_generation();
    }

    fn move_cursor(&mut self, f: impl FnOnce(&mut PanelState, usize)) -> Result<()> {
        let key = self.focus.current();
        let Some(context) = self.registry.get_mut(key) else {
            return Ok(());
        };
        let count = context.item_count(&self.model);
        let before = context.panel_state().selected();
        f(context.panel_state_mut(), count);

        if context.panel_state().selected() != before {
            self.focus_hooks(key)?;
        }
        Ok(())
    }

    fn cycle_window(&mut self, step: isize) -> Result<()> {
        let window = self
            .registry
            .get(self.focus.current_side())
            .map(|c| c.window_name())
            .unwrap_or("files");
        let n = SIDE_WINDOWS.len() as isize;
        let next = (self.focus.window_index(window) as isize + step).rem_euclid(n) as usize;
        self.focus_context(self.focus.active_in_window(SIDE_WINDOWS[next]))
    }

    /// Tabs of a window: its contexts that aren't drilled into from another
    pub fn tabs(&self, window: &str) -> Vec<ContextKey> {
        self.registry
            .contexts_in_window(window)
            .into_iter()
            .filter(|k| contexts::parent_of(*k).is_none())
            .collect()
    }

    fn cycle_tab(&mut self, step: isize) -> Result<()> {
        let current = self.focus.current_side();
        let Some(window) = self.registry.get(current).map(|c| c.window_name()) else {
            return Ok(());
        };
        let tabs = self.tabs(window);
        if tabs.is_empty() {
            return Ok(());
        }
        // a drilled-in context counts as its parent's tab
        let anchor = contexts::parent_of(current).unwrap_or(current);
        let index = tabs.iter().position(|k| *k == anchor).unwrap_or(0) as isize;
        let next = (index + step).rem_euclid(tabs.len() as isize) as usize;
        self.focus_context(tabs[next])
    }

    // ─────────────────────────────────────────────────────────────────────
    // Popups
    // ─────────────────────────────────────────────────────────────────────

    pub fn popup_input_mut(&mut self) -> Option<&mut popup::TextInput> {
        self.popup.as_mut().and_then(Popup::input_mut)
    }

    fn open_new_branch_prompt(&mut self) -> Result<()> {
        self.model.suggestions = self
            .model
            .branches
            .iter()
            .map(|b| Suggestion {
                value: b.name.clone(),
                label: b.name.clone(),
            })
            .collect();
        self.reset_list(ContextKey::SUGGESTIONS);
        self.popup = Some(Popup::new_branch_prompt(self.model.head_branch.as_deref()));
        self.focus_context(ContextKey::SUGGESTIONS)
    }

    pub fn close_popup(&mut self) {
        if let Some(Popup::Prompt { .. }) = self.popup.take() {
            self.focus.remove(ContextKey::SUGGESTIONS);
        }
    }

    /// Accept the open popup
    pub fn submit_popup(&mut self) -> Result<()> {
        if let Some(Popup::CommitMessage { input }) = &self.popup {
            if input.is_blank() {
                bail!("Commit message cannot be empty");
            }
        }
        let Some(popup) = self.popup.take() else {
            return Ok(());
        };

        match popup {
            Popup::CommitMessage { input } => {
                let oid = self.git.commit(&input.text())?;
                self.views.status = Some(format!("Committed {:.8}", oid.to_string()));
            }
            Popup::Confirm {
                action: ConfirmAction::AmendCommit { sha },
                ..
            } => {
                self.git.amend_commit(&sha)?;
                self.views.status = Some("Amended commit".to_string());
            }
            Popup::Prompt {
                input,
                action: PromptAction::NewBranch,
                ..
            } => {
                self.focus.remove(ContextKey::SUGGESTIONS);
                self.git.create_branch(&input.text())?;
                self.views.status = Some(format!("Created branch {}", input.text().trim()));
            }
        }
        self.refresh()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    /// Scroll `key` so its cursor fits in `height` rows and return the
    /// visible window with its rows. Rows are rebuilt only when the window,
    /// the model or (for contexts that draw the selection) the cursor moved.
    pub fn visible_rows(&mut self, key: ContextKey, height: usize) -> (Window, Vec<Row>) {
        let current = self.focus.current();
        let screen_mode = self.screen_mode;
        let generation = self.model.generation;

        let Some(context) = self.registry.get_mut(key) else {
            return (Window::default(), Vec::new());
        };
        let count = context.item_count(&self.model);
        let window = context.panel_state_mut().scroll_window(height, count);
        let context: &dyn ListContext = &*context;

        let selection = context
            .renders_selection()
            .then(|| (context.panel_state().selected(), current == key));

        if let Some(cached) = self.row_cache.get(&key) {
            if cached.window == window
                && cached.generation == generation
                && cached.screen_mode == screen_mode
                && cached.selection == selection
            {
                return (window, cached.rows.clone());
            }
        }

        let scope = RenderScope {
            model: &self.model,
            screen_mode,
            current,
        };
        let mut rows = context.display_rows(&scope, window.start, window.len);
        if count == 0 {
            if let Some(placeholder) = context.empty_placeholder() {
                rows = vec![placeholder];
            }
        }

        self.row_fetches += 1;
        self.row_cache.insert(
            key,
            CachedRows {
                window,
                generation,
                screen_mode,
                selection,
                rows: rows.clone(),
            },
        );
        (window, rows)
    }
}
