//! Everything a key press (or a menu item) can ask for

use crate::model::MenuItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NextWindow,
    PrevWindow,
    /// Zero-based index into the side windows
    JumpToWindow(usize),
    NextTab,
    PrevTab,
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    ScrollMainUp,
    ScrollMainDown,
    /// Click the selected item
    Confirm,
    /// Close the popup or go back to the parent panel
    Return,
    ToggleStaged,
    ToggleStagedAll,
    Commit,
    AmendToCommit,
    CheckoutBranch,
    NewBranch,
    OpenMenu,
    NextScreenMode,
    PrevScreenMode,
    Refresh,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Quit => "Quit",
            Action::NextWindow => "Next window",
            Action::PrevWindow => "Previous window",
            Action::JumpToWindow(_) => "Jump to window",
            Action::NextTab => "Next tab",
            Action::PrevTab => "Previous tab",
            Action::CursorUp => "Previous item",
            Action::CursorDown => "Next item",
            Action::PageUp => "Previous page",
            Action::PageDown => "Next page",
            Action::GotoTop => "Scroll to top",
            Action::GotoBottom => "Scroll to bottom",
            Action::ScrollMainUp => "Scroll main view up",
            Action::ScrollMainDown => "Scroll main view down",
            Action::Confirm => "Enter",
            Action::Return => "Return",
            Action::ToggleStaged => "Stage / unstage file",
            Action::ToggleStagedAll => "Stage / unstage all",
            Action::Commit => "Commit",
            Action::AmendToCommit => "Amend commit with staged changes",
            Action::CheckoutBranch => "Checkout branch",
            Action::NewBranch => "New branch",
            Action::OpenMenu => "Keybindings",
            Action::NextScreenMode => "Next screen mode",
            Action::PrevScreenMode => "Previous screen mode",
            Action::Refresh => "Refresh",
        }
    }

    /// Actions that only make sense while the cursor sits in a list
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            Action::CursorUp
                | Action::CursorDown
                | Action::PageUp
                | Action::PageDown
                | Action::GotoTop
                | Action::GotoBottom
        )
    }
}

/// Menu entries for `(key hint, action)` pairs, navigation left out
pub fn menu_items<'a>(bindings: impl IntoIterator<Item = (&'a str, Action)>) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = Vec::new();
    for (hint, action) in bindings {
        if action.is_navigation() || matches!(action, Action::OpenMenu | Action::Confirm) {
            continue;
        }
        if items.iter().any(|item| item.action == action) {
            continue;
        }
        items.push(MenuItem {
            label: action.label().to_string(),
            key_hint: hint.to_string(),
            action,
        });
    }
    items
}
