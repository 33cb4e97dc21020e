//! Which context has focus, and which one each window last showed

use crate::context::{ContextKey, ContextKind};
use std::collections::HashMap;

/// The side windows, in the order "next window" walks them
pub const SIDE_WINDOWS: [&str; 4] = ["files", "branches", "commits", "stash"];

/// Default context of each side window
pub fn default_context(window: &str) -> Option<ContextKey> {
    match window {
        "files" => Some(ContextKey::FILES),
        "branches" => Some(ContextKey::LOCAL_BRANCHES),
        "commits" => Some(ContextKey::BRANCH_COMMITS),
        "stash" => Some(ContextKey::STASH),
        _ => None,
    }
}

/// Focus stack plus the active context per window.
///
/// The bottom of the stack is always a side context; popups stack on top
/// of it. The stack is never empty.
#[derive(Debug, Clone)]
pub struct FocusManager {
    stack: Vec<ContextKey>,
    window_active: HashMap<&'static str, ContextKey>,
}

impl Default for FocusManager {
    fn default() -> Self {
        Self::new(ContextKey::FILES)
    }
}

impl FocusManager {
    pub fn new(initial: ContextKey) -> Self {
        Self {
            stack: vec![initial],
            window_active: HashMap::new(),
        }
    }

    pub fn current(&self) -> ContextKey {
        self.stack.last().copied().unwrap_or(ContextKey::FILES)
    }

    /// The side context under any popups
    pub fn current_side(&self) -> ContextKey {
        self.stack.first().copied().unwrap_or(ContextKey::FILES)
    }

    pub fn stack(&self) -> &[ContextKey] {
        &self.stack
    }

    pub fn is_popup_open(&self) -> bool {
        self.stack.len() > 1
    }

    /// Side contexts replace the stack; popups stack on top.
    pub fn push(&mut self, key: ContextKey, kind: ContextKind, window: &'static str) {
        if kind.is_popup() {
            if self.current() != key {
                self.stack.retain(|k| *k != key);
                self.stack.push(key);
            }
        } else {
            self.stack.clear();
            self.stack.push(key);
            self.window_active.insert(window, key);
        }
    }

    /// Drop the top popup, returning the newly focused key. Never pops the
    /// last entry.
    pub fn pop(&mut self) -> Option<ContextKey> {
        if self.stack.len() > 1 {
            self.stack.pop();
            Some(self.current())
        } else {
            None
        }
    }

    /// Remove `key` wherever it sits in the popup part of the stack
    pub fn remove(&mut self, key: ContextKey) {
        if self.stack.len() > 1 && self.stack[1..].contains(&key) {
            let side = self.stack[0];
            self.stack.retain(|k| *k != key);
            if self.stack.is_empty() {
                self.stack.push(side);
            }
        }
    }

    pub fn active_in_window(&self, window: &str) -> ContextKey {
        self.window_active
            .get(window)
            .copied()
            .or_else(|| default_context(window))
            .unwrap_or(ContextKey::FILES)
    }

    /// Index into [`SIDE_WINDOWS`] of the focused side window
    pub fn window_index(&self, window: &str) -> usize {
        SIDE_WINDOWS.iter().position(|w| *w == window).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_contexts_replace_the_stack() {
        let mut focus = FocusManager::default();
        focus.push(ContextKey::MENU, ContextKind::PersistentPopup, "menu");
        assert_eq!(focus.stack().len(), 2);

        focus.push(ContextKey::BRANCH_COMMITS, ContextKind::SideContext, "commits");
        assert_eq!(focus.stack(), &[ContextKey::BRANCH_COMMITS]);
        assert_eq!(focus.active_in_window("commits"), ContextKey::BRANCH_COMMITS);
    }

    #[test]
    fn pop_never_empties() {
        let mut focus = FocusManager::default();
        assert_eq!(focus.pop(), None);
        assert_eq!(focus.current(), ContextKey::FILES);

        focus.push(ContextKey::MENU, ContextKind::PersistentPopup, "menu");
        assert!(focus.is_popup_open());
        assert_eq!(focus.pop(), Some(ContextKey::FILES));
        assert!(!focus.is_popup_open());
    }

    #[test]
    fn pushing_the_same_popup_twice_is_a_noop() {
        let mut focus = FocusManager::default();
        focus.push(ContextKey::MENU, ContextKind::PersistentPopup, "menu");
        focus.push(ContextKey::MENU, ContextKind::PersistentPopup, "menu");
        assert_eq!(focus.stack(), &[ContextKey::FILES, ContextKey::MENU]);
    }

    #[test]
    fn window_remembers_last_tab() {
        let mut focus = FocusManager::default();
        assert_eq!(focus.active_in_window("branches"), ContextKey::LOCAL_BRANCHES);
        focus.push(ContextKey::TAGS, ContextKind::SideContext, "branches");
        focus.push(ContextKey::FILES, ContextKind::SideContext, "files");
        assert_eq!(focus.active_in_window("branches"), ContextKey::TAGS);
    }

    #[test]
    fn remove_keeps_side_context() {
        let mut focus = FocusManager::default();
        focus.push(ContextKey::SUGGESTIONS, ContextKind::PersistentPopup, "suggestions");
        focus.remove(ContextKey::SUGGESTIONS);
        assert_eq!(focus.stack(), &[ContextKey::FILES]);
        focus.remove(ContextKey::FILES);
        assert_eq!(focus.stack(), &[ContextKey::FILES]);
    }
}
