//! Key dispatch: the open popup first, then the focused context's bindings,
//! then the universal ones

use super::{Action, Gui};
use crate::app::popup::Popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key_event(gui: &mut Gui, key: KeyEvent) -> Result<()> {
    if gui.popup().is_some() && handle_popup_key(gui, &key)? {
        return Ok(());
    }

    match gui.keybindings.action_for(gui.current_context(), &key) {
        Some(action) => gui.run_action(action),
        None => Ok(()),
    }
}

/// Returns `true` when the popup consumed the key.
///
/// Only prompts let keys through, so arrows can move through suggestions.
fn handle_popup_key(gui: &mut Gui, key: &KeyEvent) -> Result<bool> {
    let keys = &gui.keybindings;
    let (is_return, is_confirm, is_newline, is_tab) = (
        keys.return_.matches(key),
        keys.confirm.matches(key),
        keys.append_newline.matches(key),
        keys.toggle_panel.matches(key),
    );
    let (multiline, is_prompt) = match gui.popup() {
        Some(popup) => (popup.is_multiline(), matches!(popup, Popup::Prompt { .. })),
        None => return Ok(false),
    };

    if is_return {
        gui.close_popup();
        return Ok(true);
    }
    // checked before confirm: <a-enter> must not submit
    if is_newline {
        if multiline {
            if let Some(input) = gui.popup_input_mut() {
                input.newline();
            }
        }
        return Ok(true);
    }
    if is_confirm {
        gui.submit_popup()?;
        return Ok(true);
    }
    if is_tab && is_prompt {
        // take the highlighted suggestion
        gui.run_action(Action::Confirm)?;
        return Ok(true);
    }

    let Some(input) = gui.popup_input_mut() else {
        return Ok(true);
    };
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            input.insert(c);
            Ok(true)
        }
        KeyCode::Backspace => {
            input.backspace();
            Ok(true)
        }
        _ => Ok(!is_prompt),
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{Action, Gui};
    use crate::config::Config;
    use crate::context::ContextKey;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::fs;
    use tempfile::TempDir;

    fn gui_in_repo() -> (TempDir, Gui) {
        let dir = tempfile::tempdir().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        fs::write(dir.path().join("notes.txt"), "notes\n").unwrap();
        let gui = Gui::new(Config::default(), dir.path()).unwrap();
        (dir, gui)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn escape_closes_commit_editor_without_committing() {
        let (_dir, mut gui) = gui_in_repo();
        gui.press(Action::ToggleStaged).unwrap();
        gui.press(Action::Commit).unwrap();
        gui.type_text("wip");
        gui.handle_key(key(KeyCode::Esc));

        assert!(gui.popup().is_none());
        assert_eq!(gui.model().commit_count(), 0);
    }

    #[test]
    fn editor_swallows_bound_keys() {
        let (_dir, mut gui) = gui_in_repo();
        gui.press(Action::ToggleStaged).unwrap();
        gui.press(Action::Commit).unwrap();
        gui.type_text("q");
        assert!(!gui.should_quit());
        assert_eq!(gui.popup().unwrap().input().unwrap().text(), "q");

        gui.handle_key(key(KeyCode::Backspace));
        gui.handle_key(key(KeyCode::Enter));
        assert_eq!(
            gui.views().error.as_deref(),
            Some("Commit message cannot be empty")
        );
        assert!(gui.popup().is_some());
    }

    #[test]
    fn new_branch_prompt_creates_and_checks_out() {
        let (_dir, mut gui) = gui_in_repo();
        gui.press(Action::ToggleStaged).unwrap();
        gui.press(Action::Commit).unwrap();
        gui.type_text("initial");
        gui.handle_key(key(KeyCode::Enter));

        gui.run_action(Action::JumpToWindow(1)).unwrap();
        assert_eq!(gui.current_context(), ContextKey::LOCAL_BRANCHES);
        gui.press(Action::NewBranch).unwrap();
        assert_eq!(gui.current_context(), ContextKey::SUGGESTIONS);
        assert!(!gui.model().suggestions.is_empty());

        gui.type_text("topic");
        gui.handle_key(key(KeyCode::Enter));

        assert!(gui.popup().is_none());
        assert_eq!(gui.current_context(), ContextKey::LOCAL_BRANCHES);
        assert_eq!(gui.model().head_branch.as_deref(), Some("topic"));
    }

    #[test]
    fn tab_takes_suggestion() {
        let (_dir, mut gui) = gui_in_repo();
        gui.press(Action::ToggleStaged).unwrap();
        gui.press(Action::Commit).unwrap();
        gui.type_text("initial");
        gui.handle_key(key(KeyCode::Enter));

        gui.run_action(Action::JumpToWindow(1)).unwrap();
        gui.press(Action::NewBranch).unwrap();
        gui.handle_key(key(KeyCode::Tab));

        let head = gui.model().head_branch.clone().unwrap();
        assert_eq!(gui.popup().unwrap().input().unwrap().text(), head);
    }
}
