//! Key strings from the config (`"q"`, `"<enter>"`, `"<a-enter>"`) resolved
//! into crossterm events

use crate::app::actions::Action;
use crate::config::KeybindingConfig;
use crate::context::ContextKey;
use crate::error::ConfigError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
    label: String,
}

impl KeyBinding {
    pub fn parse(value: &str) -> Option<Self> {
        let label = value.to_string();
        let mut chars = value.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Self {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE,
                label,
            });
        }

        let inner = value.strip_prefix('<')?.strip_suffix('>')?;
        let (modifiers, name) = match inner.split_once('-') {
            Some(("c", rest)) if !rest.is_empty() => (KeyModifiers::CONTROL, rest),
            Some(("a", rest)) if !rest.is_empty() => (KeyModifiers::ALT, rest),
            _ => (KeyModifiers::NONE, inner),
        };

        let code = match name {
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" => KeyCode::PageUp,
            "pgdown" => KeyCode::PageDown,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if modifiers != KeyModifiers::NONE => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };

        Some(Self {
            code,
            modifiers,
            label,
        })
    }

    /// Shift is implied by the character itself, so it is ignored
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let relevant = event.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
        self.code == event.code && self.modifiers == relevant
    }

    /// The event this binding fires on, for driving the UI without a terminal
    pub fn to_event(&self) -> KeyEvent {
        KeyEvent::new(self.code, self.modifiers)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

fn bind(action: &str, value: &str) -> Result<KeyBinding, ConfigError> {
    KeyBinding::parse(value).ok_or_else(|| ConfigError::InvalidKeybinding {
        action: action.to_string(),
        value: value.to_string(),
    })
}

type Table = Vec<(KeyBinding, Action)>;

/// Every binding, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Keybindings {
    universal: Table,
    contexts: HashMap<ContextKey, Table>,
    pub confirm: KeyBinding,
    pub return_: KeyBinding,
    pub append_newline: KeyBinding,
    pub toggle_panel: KeyBinding,
}

impl Keybindings {
    pub fn from_config(config: &KeybindingConfig) -> Result<Self, ConfigError> {
        let u = &config.universal;
        let mut universal: Table = vec![
            (bind("quit", &u.quit)?, Action::Quit),
            (bind("return", &u.return_)?, Action::Return),
            (bind("confirm", &u.confirm)?, Action::Confirm),
            (bind("prev_item", &u.prev_item)?, Action::CursorUp),
            (bind("next_item", &u.next_item)?, Action::CursorDown),
            (bind("prev_item_alt", &u.prev_item_alt)?, Action::CursorUp),
            (bind("next_item_alt", &u.next_item_alt)?, Action::CursorDown),
            (bind("prev_page", &u.prev_page)?, Action::PageUp),
            (bind("next_page", &u.next_page)?, Action::PageDown),
            (bind("goto_top", &u.goto_top)?, Action::GotoTop),
            (bind("goto_bottom", &u.goto_bottom)?, Action::GotoBottom),
            (bind("prev_block", &u.prev_block)?, Action::PrevWindow),
            (bind("next_block", &u.next_block)?, Action::NextWindow),
            (bind("toggle_panel", &u.toggle_panel)?, Action::NextWindow),
            (bind("prev_tab", &u.prev_tab)?, Action::PrevTab),
            (bind("next_tab", &u.next_tab)?, Action::NextTab),
            (bind("refresh", &u.refresh)?, Action::Refresh),
            (bind("next_screen_mode", &u.next_screen_mode)?, Action::NextScreenMode),
            (bind("prev_screen_mode", &u.prev_screen_mode)?, Action::PrevScreenMode),
            (bind("options_menu", &u.options_menu)?, Action::OpenMenu),
            (bind("scroll_up_main", &u.scroll_up_main)?, Action::ScrollMainUp),
            (bind("scroll_down_main", &u.scroll_down_main)?, Action::ScrollMainDown),
        ];
        for (i, value) in u.jump_to_block.iter().enumerate() {
            universal.push((bind("jump_to_block", value)?, Action::JumpToWindow(i)));
        }

        let mut contexts = HashMap::new();
        contexts.insert(
            ContextKey::FILES,
            vec![
                (bind("select", &u.select)?, Action::ToggleStaged),
                (bind("commit_changes", &config.files.commit_changes)?, Action::Commit),
                (
                    bind("toggle_staged_all", &config.files.toggle_staged_all)?,
                    Action::ToggleStagedAll,
                ),
            ],
        );
        contexts.insert(
            ContextKey::LOCAL_BRANCHES,
            vec![
                (bind("select", &u.select)?, Action::CheckoutBranch),
                (bind("new_branch", &config.branches.new_branch)?, Action::NewBranch),
            ],
        );
        contexts.insert(
            ContextKey::BRANCH_COMMITS,
            vec![(
                bind("amend_to_commit", &config.commits.amend_to_commit)?,
                Action::AmendToCommit,
            )],
        );

        Ok(Self {
            confirm: bind("confirm", &u.confirm)?,
            return_: bind("return", &u.return_)?,
            append_newline: bind("append_newline", &u.append_newline)?,
            toggle_panel: bind("toggle_panel", &u.toggle_panel)?,
            universal,
            contexts,
        })
    }

    /// Context bindings win over universal ones
    pub fn action_for(&self, context: ContextKey, event: &KeyEvent) -> Option<Action> {
        self.contexts
            .get(&context)
            .into_iter()
            .flatten()
            .chain(&self.universal)
            .find(|(binding, _)| binding.matches(event))
            .map(|(_, action)| *action)
    }

    pub fn binding_for(&self, context: ContextKey, action: Action) -> Option<&KeyBinding> {
        self.contexts
            .get(&context)
            .into_iter()
            .flatten()
            .chain(&self.universal)
            .find(|(_, a)| *a == action)
            .map(|(binding, _)| binding)
    }

    /// `(key label, action)` for the options menu of `context`
    pub fn entries(&self, context: ContextKey) -> Vec<(&str, Action)> {
        self.contexts
            .get(&context)
            .into_iter()
            .flatten()
            .chain(&self.universal)
            .map(|(binding, action)| (binding.label(), *action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_and_modified_keys() {
        let enter = KeyBinding::parse("<enter>").unwrap();
        assert!(enter.matches(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(!enter.matches(&KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)));

        let newline = KeyBinding::parse("<a-enter>").unwrap();
        assert!(newline.matches(&KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)));

        let ctrl = KeyBinding::parse("<c-r>").unwrap();
        assert!(ctrl.matches(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));

        assert!(KeyBinding::parse("<bogus>").is_none());
        assert!(KeyBinding::parse("").is_none());
        assert!(KeyBinding::parse("ab").is_none());
    }

    #[test]
    fn uppercase_ignores_shift() {
        let amend = KeyBinding::parse("A").unwrap();
        assert!(amend.matches(&KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)));
        assert!(!amend.matches(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)));
    }

    #[test]
    fn context_bindings_shadow_universal() {
        let keys = Keybindings::from_config(&KeybindingConfig::default()).unwrap();
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(keys.action_for(ContextKey::FILES, &space), Some(Action::ToggleStaged));
        assert_eq!(
            keys.action_for(ContextKey::LOCAL_BRANCHES, &space),
            Some(Action::CheckoutBranch)
        );
        assert_eq!(keys.action_for(ContextKey::TAGS, &space), None);

        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(keys.action_for(ContextKey::TAGS, &q), Some(Action::Quit));
    }

    #[test]
    fn bad_binding_is_a_config_error() {
        let mut config = KeybindingConfig::default();
        config.universal.quit = "<nope>".into();
        let err = Keybindings::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKeybinding { ref action, .. } if action == "quit"));
    }
}
