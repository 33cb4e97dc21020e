//! Popups that aren't lists: the commit message editor, yes/no
//! confirmations and single line prompts

/// Editable text, cursor always at the end
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    lines: Vec<String>,
}

impl TextInput {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    pub fn with_text(text: &str) -> Self {
        let mut input = Self::new();
        input.set_text(text);
        input
    }

    pub fn insert(&mut self, c: char) {
        match self.lines.last_mut() {
            Some(line) => line.push(c),
            None => self.lines.push(c.to_string()),
        }
    }

    pub fn insert_str(&mut self, s: &str) {
        s.chars().for_each(|c| {
            if c == '\n' {
                self.newline();
            } else {
                self.insert(c);
            }
        });
    }

    pub fn newline(&mut self) {
        self.lines.push(String::new());
    }

    /// Deletes a char, or joins with the previous line at a line start
    pub fn backspace(&mut self) {
        if let Some(line) = self.lines.last_mut() {
            if line.pop().is_some() {
                return;
            }
        }
        if self.lines.len() > 1 {
            self.lines.pop();
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = vec![String::new()];
        self.insert_str(text);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// What a confirmation does when accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    AmendCommit { sha: String },
}

/// What a prompt does with its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    NewBranch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    CommitMessage {
        input: TextInput,
    },
    Confirm {
        title: String,
        body: String,
        action: ConfirmAction,
    },
    Prompt {
        title: String,
        input: TextInput,
        action: PromptAction,
    },
}

impl Popup {
    pub fn commit_message() -> Self {
        Popup::CommitMessage {
            input: TextInput::new(),
        }
    }

    pub fn amend_confirmation(sha: String) -> Self {
        Popup::Confirm {
            title: "Amend Commit".to_string(),
            body: "Are you sure you want to amend this commit with your staged files?".to_string(),
            action: ConfirmAction::AmendCommit { sha },
        }
    }

    pub fn new_branch_prompt(head: Option<&str>) -> Self {
        let title = match head {
            Some(head) => format!("New branch name (branch is off of '{}')", head),
            None => "New branch name".to_string(),
        };
        Popup::Prompt {
            title,
            input: TextInput::new(),
            action: PromptAction::NewBranch,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Popup::CommitMessage { .. } => "Commit summary",
            Popup::Confirm { title, .. } | Popup::Prompt { title, .. } => title,
        }
    }

    /// Body text, for confirmations
    pub fn body(&self) -> Option<&str> {
        match self {
            Popup::Confirm { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn input(&self) -> Option<&TextInput> {
        match self {
            Popup::CommitMessage { input } | Popup::Prompt { input, .. } => Some(input),
            Popup::Confirm { .. } => None,
        }
    }

    pub fn input_mut(&mut self) -> Option<&mut TextInput> {
        match self {
            Popup::CommitMessage { input } | Popup::Prompt { input, .. } => Some(input),
            Popup::Confirm { .. } => None,
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Popup::CommitMessage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_with_blank_lines() {
        let mut input = TextInput::new();
        input.insert_str("first line");
        input.newline();
        input.newline();
        input.insert_str("third line");
        assert_eq!(input.text(), "first line\n\nthird line");
        assert_eq!(input.lines().len(), 3);
    }

    #[test]
    fn backspace_joins_lines() {
        let mut input = TextInput::with_text("ab\n");
        input.backspace();
        assert_eq!(input.text(), "ab");
        input.backspace();
        assert_eq!(input.text(), "a");
        input.backspace();
        input.backspace();
        assert_eq!(input.text(), "");
        assert!(input.is_blank());
    }

    #[test]
    fn amend_confirmation_text() {
        let popup = Popup::amend_confirmation("abc".into());
        assert_eq!(popup.title(), "Amend Commit");
        assert!(popup
            .body()
            .unwrap()
            .contains("Are you sure you want to amend this commit with your staged files?"));
        assert!(popup.input().is_none());
    }
}
