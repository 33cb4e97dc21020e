//! Backing models for the list panels
//!
//! Plain data, loaded by [`crate::git`] ahead of rendering. Contexts only
//! read from here; actions and hooks mutate it.

use crate::app::actions::Action;

/// Anything a panel can report as its current selection.
pub trait ListItem {
    /// Stable identifier (sha, ref name, path)
    fn id(&self) -> &str;
    /// Human readable one-liner
    fn description(&self) -> String;
}

/// A file in the working tree with pending changes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    pub name: String,
    /// Two-column porcelain status, e.g. `"M "`, `" M"`, `"??"`
    pub short_status: String,
    pub has_staged_changes: bool,
    pub has_unstaged_changes: bool,
    pub tracked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_head: bool,
    pub upstream: Option<String>,
    pub ahead: usize,
    pub behind: usize,
    /// Commit time of the tip, used for ordering
    pub tip_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote_name: String,
    pub name: String,
    full_name: String,
}

impl RemoteBranch {
    pub fn new(remote_name: &str, name: &str) -> Self {
        Self {
            remote_name: remote_name.to_string(),
            name: name.to_string(),
            full_name: format!("{}/{}", remote_name, name),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub urls: Vec<String>,
    pub branches: Vec<RemoteBranch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub target: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    /// First line of the message
    pub name: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub unix_timestamp: i64,
    pub parents: Vec<String>,
}

impl Commit {
    pub fn short_sha(&self) -> &str {
        &self.sha[..self.sha.len().min(8)]
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Author initials, for the maximised commit list
    pub fn author_initials(&self) -> String {
        self.author_name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StashEntry {
    pub index: usize,
    pub name: String,
    ref_name: String,
}

impl StashEntry {
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            ref_name: format!("stash@{{{}}}", index),
        }
    }

    pub fn ref_name(&self) -> &str {
        &self.ref_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Other,
}

impl ChangeStatus {
    pub fn letter(self) -> char {
        match self {
            ChangeStatus::Added => 'A',
            ChangeStatus::Modified => 'M',
            ChangeStatus::Deleted => 'D',
            ChangeStatus::Renamed => 'R',
            ChangeStatus::Other => '?',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFile {
    pub name: String,
    pub status: ChangeStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submodule {
    pub name: String,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestion {
    /// Text inserted into the prompt when picked
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub key_hint: String,
    pub action: Action,
}

impl ListItem for File {
    fn id(&self) -> &str {
        &self.name
    }
    fn description(&self) -> String {
        format!("{} {}", self.short_status, self.name)
    }
}

impl ListItem for Branch {
    fn id(&self) -> &str {
        &self.name
    }
    fn description(&self) -> String {
        self.name.clone()
    }
}

impl ListItem for Remote {
    fn id(&self) -> &str {
        &self.name
    }
    fn description(&self) -> String {
        self.name.clone()
    }
}

impl ListItem for RemoteBranch {
    fn id(&self) -> &str {
        &self.full_name
    }
    fn description(&self) -> String {
        self.full_name.clone()
    }
}

impl ListItem for Tag {
    fn id(&self) -> &str {
        &self.name
    }
    fn description(&self) -> String {
        self.message.clone().unwrap_or_else(|| self.name.clone())
    }
}

impl ListItem for Commit {
    fn id(&self) -> &str {
        &self.sha
    }
    fn description(&self) -> String {
        format!("{} {}", self.short_sha(), self.name)
    }
}

impl ListItem for StashEntry {
    fn id(&self) -> &str {
        &self.ref_name
    }
    fn description(&self) -> String {
        format!("{}: {}", self.ref_name, self.name)
    }
}

impl ListItem for CommitFile {
    fn id(&self) -> &str {
        &self.name
    }
    fn description(&self) -> String {
        self.name.clone()
    }
}

impl ListItem for Submodule {
    fn id(&self) -> &str {
        &self.name
    }
    fn description(&self) -> String {
        self.name.clone()
    }
}

impl ListItem for Suggestion {
    fn id(&self) -> &str {
        &self.value
    }
    fn description(&self) -> String {
        self.label.clone()
    }
}

impl ListItem for MenuItem {
    fn id(&self) -> &str {
        &self.label
    }
    fn description(&self) -> String {
        self.label.clone()
    }
}

/// How many commits to load at a time
pub const COMMIT_PAGE_SIZE: usize = 300;

/// Everything the panels read from.
#[derive(Debug, Clone)]
pub struct Model {
    pub files: Vec<File>,
    pub branches: Vec<Branch>,
    pub remotes: Vec<Remote>,
    /// Branches of the remote that was entered from the remotes panel
    pub remote_branches: Vec<RemoteBranch>,
    pub tags: Vec<Tag>,
    pub commits: Vec<Commit>,
    pub reflog_commits: Vec<Commit>,
    pub sub_commits: Vec<Commit>,
    pub stash_entries: Vec<StashEntry>,
    pub commit_files: Vec<CommitFile>,
    pub submodules: Vec<Submodule>,
    pub suggestions: Vec<Suggestion>,
    pub menu_items: Vec<MenuItem>,

    /// Name of the checked out branch, if any
    pub head_branch: Option<String>,
    /// Upper bound on `commits.len()`; grows as the user scrolls
    pub commit_limit: usize,
    /// Ref whose history `sub_commits` holds
    pub sub_commits_ref: Option<String>,
    /// Commit whose files `commit_files` holds
    pub commit_files_ref: Option<String>,
    /// Remote whose branches `remote_branches` holds
    pub remote_branches_remote: Option<String>,
    /// Bumped on every reload so render caches know to refetch
    pub generation: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            branches: Vec::new(),
            remotes: Vec::new(),
            remote_branches: Vec::new(),
            tags: Vec::new(),
            commits: Vec::new(),
            reflog_commits: Vec::new(),
            sub_commits: Vec::new(),
            stash_entries: Vec::new(),
            commit_files: Vec::new(),
            submodules: Vec::new(),
            suggestions: Vec::new(),
            menu_items: Vec::new(),
            head_branch: None,
            commit_limit: COMMIT_PAGE_SIZE,
            sub_commits_ref: None,
            commit_files_ref: None,
            remote_branches_remote: None,
            generation: 0,
        }
    }
}

impl Model {
    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn head_commit(&self) -> Option<&Commit> {
        self.commits.first()
    }

    /// First line of HEAD's message
    pub fn head_commit_message(&self) -> Option<&str> {
        self.head_commit().map(|c| c.name.as_str())
    }

    pub fn has_staged_files(&self) -> bool {
        self.files.iter().any(|f| f.has_staged_changes)
    }

    /// True when more commits may exist past the loaded page
    pub fn commits_truncated(&self) -> bool {
        self.commits.len() >= self.commit_limit
    }

    pub fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
