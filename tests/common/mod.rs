//! Throwaway repositories for driving the UI end to end

#![allow(dead_code)]

use git2::build::CheckoutBuilder;
use git2::{IndexAddOption, Oid, Repository, Signature};
use lazypanes::app::Gui;
use lazypanes::config::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("git init");
        {
            let mut config = repo.config().expect("repo config");
            config.set_str("user.name", "CI").expect("user.name");
            config.set_str("user.email", "ci@example.com").expect("user.email");
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn gui(&self) -> Gui {
        Gui::new(Config::default(), self.path()).expect("gui should start")
    }

    pub fn create_file(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).expect("write file");
    }

    pub fn create_file_and_add(&self, name: &str, content: &str) {
        self.create_file(name, content);
        let mut index = self.repo.index().expect("index");
        index.add_path(Path::new(name)).expect("add path");
        index.write().expect("write index");
    }

    fn signature(&self) -> Signature<'static> {
        Signature::now("CI", "ci@example.com").expect("signature")
    }

    /// Stage everything and commit on HEAD
    pub fn commit_all(&self, message: &str) -> Oid {
        let mut index = self.repo.index().expect("index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("add all");
        index.write().expect("write index");
        let tree = self
            .repo
            .find_tree(index.write_tree().expect("write tree"))
            .expect("find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let sig = self.signature();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("commit")
    }

    /// Point HEAD at `branch`, creating it from HEAD when it doesn't exist.
    /// Works before the first commit too.
    pub fn new_branch(&self, branch: &str) {
        if let Ok(head) = self.repo.head().and_then(|h| h.peel_to_commit()) {
            self.repo.branch(branch, &head, false).expect("create branch");
        }
        self.checkout(branch);
    }

    pub fn checkout(&self, branch: &str) {
        let refname = format!("refs/heads/{}", branch);
        if let Ok(commit) = self
            .repo
            .find_reference(&refname)
            .and_then(|r| r.peel_to_commit())
        {
            self.repo
                .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().force()))
                .expect("checkout");
        }
        self.repo.set_head(&refname).expect("set head");
    }

    /// `git merge --no-ff branch` for histories that merge cleanly
    pub fn merge_no_ff(&self, branch: &str) -> Oid {
        let ours = self.repo.head().and_then(|h| h.peel_to_commit()).expect("head");
        let theirs = self
            .repo
            .find_branch(branch, git2::BranchType::Local)
            .and_then(|b| b.get().peel_to_commit())
            .expect("branch");
        let mut merged = self
            .repo
            .merge_commits(&ours, &theirs, None)
            .expect("merge");
        assert!(!merged.has_conflicts());
        let tree = self
            .repo
            .find_tree(merged.write_tree_to(&self.repo).expect("write tree"))
            .expect("find tree");

        let current = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.shorthand().map(str::to_string))
            .unwrap_or_default();
        let message = format!("Merge branch '{}' into {}", branch, current);
        let sig = self.signature();
        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, &message, &tree, &[&ours, &theirs])
            .expect("merge commit");
        self.repo
            .checkout_head(Some(CheckoutBuilder::new().force()))
            .expect("checkout merge");
        oid
    }

    pub fn head_message(&self) -> String {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .ok()
            .and_then(|c| c.message().map(str::to_string))
            .unwrap_or_default()
    }
}
