//! Git operations backing the panels
//!
//! Reads go through [`loaders`], main view text through [`show`]. Mutations
//! live here and open the repository fresh for every call, so nothing holds
//! a `Repository` across frames.

pub mod loaders;
pub mod show;

use crate::model::{Model, COMMIT_PAGE_SIZE};
use anyhow::{anyhow, bail, Context, Result};
use git2::{build::CheckoutBuilder, IndexAddOption, Oid, Repository, Signature};
use std::path::{Path, PathBuf};

/// Handle on one repository's working tree
#[derive(Debug, Clone)]
pub struct GitCommands {
    repo_path: PathBuf,
}

impl GitCommands {
    /// Find the repository containing `path` (walking up like git does)
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Not a git repository: {}", path.display()))?;
        let repo_path = repo
            .workdir()
            .ok_or_else(|| anyhow!("Bare repositories are not supported"))?
            .to_path_buf();
        Ok(Self { repo_path })
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn repo(&self) -> Result<Repository> {
        Repository::open(&self.repo_path)
            .with_context(|| format!("Failed to open repository at {}", self.repo_path.display()))
    }

    /// Reload every collection. View-scoped state (which ref the sub-commits
    /// panel shows, how many commits are paged in) carries over from
    /// `previous`.
    pub fn load_model(&self, previous: &Model) -> Result<Model> {
        let mut repo = self.repo()?;
        let limit = previous.commit_limit.max(COMMIT_PAGE_SIZE);

        let remotes = loaders::load_remotes(&repo)?;
        let remote_branches = previous
            .remote_branches_remote
            .as_deref()
            .and_then(|name| remotes.iter().find(|r| r.name == name))
            .map(|r| r.branches.clone())
            .unwrap_or_default();

        let (sub_commits, sub_commits_ref) = match previous.sub_commits_ref.as_deref() {
            Some(rev) => match loaders::load_sub_commits(&repo, rev, limit) {
                Ok(commits) => (commits, Some(rev.to_string())),
                Err(e) => {
                    tracing::debug!("dropping sub-commits for {}: {:#}", rev, e);
                    (Vec::new(), None)
                }
            },
            None => (Vec::new(), None),
        };

        let (commit_files, commit_files_ref) = match previous.commit_files_ref.as_deref() {
            Some(sha) => match loaders::load_commit_files(&repo, sha) {
                Ok(files) => (files, Some(sha.to_string())),
                Err(e) => {
                    tracing::debug!("dropping commit files for {}: {:#}", sha, e);
                    (Vec::new(), None)
                }
            },
            None => (Vec::new(), None),
        };

        let mut model = Model {
            files: loaders::load_files(&repo)?,
            branches: loaders::load_branches(&repo)?,
            remote_branches,
            remotes,
            tags: loaders::load_tags(&repo)?,
            commits: loaders::load_commits(&repo, limit)?,
            reflog_commits: loaders::load_reflog(&repo, limit)?,
            sub_commits,
            commit_files,
            submodules: loaders::load_submodules(&repo)?,
            suggestions: previous.suggestions.clone(),
            menu_items: previous.menu_items.clone(),
            head_branch: loaders::head_branch_name(&repo),
            commit_limit: limit,
            sub_commits_ref,
            commit_files_ref,
            remote_branches_remote: previous.remote_branches_remote.clone(),
            generation: previous.generation,
            stash_entries: Vec::new(),
        };
        model.stash_entries = loaders::load_stash(&mut repo)?;
        model.bump_generation();

        tracing::debug!(
            files = model.files.len(),
            commits = model.commits.len(),
            branches = model.branches.len(),
            "model loaded"
        );
        Ok(model)
    }

    /// Page in another batch of commits if the list was cut off
    pub fn load_more_commits(&self, model: &mut Model) -> Result<bool> {
        if !model.commits_truncated() {
            return Ok(false);
        }
        let repo = self.repo()?;
        model.commit_limit += COMMIT_PAGE_SIZE;
        model.commits = loaders::load_commits(&repo, model.commit_limit)?;
        model.bump_generation();
        tracing::debug!(limit = model.commit_limit, "loaded more commits");
        Ok(true)
    }

    pub fn stage_file(&self, path: &str) -> Result<()> {
        let repo = self.repo()?;
        let mut index = repo.index()?;

        if self.repo_path.join(path).exists() {
            index.add_path(Path::new(path))?;
        } else {
            index.remove_path(Path::new(path))?;
        }
        index.write()?;

        tracing::info!("staged {}", path);
        Ok(())
    }

    pub fn unstage_file(&self, path: &str) -> Result<()> {
        let repo = self.repo()?;
        match repo.head().ok().and_then(|h| h.peel_to_commit().ok()) {
            Some(head) => {
                repo.reset_default(Some(head.as_object()), [path])?;
            }
            None => {
                let mut index = repo.index()?;
                index.remove_path(Path::new(path))?;
                index.write()?;
            }
        }

        tracing::info!("unstaged {}", path);
        Ok(())
    }

    /// Stage a file with unstaged changes, otherwise unstage it
    pub fn toggle_file(&self, path: &str, has_unstaged_changes: bool) -> Result<()> {
        if has_unstaged_changes {
            self.stage_file(path)
        } else {
            self.unstage_file(path)
        }
    }

    pub fn stage_all(&self) -> Result<()> {
        let repo = self.repo()?;
        let mut index = repo.index()?;

        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        // picks up deletions, which add_all skips
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        tracing::info!("staged all files");
        Ok(())
    }

    pub fn unstage_all(&self) -> Result<()> {
        let repo = self.repo()?;
        match repo.head().ok().and_then(|h| h.peel_to_commit().ok()) {
            Some(head) => {
                repo.reset(head.as_object(), git2::ResetType::Mixed, None)?;
            }
            None => {
                let mut index = repo.index()?;
                index.clear()?;
                index.write()?;
            }
        }

        tracing::info!("unstaged all files");
        Ok(())
    }

    /// Stage everything unless every change is already staged
    pub fn toggle_staged_all(&self, model: &Model) -> Result<()> {
        if model.files.iter().any(|f| f.has_unstaged_changes) {
            self.stage_all()
        } else {
            self.unstage_all()
        }
    }

    fn signature(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| "lazypanes".to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| "lazypanes@local".to_string());
        Ok(Signature::now(&name, &email)?)
    }

    /// Commit the index with `message` verbatim (blank lines included)
    pub fn commit(&self, message: &str) -> Result<Oid> {
        if message.trim().is_empty() {
            bail!("Commit message cannot be empty");
        }

        let repo = self.repo()?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let sig = Self::signature(&repo)?;

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .context("Failed to commit")?;

        tracing::info!("committed {}", oid);
        Ok(oid)
    }

    /// Fold the staged changes into `sha`, which must be HEAD.
    /// Parents and message are kept, so amending a merge stays a merge.
    pub fn amend_commit(&self, sha: &str) -> Result<Oid> {
        let repo = self.repo()?;
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .context("Nothing to amend: no commits yet")?;

        if head.id().to_string() != sha {
            bail!("Only the HEAD commit can be amended");
        }

        let mut index = repo.index()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let oid = head
            .amend(Some("HEAD"), None, None, None, None, Some(&tree))
            .context("Failed to amend commit")?;

        tracing::info!("amended {} -> {}", sha, oid);
        Ok(oid)
    }

    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let repo = self.repo()?;

        let (object, reference) = repo
            .revparse_ext(name)
            .with_context(|| format!("Branch '{}' not found", name))?;

        let mut opts = CheckoutBuilder::new();
        opts.safe();
        repo.checkout_tree(&object, Some(&mut opts))
            .with_context(|| format!("Cannot check out '{}'", name))?;

        match reference.as_ref().and_then(|r| r.name()) {
            Some(refname) => repo.set_head(refname)?,
            None => repo.set_head_detached(object.id())?,
        }

        tracing::info!("checked out {}", name);
        Ok(())
    }

    /// Create a branch at HEAD and check it out
    pub fn create_branch(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if !git2::Reference::is_valid_name(&format!("refs/heads/{}", name)) {
            bail!("'{}' is not a valid branch name", name);
        }

        let repo = self.repo()?;
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .context("Cannot create a branch before the first commit")?;
        repo.branch(name, &head, false)
            .with_context(|| format!("Failed to create branch '{}'", name))?;

        tracing::info!("created branch {}", name);
        self.checkout_branch(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo() -> (TempDir, GitCommands) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        let git = GitCommands::open(dir.path()).unwrap();
        (dir, git)
    }

    #[test]
    fn first_commit_on_unborn_branch() {
        let (dir, git) = repo();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();

        let model = git.load_model(&Model::default()).unwrap();
        assert_eq!(model.commit_count(), 0);
        assert_eq!(model.files.len(), 1);
        assert_eq!(model.files[0].short_status, "??");
        assert!(model.head_branch.is_some());

        git.stage_file("a.txt").unwrap();
        git.commit("first\n\nbody").unwrap();

        let model = git.load_model(&model).unwrap();
        assert_eq!(model.commit_count(), 1);
        assert_eq!(model.head_commit_message(), Some("first"));
        assert!(model.files.is_empty());
        assert_eq!(model.generation, 2);
    }

    #[test]
    fn toggle_staged_all_flips() {
        let (dir, git) = repo();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let model = git.load_model(&Model::default()).unwrap();
        git.toggle_staged_all(&model).unwrap();
        let model = git.load_model(&model).unwrap();
        assert!(model.files.iter().all(|f| f.has_staged_changes));

        git.toggle_staged_all(&model).unwrap();
        let model = git.load_model(&model).unwrap();
        assert!(model.files.iter().all(|f| !f.has_staged_changes));
    }

    #[test]
    fn empty_message_is_rejected() {
        let (_dir, git) = repo();
        assert!(git.commit("   \n").is_err());
    }

    #[test]
    fn amend_only_targets_head() {
        let (dir, git) = repo();
        fs::write(dir.path().join("a.txt"), "1").unwrap();
        git.stage_all().unwrap();
        let first = git.commit("one").unwrap();
        fs::write(dir.path().join("a.txt"), "2").unwrap();
        git.stage_all().unwrap();
        let second = git.commit("two").unwrap();

        fs::write(dir.path().join("b.txt"), "3").unwrap();
        git.stage_all().unwrap();
        assert!(git.amend_commit(&first.to_string()).is_err());

        git.amend_commit(&second.to_string()).unwrap();
        let model = git.load_model(&Model::default()).unwrap();
        assert_eq!(model.commit_count(), 2);
        assert_eq!(model.head_commit_message(), Some("two"));
        assert!(model.files.is_empty());
    }

    #[test]
    fn create_branch_validates_and_checks_out() {
        let (dir, git) = repo();
        fs::write(dir.path().join("a.txt"), "1").unwrap();
        git.stage_all().unwrap();
        git.commit("one").unwrap();

        assert!(git.create_branch("bad name..").is_err());
        git.create_branch("feature").unwrap();

        let model = git.load_model(&Model::default()).unwrap();
        assert_eq!(model.head_branch.as_deref(), Some("feature"));
        assert_eq!(model.branches[0].name, "feature");
        assert!(model.branches[0].is_head);
    }

    #[test]
    fn commit_files_ref_survives_reload() {
        let (dir, git) = repo();
        fs::write(dir.path().join("a.txt"), "1").unwrap();
        git.stage_all().unwrap();
        let oid = git.commit("one").unwrap();

        let previous = Model {
            commit_files_ref: Some(oid.to_string()),
            ..Model::default()
        };
        let model = git.load_model(&previous).unwrap();
        assert_eq!(model.commit_files.len(), 1);
        assert_eq!(model.commit_files[0].name, "a.txt");

        let previous = Model {
            commit_files_ref: Some("not-a-sha".into()),
            ..Model::default()
        };
        let model = git.load_model(&previous).unwrap();
        assert!(model.commit_files_ref.is_none());
    }

    #[test]
    fn unresolvable_sub_commits_ref_is_dropped() {
        let (dir, git) = repo();
        fs::write(dir.path().join("a.txt"), "1").unwrap();
        git.stage_all().unwrap();
        git.commit("one").unwrap();
        git.create_branch("feature").unwrap();

        let previous = Model {
            sub_commits_ref: Some("feature".into()),
            ..Model::default()
        };
        let model = git.load_model(&previous).unwrap();
        assert_eq!(model.sub_commits.len(), 1);
        assert_eq!(model.sub_commits_ref.as_deref(), Some("feature"));

        let previous = Model {
            sub_commits_ref: Some("deleted-branch".into()),
            ..Model::default()
        };
        let model = git.load_model(&previous).unwrap();
        assert!(model.sub_commits.is_empty());
        assert!(model.sub_commits_ref.is_none());
    }
}
