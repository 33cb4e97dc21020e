//! Reading repository state into [`crate::model`] types

use crate::model::{
    Branch, ChangeStatus, Commit, CommitFile, File, Remote, RemoteBranch, StashEntry, Submodule,
    Tag,
};
use anyhow::{Context, Result};
use git2::{BranchType, Delta, DiffDelta, Oid, Repository, Sort, StatusOptions};

/// Working tree files with pending changes, sorted by path
pub fn load_files(repo: &Repository) -> Result<Vec<File>> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true);
    opts.include_ignored(false);
    opts.include_unmodified(false);
    opts.recurse_untracked_dirs(true);
    opts.exclude_submodules(true);

    let statuses = repo.statuses(Some(&mut opts))?;
    let mut files = Vec::new();

    for entry in statuses.iter() {
        let Some(path) = entry.path() else { continue };
        let s = entry.status();

        let index_char = if s.is_index_new() {
            'A'
        } else if s.is_index_modified() {
            'M'
        } else if s.is_index_deleted() {
            'D'
        } else if s.is_index_renamed() {
            'R'
        } else if s.is_index_typechange() {
            'T'
        } else {
            ' '
        };
        let untracked = s.is_wt_new() && index_char == ' ';
        let wt_char = if s.is_conflicted() {
            'U'
        } else if s.is_wt_new() {
            '?'
        } else if s.is_wt_modified() {
            'M'
        } else if s.is_wt_deleted() {
            'D'
        } else if s.is_wt_renamed() {
            'R'
        } else if s.is_wt_typechange() {
            'T'
        } else {
            ' '
        };

        let short_status = if untracked {
            "??".to_string()
        } else {
            format!("{}{}", index_char, wt_char)
        };

        files.push(File {
            name: path.to_string(),
            short_status,
            has_staged_changes: index_char != ' ',
            has_unstaged_changes: wt_char != ' ',
            tracked: !untracked,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Name of the branch HEAD points at, even when it has no commits yet
pub fn head_branch_name(repo: &Repository) -> Option<String> {
    let head = repo.find_reference("HEAD").ok()?;
    let target = head.symbolic_target()?;
    target.strip_prefix("refs/heads/").map(str::to_string)
}

/// Local branches: HEAD first, then most recently committed to
pub fn load_branches(repo: &Repository) -> Result<Vec<Branch>> {
    let mut branches = Vec::new();

    for item in repo.branches(Some(BranchType::Local))? {
        let (branch, _) = item?;
        let Some(name) = branch.name()?.map(str::to_string) else {
            continue;
        };

        let tip_time = branch
            .get()
            .peel_to_commit()
            .map(|c| c.time().seconds())
            .unwrap_or(0);

        let (upstream, ahead, behind) = match branch.upstream() {
            Ok(up) => {
                let up_name = up.name().ok().flatten().map(str::to_string);
                match (branch.get().target(), up.get().target()) {
                    (Some(local), Some(remote)) => {
                        let (ahead, behind) =
                            repo.graph_ahead_behind(local, remote).unwrap_or((0, 0));
                        (up_name, ahead, behind)
                    }
                    _ => (up_name, 0, 0),
                }
            }
            Err(_) => (None, 0, 0),
        };

        branches.push(Branch {
            is_head: branch.is_head(),
            name,
            upstream,
            ahead,
            behind,
            tip_time,
        });
    }

    // an unborn branch has no ref yet but is still where the next commit goes
    if let Some(head) = head_branch_name(repo) {
        if !branches.iter().any(|b| b.name == head) {
            branches.push(Branch {
                name: head,
                is_head: true,
                ..Default::default()
            });
        }
    }

    branches.sort_by(|a, b| {
        b.is_head
            .cmp(&a.is_head)
            .then(b.tip_time.cmp(&a.tip_time))
            .then(a.name.cmp(&b.name))
    });
    Ok(branches)
}

/// Remotes with their branches (without `HEAD`)
pub fn load_remotes(repo: &Repository) -> Result<Vec<Remote>> {
    let names: Vec<String> = repo
        .remotes()?
        .iter()
        .flatten()
        .map(str::to_string)
        .collect();

    let mut remote_branches: Vec<RemoteBranch> = Vec::new();
    for item in repo.branches(Some(BranchType::Remote))? {
        let (branch, _) = item?;
        let Some(full) = branch.name()? else { continue };
        if let Some((remote, name)) = split_remote_branch(&names, full) {
            if name != "HEAD" {
                remote_branches.push(RemoteBranch::new(remote, name));
            }
        }
    }

    let mut remotes = Vec::new();
    for name in &names {
        let remote = repo
            .find_remote(name)
            .with_context(|| format!("Failed to read remote '{}'", name))?;

        let mut urls: Vec<String> = remote.url().map(str::to_string).into_iter().collect();
        if let Some(push) = remote.pushurl() {
            if !urls.iter().any(|u| u == push) {
                urls.push(push.to_string());
            }
        }

        let mut branches: Vec<RemoteBranch> = remote_branches
            .iter()
            .filter(|b| &b.remote_name == name)
            .cloned()
            .collect();
        branches.sort_by(|a, b| a.name.cmp(&b.name));

        remotes.push(Remote {
            name: name.clone(),
            urls,
            branches,
        });
    }

    Ok(remotes)
}

/// Split `origin/feature/x` into remote and branch. Remote names may contain
/// `/`, so the longest configured remote that prefixes `full` wins.
fn split_remote_branch<'a>(remotes: &[String], full: &'a str) -> Option<(&'a str, &'a str)> {
    remotes
        .iter()
        .filter(|remote| {
            full.len() > remote.len()
                && full.starts_with(remote.as_str())
                && full.as_bytes()[remote.len()] == b'/'
        })
        .max_by_key(|remote| remote.len())
        .map(|remote| (&full[..remote.len()], &full[remote.len() + 1..]))
}

/// Tags, newest name first
pub fn load_tags(repo: &Repository) -> Result<Vec<Tag>> {
    let names = repo.tag_names(None)?;
    let mut tags = Vec::new();

    for name in names.iter().flatten() {
        let Ok(reference) = repo.find_reference(&format!("refs/tags/{}", name)) else {
            continue;
        };
        let target = reference
            .peel_to_commit()
            .map(|c| c.id().to_string())
            .unwrap_or_default();
        let message = reference
            .peel_to_tag()
            .ok()
            .and_then(|t| t.message().map(|m| m.trim().to_string()));

        tags.push(Tag {
            name: name.to_string(),
            target,
            message,
        });
    }

    tags.sort_by(|a, b| b.name.cmp(&a.name));
    Ok(tags)
}

pub fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    let author = commit.author();
    Commit {
        sha: commit.id().to_string(),
        name: commit.summary().unwrap_or_default().to_string(),
        message: commit.message().unwrap_or_default().to_string(),
        author_name: author.name().unwrap_or_default().to_string(),
        author_email: author.email().unwrap_or_default().to_string(),
        unix_timestamp: commit.time().seconds(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
    }
}

/// Up to `limit` commits reachable from `start`, newest first
pub fn load_commits_from(repo: &Repository, start: Oid, limit: usize) -> Result<Vec<Commit>> {
    let mut walk = repo.revwalk()?;
    walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    walk.push(start)?;

    let mut commits = Vec::new();
    for oid in walk.take(limit) {
        let commit = repo.find_commit(oid?)?;
        commits.push(to_commit(&commit));
    }
    Ok(commits)
}

/// Commits reachable from HEAD; empty for a repository with no commits
pub fn load_commits(repo: &Repository, limit: usize) -> Result<Vec<Commit>> {
    match repo.head().ok().and_then(|h| h.target()) {
        Some(head) => load_commits_from(repo, head, limit),
        None => Ok(Vec::new()),
    }
}

/// History of any revision (branch, remote branch, sha)
pub fn load_sub_commits(repo: &Repository, rev: &str, limit: usize) -> Result<Vec<Commit>> {
    let commit = repo
        .revparse_single(rev)
        .and_then(|o| o.peel_to_commit())
        .with_context(|| format!("Failed to resolve '{}'", rev))?;
    load_commits_from(repo, commit.id(), limit)
}

/// HEAD's reflog, most recent first
pub fn load_reflog(repo: &Repository, limit: usize) -> Result<Vec<Commit>> {
    let Ok(reflog) = repo.reflog("HEAD") else {
        return Ok(Vec::new());
    };

    Ok(reflog
        .iter()
        .take(limit)
        .map(|entry| {
            let committer = entry.committer();
            let message = entry.message().unwrap_or_default().to_string();
            Commit {
                sha: entry.id_new().to_string(),
                name: message.clone(),
                message,
                author_name: committer.name().unwrap_or_default().to_string(),
                author_email: committer.email().unwrap_or_default().to_string(),
                unix_timestamp: committer.when().seconds(),
                parents: Vec::new(),
            }
        })
        .collect())
}

pub fn load_stash(repo: &mut Repository) -> Result<Vec<StashEntry>> {
    let mut entries = Vec::new();
    repo.stash_foreach(|index, message, _oid| {
        entries.push(StashEntry::new(index, message));
        true
    })?;
    Ok(entries)
}

pub fn load_submodules(repo: &Repository) -> Result<Vec<Submodule>> {
    Ok(repo
        .submodules()?
        .iter()
        .map(|s| Submodule {
            name: s.name().unwrap_or_default().to_string(),
            path: s.path().display().to_string(),
            url: s.url().unwrap_or_default().to_string(),
        })
        .collect())
}

pub(crate) fn delta_path(delta: &DiffDelta<'_>) -> Option<String> {
    delta
        .new_file()
        .path()
        .or_else(|| delta.old_file().path())
        .map(|p| p.display().to_string())
}

/// Files touched by a commit, relative to its first parent
pub fn load_commit_files(repo: &Repository, sha: &str) -> Result<Vec<CommitFile>> {
    let oid = Oid::from_str(sha).with_context(|| format!("Invalid commit id '{}'", sha))?;
    let commit = repo.find_commit(oid)?;
    let tree = commit.tree()?;
    let parent_tree = match commit.parents().next() {
        Some(parent) => Some(parent.tree()?),
        None => None,
    };

    let mut diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    diff.find_similar(None)?;

    Ok(diff
        .deltas()
        .filter_map(|delta| {
            let status = match delta.status() {
                Delta::Added => ChangeStatus::Added,
                Delta::Modified => ChangeStatus::Modified,
                Delta::Deleted => ChangeStatus::Deleted,
                Delta::Renamed => ChangeStatus::Renamed,
                _ => ChangeStatus::Other,
            };
            delta_path(&delta).map(|name| CommitFile { name, status })
        })
        .collect())
}
