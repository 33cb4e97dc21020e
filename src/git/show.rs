//! Text for the main view: patches, `git show`-style commit output, logs

use crate::git::loaders::delta_path;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::{Diff, DiffDelta, DiffFormat, DiffHunk, DiffLine, DiffOptions, Oid, Repository};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

/// Render a diff as unified patch text
pub fn patch_text(diff: &Diff<'_>) -> Result<String> {
    let mut out = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if matches!(line.origin(), '+' | '-' | ' ') {
            out.push(line.origin());
        }
        out.push_str(&String::from_utf8_lossy(line.content()));
        true
    })?;
    Ok(out)
}

fn format_time(time: git2::Time) -> String {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .or_else(|| FixedOffset::east_opt(0));
    offset
        .and_then(|offset| {
            DateTime::from_timestamp(time.seconds(), 0)
                .map(|dt| dt.with_timezone(&offset).format("%a %b %e %H:%M:%S %Y %z").to_string())
        })
        .unwrap_or_default()
}

fn find_commit<'r>(repo: &'r Repository, sha: &str) -> Result<git2::Commit<'r>> {
    let oid = Oid::from_str(sha).with_context(|| format!("Invalid commit id '{}'", sha))?;
    repo.find_commit(oid)
        .with_context(|| format!("Commit {} not found", sha))
}

/// Header, indented message and patch, the way `git show` prints a commit.
/// Merge commits get a condensed combined diff against all parents.
pub fn commit_show(repo: &Repository, sha: &str) -> Result<String> {
    let commit = find_commit(repo, sha)?;
    commit_show_text(repo, &commit)
}

fn commit_show_text(repo: &Repository, commit: &git2::Commit<'_>) -> Result<String> {
    let mut out = format!("commit {}\n", commit.id());

    if commit.parent_count() > 1 {
        let parents: Vec<String> = commit
            .parent_ids()
            .map(|id| id.to_string()[..7].to_string())
            .collect();
        out.push_str(&format!("Merge: {}\n", parents.join(" ")));
    }

    let author = commit.author();
    out.push_str(&format!(
        "Author: {} <{}>\n",
        author.name().unwrap_or_default(),
        author.email().unwrap_or_default()
    ));
    out.push_str(&format!("Date:   {}\n\n", format_time(author.when())));

    for line in commit.message().unwrap_or_default().trim_end().lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    if commit.parent_count() > 1 {
        out.push_str(&combined_diff(repo, commit)?);
    } else {
        let tree = commit.tree()?;
        let parent_tree = match commit.parents().next() {
            Some(parent) => Some(parent.tree()?),
            None => None,
        };
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        out.push_str(&patch_text(&diff)?);
    }

    Ok(out)
}

/// Lines of each changed file that are new relative to at least one
/// parent, prefixed with one `+`/` ` column per parent. Only paths that
/// differ from every parent are shown, so `++` marks content that came
/// from neither side of the merge.
fn combined_diff(repo: &Repository, commit: &git2::Commit<'_>) -> Result<String> {
    let tree = commit.tree()?;
    let mut per_parent: Vec<HashMap<String, HashSet<u32>>> = Vec::new();

    for parent in commit.parents() {
        let parent_tree = parent.tree()?;
        let diff = repo.diff_tree_to_tree(Some(&parent_tree), Some(&tree), None)?;

        let mut added: HashMap<String, HashSet<u32>> = HashMap::new();
        for delta in diff.deltas() {
            if let Some(path) = delta_path(&delta) {
                added.entry(path).or_default();
            }
        }
        diff.foreach(
            &mut |_delta: DiffDelta<'_>, _progress: f32| true,
            None,
            None,
            Some(&mut |delta: DiffDelta<'_>, _hunk: Option<DiffHunk<'_>>, line: DiffLine<'_>| {
                if line.origin() == '+' {
                    if let (Some(path), Some(n)) = (delta_path(&delta), line.new_lineno()) {
                        added.entry(path).or_default().insert(n);
                    }
                }
                true
            }),
        )?;
        per_parent.push(added);
    }

    let Some((first, rest)) = per_parent.split_first() else {
        return Ok(String::new());
    };
    let paths: BTreeSet<&String> = first
        .keys()
        .filter(|path| rest.iter().all(|m| m.contains_key(*path)))
        .collect();

    let mut out = String::new();
    for path in paths {
        out.push_str(&format!("diff --cc {}\n", path));

        let blob = tree
            .get_path(Path::new(path))
            .ok()
            .and_then(|entry| entry.to_object(repo).ok())
            .and_then(|object| object.peel_to_blob().ok());
        let Some(blob) = blob else {
            out.push_str("deleted file\n");
            continue;
        };

        let content = String::from_utf8_lossy(blob.content());
        for (i, line) in content.lines().enumerate() {
            let n = (i + 1) as u32;
            let markers: String = per_parent
                .iter()
                .map(|m| {
                    if m.get(path).is_some_and(|lines| lines.contains(&n)) {
                        '+'
                    } else {
                        ' '
                    }
                })
                .collect();
            if markers.contains('+') {
                out.push_str(&markers);
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

/// Patch of one file within a commit
pub fn commit_file_diff(repo: &Repository, sha: &str, path: &str) -> Result<String> {
    let commit = find_commit(repo, sha)?;
    let tree = commit.tree()?;
    let parent_tree = match commit.parents().next() {
        Some(parent) => Some(parent.tree()?),
        None => None,
    };

    let mut opts = DiffOptions::new();
    opts.pathspec(path);
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;
    patch_text(&diff)
}

/// Unstaged then staged changes of one working tree file
pub fn file_diff(repo: &Repository, path: &str, tracked: bool) -> Result<String> {
    let mut out = String::new();

    let mut opts = DiffOptions::new();
    opts.pathspec(path);
    opts.include_untracked(true);
    opts.show_untracked_content(true);
    opts.recurse_untracked_dirs(true);
    let unstaged = patch_text(&repo.diff_index_to_workdir(None, Some(&mut opts))?)?;

    if !tracked && unstaged.is_empty() {
        // untracked files inside untracked dirs are reported as the dir
        let content = std::fs::read_to_string(repo.workdir().unwrap_or(Path::new(".")).join(path))
            .unwrap_or_default();
        for line in content.lines() {
            out.push('+');
            out.push_str(line);
            out.push('\n');
        }
        return Ok(out);
    }

    let head_tree = repo.head().ok().and_then(|h| h.peel_to_tree().ok());
    let mut opts = DiffOptions::new();
    opts.pathspec(path);
    let staged = patch_text(&repo.diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))?)?;

    if !unstaged.is_empty() {
        out.push_str(&unstaged);
    }
    if !staged.is_empty() {
        if !out.is_empty() {
            out.push_str("\n--- Staged changes ---\n\n");
        }
        out.push_str(&staged);
    }
    Ok(out)
}

/// One line per commit: short sha and summary
pub fn log_text(commits: &[crate::model::Commit]) -> String {
    commits
        .iter()
        .map(|c| {
            let marker = if c.is_merge() { '⏣' } else { '◯' };
            format!("{} {} {}", marker, c.short_sha(), c.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The stash commit's changes against the commit it was made on
pub fn stash_show(repo: &Repository, stash_ref: &str) -> Result<String> {
    let commit = repo
        .revparse_single(stash_ref)
        .and_then(|o| o.peel_to_commit())
        .with_context(|| format!("Failed to resolve '{}'", stash_ref))?;
    let tree = commit.tree()?;
    let parent_tree = match commit.parents().next() {
        Some(parent) => Some(parent.tree()?),
        None => None,
    };
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    patch_text(&diff)
}

/// Annotation (if any) followed by the tagged commit
pub fn tag_show(repo: &Repository, name: &str) -> Result<String> {
    let reference = repo
        .find_reference(&format!("refs/tags/{}", name))
        .with_context(|| format!("Tag '{}' not found", name))?;

    let mut out = String::new();
    if let Ok(tag) = reference.peel_to_tag() {
        out.push_str(&format!("tag {}\n", name));
        if let Some(tagger) = tag.tagger() {
            out.push_str(&format!(
                "Tagger: {} <{}>\n",
                tagger.name().unwrap_or_default(),
                tagger.email().unwrap_or_default()
            ));
        }
        out.push_str(&format!("\n{}\n\n", tag.message().unwrap_or_default().trim()));
    }

    let commit = reference.peel_to_commit()?;
    out.push_str(&commit_show_text(repo, &commit)?);
    Ok(out)
}
