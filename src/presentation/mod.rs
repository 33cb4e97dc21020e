//! Turning model items into styled rows

pub mod emoji;

use crate::context::Row;
use crate::model::{
    Branch, Commit, CommitFile, File, MenuItem, Remote, RemoteBranch, StashEntry, Submodule,
    Suggestion, Tag,
};
use crate::ui::theme::Theme;
use crate::util::{pad_right, truncate};
use ratatui::text::Span;

/// Status columns coloured by where the change lives: index green,
/// working tree red.
pub fn file_row(file: &File) -> Row {
    let mut chars = file.short_status.chars();
    let first = chars.next().unwrap_or(' ');
    let second = chars.next().unwrap_or(' ');

    let mut row = if !file.tracked {
        vec![Span::styled(file.short_status.clone(), Theme::unstaged())]
    } else {
        vec![
            Span::styled(first.to_string(), Theme::staged()),
            Span::styled(second.to_string(), Theme::unstaged()),
        ]
    };

    let name_style = if file.has_unstaged_changes {
        Theme::unstaged()
    } else {
        Theme::staged()
    };
    row.push(Span::raw(" "));
    row.push(Span::styled(file.name.clone(), name_style));
    row
}

pub fn branch_row(branch: &Branch) -> Row {
    let marker = if branch.is_head {
        Theme::HEAD_MARKER
    } else {
        ' '
    };
    let mut row = vec![
        Span::styled(format!("{} ", marker), Theme::staged()),
        Span::styled(branch.name.clone(), Theme::text()),
    ];

    if branch.upstream.is_some() {
        if branch.ahead == 0 && branch.behind == 0 {
            row.push(Span::styled(" ✓", Theme::staged()));
        } else {
            row.push(Span::styled(
                format!(
                    " {}{}{}{}",
                    Theme::ARROW_UP,
                    branch.ahead,
                    Theme::ARROW_DOWN,
                    branch.behind
                ),
                Theme::sha(),
            ));
        }
    }
    row
}

pub fn remote_row(remote: &Remote) -> Row {
    vec![
        Span::styled(remote.name.clone(), Theme::text()),
        Span::styled(format!(" {}", remote.branches.len()), Theme::text_muted()),
    ]
}

pub fn remote_branch_row(branch: &RemoteBranch) -> Row {
    vec![Span::styled(branch.full_name().to_string(), Theme::text())]
}

/// Longest annotation summary shown next to a tag name
const TAG_MESSAGE_WIDTH: usize = 50;

pub fn tag_row(tag: &Tag) -> Row {
    let mut row = vec![Span::styled(tag.name.clone(), Theme::text())];
    if let Some(summary) = tag.message.as_deref().and_then(|m| m.lines().next()) {
        row.push(Span::styled(
            format!(" {}", truncate(summary, TAG_MESSAGE_WIDTH)),
            Theme::text_muted(),
        ));
    }
    row
}

/// Which optional columns a commit row carries
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitColumns {
    pub graph: bool,
    pub author: bool,
    pub parse_emoji: bool,
    /// Highlight the sha as the selected commit
    pub highlighted: bool,
}

pub fn commit_row(commit: &Commit, columns: CommitColumns) -> Row {
    let sha_style = if columns.highlighted {
        Theme::sha_selected()
    } else {
        Theme::sha()
    };
    let mut row = vec![Span::styled(commit.short_sha().to_string(), sha_style)];

    if columns.graph {
        let marker = if commit.is_merge() {
            Theme::GRAPH_MERGE
        } else {
            Theme::GRAPH_COMMIT
        };
        row.push(Span::styled(format!(" {}", marker), Theme::graph()));
    }

    if columns.author {
        row.push(Span::styled(
            format!(" {}", pad_right(&commit.author_initials(), 2)),
            Theme::author(),
        ));
    }

    let summary = if columns.parse_emoji {
        emoji::emojify(&commit.name)
    } else {
        commit.name.clone()
    };
    row.push(Span::raw(" "));
    row.push(Span::styled(summary, Theme::text()));
    row
}

pub fn reflog_row(commit: &Commit, parse_emoji: bool) -> Row {
    let message = if parse_emoji {
        emoji::emojify(&commit.name)
    } else {
        commit.name.clone()
    };
    vec![
        Span::styled(commit.short_sha().to_string(), Theme::sha()),
        Span::raw(" "),
        Span::styled(message, Theme::text()),
    ]
}

pub fn stash_row(entry: &StashEntry) -> Row {
    vec![
        Span::styled(format!("{}: ", entry.ref_name()), Theme::text_muted()),
        Span::styled(entry.name.clone(), Theme::text()),
    ]
}

pub fn commit_file_row(file: &CommitFile) -> Row {
    let style = match file.status {
        crate::model::ChangeStatus::Deleted => Theme::unstaged(),
        crate::model::ChangeStatus::Added => Theme::staged(),
        _ => Theme::sha(),
    };
    vec![
        Span::styled(file.status.letter().to_string(), style),
        Span::raw(" "),
        Span::styled(file.name.clone(), Theme::text()),
    ]
}

pub fn submodule_row(submodule: &Submodule) -> Row {
    vec![Span::styled(submodule.name.clone(), Theme::text())]
}

pub fn suggestion_row(suggestion: &Suggestion) -> Row {
    vec![Span::styled(suggestion.label.clone(), Theme::text())]
}

pub fn menu_row(item: &MenuItem) -> Row {
    vec![
        Span::styled(pad_right(&item.key_hint, 10), Theme::key()),
        Span::styled(item.label.clone(), Theme::text()),
    ]
}

/// Plain text of a row, for tests and logging
pub fn row_text(row: &Row) -> String {
    row.iter().map(|span| span.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_row_splits_status_colours() {
        let file = File {
            name: "src/main.rs".into(),
            short_status: "MM".into(),
            has_staged_changes: true,
            has_unstaged_changes: true,
            tracked: true,
        };
        let row = file_row(&file);
        assert_eq!(row_text(&row), "MM src/main.rs");
        assert_eq!(row[0].style, Theme::staged());
        assert_eq!(row[1].style, Theme::unstaged());
    }

    #[test]
    fn untracked_file_row() {
        let file = File {
            name: "new.txt".into(),
            short_status: "??".into(),
            has_unstaged_changes: true,
            ..Default::default()
        };
        assert_eq!(row_text(&file_row(&file)), "?? new.txt");
    }

    #[test]
    fn branch_row_shows_head_and_divergence() {
        let branch = Branch {
            name: "main".into(),
            is_head: true,
            upstream: Some("origin/main".into()),
            ahead: 2,
            behind: 1,
            tip_time: 0,
        };
        assert_eq!(row_text(&branch_row(&branch)), "* main ↑2↓1");

        let plain = Branch {
            name: "topic".into(),
            ..Default::default()
        };
        assert_eq!(row_text(&branch_row(&plain)), "  topic");
    }

    #[test]
    fn commit_row_columns() {
        let commit = Commit {
            sha: "0123456789abcdef".into(),
            name: ":sparkles: add thing".into(),
            author_name: "Jane Doe".into(),
            parents: vec!["a".into(), "b".into()],
            ..Default::default()
        };

        let bare = commit_row(&commit, CommitColumns::default());
        assert_eq!(row_text(&bare), "01234567 :sparkles: add thing");

        let full = commit_row(
            &commit,
            CommitColumns {
                graph: true,
                author: true,
                parse_emoji: true,
                highlighted: true,
            },
        );
        assert_eq!(row_text(&full), "01234567 ⏣ JD ✨ add thing");
        assert_eq!(full[0].style, Theme::sha_selected());
    }

    #[test]
    fn tag_row_truncates_annotation() {
        let tag = Tag {
            name: "v1.0.0".into(),
            target: "abc".into(),
            message: Some(format!("{}\n\nbody", "x".repeat(80))),
        };
        let text = row_text(&tag_row(&tag));
        assert!(text.starts_with("v1.0.0 xxx"));
        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), "v1.0.0 ".len() + TAG_MESSAGE_WIDTH);

        let light = Tag {
            message: None,
            ..tag
        };
        assert_eq!(row_text(&tag_row(&light)), "v1.0.0");
    }
}
