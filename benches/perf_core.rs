use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazypanes::app::{Action, Gui};
use lazypanes::config::Config;
use lazypanes::context::{ContextKey, RenderScope, ScreenMode};
use lazypanes::contexts;
use lazypanes::model::{Commit, Model};
use lazypanes::ui;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn synthetic_model(commit_count: usize) -> Model {
    let mut model = Model::default();
    model.commits = (0..commit_count)
        .map(|i| Commit {
            sha: format!("{:040x}", i + 1),
            name: format!("feat: change number {} :sparkles:", i),
            message: format!("feat: change number {}", i),
            author_name: "Jane Doe".to_string(),
            author_email: "jane@example.com".to_string(),
            unix_timestamp: 1_700_000_000 - i as i64,
            parents: vec![format!("{:040x}", i + 2)],
        })
        .collect();
    model.commit_limit = commit_count;
    model
}

fn bench_commit_window(c: &mut Criterion) {
    let model = synthetic_model(50_000);
    let registry = contexts::build_registry(&Config::default()).expect("registry");
    let context = registry.get(ContextKey::BRANCH_COMMITS).expect("commits context");

    for (name, mode) in [
        ("commit_window_normal", ScreenMode::Normal),
        ("commit_window_full", ScreenMode::Full),
    ] {
        let scope = RenderScope {
            model: &model,
            screen_mode: mode,
            current: ContextKey::BRANCH_COMMITS,
        };
        c.bench_function(name, |b| {
            b.iter(|| black_box(context.display_rows(&scope, black_box(25_000), 50)));
        });
    }
}

fn bench_render_frame(c: &mut Criterion) {
    let temp = tempfile::tempdir().expect("tempdir");
    let repo = git2::Repository::init(temp.path()).expect("git init");
    let sig = git2::Signature::now("Bench", "bench@example.com").expect("signature");
    let tree = {
        let mut index = repo.index().expect("index");
        repo.find_tree(index.write_tree().expect("tree")).expect("find tree")
    };
    let mut parent: Option<git2::Oid> = None;
    for i in 0..500 {
        let parents: Vec<git2::Commit> = parent
            .and_then(|id| repo.find_commit(id).ok())
            .into_iter()
            .collect();
        let refs: Vec<&git2::Commit> = parents.iter().collect();
        parent = Some(
            repo.commit(Some("HEAD"), &sig, &sig, &format!("commit {i}"), &tree, &refs)
                .expect("commit"),
        );
    }

    let mut gui = Gui::new(Config::default(), temp.path()).expect("gui");
    gui.run_action(Action::JumpToWindow(2)).expect("focus commits");

    let backend = TestBackend::new(140, 42);
    let mut terminal = Terminal::new(backend).expect("terminal should initialize");

    c.bench_function("render_frame_scrolling", |b| {
        b.iter(|| {
            gui.run_action(Action::CursorDown).expect("cursor down");
            terminal
                .draw(|frame| ui::render(frame, &mut gui))
                .expect("draw should succeed");
        });
    });
}

criterion_group!(perf_core, bench_commit_window, bench_render_frame);
criterion_main!(perf_core);
