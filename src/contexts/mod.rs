//! The concrete panels and their wiring into a [`ContextRegistry`]

/// `base`/`base_mut` for a context struct with a `base: BaseContext` field
macro_rules! base_accessors {
    () => {
        fn base(&self) -> &$crate::context::BaseContext {
            &self.base
        }

        fn base_mut(&mut self) -> &mut $crate::context::BaseContext {
            &mut self.base
        }
    };
}

pub mod branches;
pub mod commits;
pub mod files;
pub mod popups;
pub mod stash;

use crate::config::Config;
use crate::context::{ContextKey, ContextRegistry, ListContext};
use anyhow::Result;

pub use branches::{LocalBranchesContext, RemoteBranchesContext, RemotesContext, TagsContext};
pub use commits::{
    BranchCommitsContext, CommitDisplay, CommitFilesContext, ReflogCommitsContext,
    SubCommitsContext,
};
pub use files::{FilesContext, SubmodulesContext};
pub use popups::{MenuContext, SuggestionsContext};
pub use stash::StashContext;

/// Build every context in registry order.
///
/// Reads `git.log.show_graph` here, so an unrecognised value stops startup
/// instead of surfacing on the first render.
pub fn build_registry(config: &Config) -> Result<ContextRegistry> {
    let display = CommitDisplay {
        show_graph: config.show_graph()?,
        parse_emoji: config.git.parse_emoji,
    };

    let contexts: Vec<Box<dyn ListContext>> = vec![
        Box::new(MenuContext::new()),
        Box::new(FilesContext::new()),
        Box::new(LocalBranchesContext::new()),
        Box::new(RemotesContext::new()),
        Box::new(RemoteBranchesContext::new()),
        Box::new(TagsContext::new()),
        Box::new(BranchCommitsContext::new(display)),
        Box::new(ReflogCommitsContext::new(display)),
        Box::new(SubCommitsContext::new(display)),
        Box::new(StashContext::new()),
        Box::new(CommitFilesContext::new()),
        Box::new(SubmodulesContext::new()),
        Box::new(SuggestionsContext::new()),
    ];

    let registry = ContextRegistry::new(contexts)?;
    registry.ensure_complete(&ContextKey::ALL)?;
    tracing::debug!(contexts = registry.len(), "context registry ready");
    Ok(registry)
}

/// Where "return" goes from a context that was entered from another one
pub fn parent_of(key: ContextKey) -> Option<ContextKey> {
    match key {
        ContextKey::REMOTE_BRANCHES => Some(ContextKey::REMOTES),
        ContextKey::SUB_COMMITS => Some(ContextKey::LOCAL_BRANCHES),
        ContextKey::COMMIT_FILES => Some(ContextKey::BRANCH_COMMITS),
        _ => None,
    }
}
