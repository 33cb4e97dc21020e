//! Typed setup errors
//!
//! Both of these abort startup. Anything that can go wrong while the UI is
//! running goes through `anyhow` and ends up in the footer instead.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Unknown value for git.log.show_graph: {value}. Expected one of: 'always', 'never', 'when-maximised'"
    )]
    UnknownShowGraph { value: String },

    #[error("Invalid key binding for {action}: '{value}'")]
    InvalidKeybinding { action: String, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A wiring bug in the set of registered list contexts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate context key: {0}")]
    DuplicateKey(String),

    #[error("missing context for key: {0}")]
    MissingKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_graph_error_lists_the_options() {
        let err = ConfigError::UnknownShowGraph {
            value: "sometimes".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sometimes"));
        assert!(msg.contains("'when-maximised'"));
    }

    #[test]
    fn registry_errors_name_the_key() {
        assert_eq!(
            RegistryError::DuplicateKey("files".into()).to_string(),
            "duplicate context key: files"
        );
        assert!(RegistryError::MissingKey("stash".into())
            .to_string()
            .contains("stash"));
    }
}
