//! Configuration management for lazypanes
//!
//! Stores settings in ~/.config/lazypanes/config.toml. A missing file means
//! defaults; a file that exists but can't be read or parsed is fatal, since
//! silently falling back would hide the typo from the user.

use crate::context::ScreenMode;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub git: GitConfig,
    pub gui: GuiConfig,
    pub keybinding: KeybindingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Replace `:shortcode:` emoji in commit messages
    pub parse_emoji: bool,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// One of 'always', 'never', 'when-maximised'. Kept as a raw string so an
    /// unknown value is reported by [`ShowGraph::parse`] rather than by serde.
    pub show_graph: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            show_graph: "when-maximised".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuiConfig {
    /// Width of the side column, as a percentage of the screen
    pub side_panel_width: u16,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            side_panel_width: 33,
        }
    }
}

impl GuiConfig {
    pub fn side_panel_percent(&self) -> u16 {
        self.side_panel_width.clamp(10, 90)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeybindingConfig {
    pub universal: UniversalKeys,
    pub files: FilesKeys,
    pub branches: BranchesKeys,
    pub commits: CommitsKeys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniversalKeys {
    pub quit: String,
    #[serde(rename = "return")]
    pub return_: String,
    pub confirm: String,
    pub append_newline: String,
    pub prev_item: String,
    pub next_item: String,
    pub prev_item_alt: String,
    pub next_item_alt: String,
    pub prev_page: String,
    pub next_page: String,
    pub goto_top: String,
    pub goto_bottom: String,
    pub prev_block: String,
    pub next_block: String,
    pub prev_tab: String,
    pub next_tab: String,
    pub jump_to_block: Vec<String>,
    pub select: String,
    pub refresh: String,
    pub next_screen_mode: String,
    pub prev_screen_mode: String,
    pub options_menu: String,
    pub toggle_panel: String,
    pub scroll_up_main: String,
    pub scroll_down_main: String,
}

impl Default for UniversalKeys {
    fn default() -> Self {
        Self {
            quit: "q".into(),
            return_: "<esc>".into(),
            confirm: "<enter>".into(),
            append_newline: "<a-enter>".into(),
            prev_item: "<up>".into(),
            next_item: "<down>".into(),
            prev_item_alt: "k".into(),
            next_item_alt: "j".into(),
            prev_page: ",".into(),
            next_page: ".".into(),
            goto_top: "<".into(),
            goto_bottom: ">".into(),
            prev_block: "<left>".into(),
            next_block: "<right>".into(),
            prev_tab: "[".into(),
            next_tab: "]".into(),
            jump_to_block: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            select: "<space>".into(),
            refresh: "R".into(),
            next_screen_mode: "+".into(),
            prev_screen_mode: "_".into(),
            options_menu: "x".into(),
            toggle_panel: "<tab>".into(),
            scroll_up_main: "<pgup>".into(),
            scroll_down_main: "<pgdown>".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesKeys {
    pub commit_changes: String,
    pub toggle_staged_all: String,
}

impl Default for FilesKeys {
    fn default() -> Self {
        Self {
            commit_changes: "c".into(),
            toggle_staged_all: "a".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BranchesKeys {
    pub new_branch: String,
}

impl Default for BranchesKeys {
    fn default() -> Self {
        Self {
            new_branch: "n".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitsKeys {
    pub amend_to_commit: String,
}

impl Default for CommitsKeys {
    fn default() -> Self {
        Self {
            amend_to_commit: "A".into(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lazypanes"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load config from `explicit` if given, otherwise from the default
    /// location. Only the default location is allowed to be missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The defaults rendered as TOML, for `--print-default-config`
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// The configured graph policy; fails on an unknown value
    pub fn show_graph(&self) -> Result<ShowGraph, ConfigError> {
        ShowGraph::parse(&self.git.log.show_graph)
    }

    /// Get the config file location for display
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/lazypanes/config.toml".to_string())
    }
}

/// Whether commit lists draw a graph column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowGraph {
    Always,
    Never,
    WhenMaximised,
}

impl ShowGraph {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "always" => Ok(ShowGraph::Always),
            "never" => Ok(ShowGraph::Never),
            "when-maximised" => Ok(ShowGraph::WhenMaximised),
            other => Err(ConfigError::UnknownShowGraph {
                value: other.to_string(),
            }),
        }
    }

    pub fn should_show(self, screen_mode: ScreenMode) -> bool {
        match self {
            ShowGraph::Always => true,
            ShowGraph::Never => false,
            ShowGraph::WhenMaximised => screen_mode != ScreenMode::Normal,
        }
    }
}

/// True when `err` is a plain "file not found"
pub fn is_missing(err: &ConfigError) -> bool {
    matches!(err, ConfigError::Read { source, .. } if source.kind() == ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.git.parse_emoji);
        assert_eq!(config.git.log.show_graph, "when-maximised");
        assert_eq!(config.keybinding.files.commit_changes, "c");
    }

    #[test]
    fn show_graph_truth_table() {
        for mode in [ScreenMode::Normal, ScreenMode::Half, ScreenMode::Full] {
            assert!(ShowGraph::Always.should_show(mode));
            assert!(!ShowGraph::Never.should_show(mode));
        }
        assert!(!ShowGraph::WhenMaximised.should_show(ScreenMode::Normal));
        assert!(ShowGraph::WhenMaximised.should_show(ScreenMode::Half));
        assert!(ShowGraph::WhenMaximised.should_show(ScreenMode::Full));
    }

    #[test]
    fn unknown_show_graph_is_an_error() {
        assert!(matches!(
            ShowGraph::parse("when-maximized"),
            Err(ConfigError::UnknownShowGraph { .. })
        ));
        assert!(ShowGraph::parse("").is_err());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[git]\nparse_emoji = true\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.git.parse_emoji);
        assert_eq!(config.git.log.show_graph, "when-maximised");
        assert_eq!(config.gui.side_panel_width, 33);
    }

    #[test]
    fn show_graph_is_validated_on_use_not_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[git.log]\nshow_graph = \"sometimes\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.show_graph().is_err());
    }

    #[test]
    fn broken_file_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[git\nparse_emoji = ").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn misspelled_key_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[git.log]\nshowGraph = \"sometimes\"\n").unwrap();

        match Config::load(Some(&path)) {
            Err(ConfigError::Parse { source, .. }) => {
                assert!(source.to_string().contains("showGraph"), "{}", source)
            }
            other => panic!("expected a parse error, got {:?}", other),
        }

        fs::write(&path, "[keybinding.files]\ncommitChanges = \"C\"\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn explicit_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(is_missing(&err));
    }

    #[test]
    fn default_toml_round_trips() {
        let text = Config::default_toml();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn side_panel_width_is_clamped() {
        let gui = GuiConfig {
            side_panel_width: 120,
        };
        assert_eq!(gui.side_panel_percent(), 90);
    }
}
