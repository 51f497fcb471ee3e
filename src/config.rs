//! Configuration for remove-glob
//!
//! Loads user configuration from `~/.config/remove-glob/config.toml`.
//! Values only fill in what the command line left unset.

use crate::options::RemoveOptions;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration structure
///
/// Example config.toml:
/// ```toml
/// # Replace the built-in protective exclusions
/// exclude = ["**/.git/**", "**/.git", "**/target/**", "**/target"]
///
/// # Let wildcards match dotfiles
/// all = false
///
/// # Always print the summary line
/// stat = false
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Exclusion patterns used when `--exclude` is not given.
    /// A single string is accepted as well as a list.
    #[serde(default)]
    pub exclude: Option<OneOrMany>,

    /// Include dotfiles in glob matches
    #[serde(default)]
    pub all: bool,

    /// Print item count and duration after every run
    #[serde(default)]
    pub stat: bool,
}

/// A string or a list of strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Boolean flags set explicitly on the command line
///
/// `None` leaves the value to the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    pub all: Option<bool>,
    pub stat: Option<bool>,
}

impl Config {
    /// Get the config file path: ~/.config/remove-glob/config.toml
    ///
    /// If REMOVE_GLOB_CONFIG environment variable is set, uses that path instead.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("REMOVE_GLOB_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|d| d.join(".config").join("remove-glob").join("config.toml"))
    }

    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::config_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "remove: warning: config parse error ({}): {}",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!(
                    "remove: warning: cannot read config ({}): {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Exclusion patterns from the file, normalized to a list
    pub fn exclude_patterns(&self) -> Option<Vec<String>> {
        self.exclude.clone().map(Vec::from)
    }

    /// Fill options the command line did not set
    pub fn apply_defaults(&self, opts: &mut RemoveOptions, overrides: FlagOverrides) {
        if opts.exclude.is_none() {
            opts.exclude = self.exclude_patterns();
        }
        opts.include_dotfiles = overrides.all.unwrap_or(self.all);
        opts.stat = overrides.stat.unwrap_or(self.stat);
    }
}
