//! Normalized removal options
//!
//! `RemoveOptions` is the single configuration record the core works with.
//! Callers that hold a bare string, a list, or nothing at all convert through
//! the constructors here, so nothing downstream branches on input shape.

use crate::error::RemoveError;
use std::path::PathBuf;

/// Exclusion patterns applied to glob matching when none are supplied.
pub const DEFAULT_EXCLUDE: [&str; 4] = [
    "**/.git/**",
    "**/.git",
    "**/node_modules/**",
    "**/node_modules",
];

/// Options for a single removal run
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    /// Literal file or directory paths (mutually exclusive with `glob`)
    pub paths: Vec<String>,
    /// Glob patterns, possibly negated with a leading `!`
    pub glob: Option<Vec<String>>,
    /// Base directory for relative paths and glob matching
    pub cwd: Option<PathBuf>,
    /// Report what would be removed without removing anything
    pub dry_run: bool,
    /// Log each entry before removing it
    pub verbose: bool,
    /// Print the item count and duration when done
    pub stat: bool,
    /// Exclusion patterns. `None` means the protective default set,
    /// `Some(vec![])` disables exclusion entirely.
    pub exclude: Option<Vec<String>>,
    /// Let wildcards match dotfiles
    pub include_dotfiles: bool,
    /// Retry budget for transient directory removal failures.
    /// `None` uses the platform default.
    pub max_retries: Option<u32>,
}

/// Where the paths to remove come from
#[derive(Debug, Clone, PartialEq)]
pub enum PathSource<'a> {
    Explicit(&'a [String]),
    Glob(&'a [String]),
}

impl RemoveOptions {
    /// Options targeting literal paths
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: Self::non_empty(paths),
            ..Default::default()
        }
    }

    /// Options targeting glob patterns
    pub fn with_glob<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            glob: Some(patterns.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths = Self::non_empty(paths);
        self
    }

    pub fn glob<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.glob = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    pub fn stat(mut self, enabled: bool) -> Self {
        self.stat = enabled;
        self
    }

    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn include_dotfiles(mut self, enabled: bool) -> Self {
        self.include_dotfiles = enabled;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Validate the paths/glob combination without touching the filesystem
    pub fn source(&self) -> Result<PathSource<'_>, RemoveError> {
        let has_explicit = !self.paths.is_empty();
        match (has_explicit, &self.glob) {
            (false, None) => Err(RemoveError::MissingInput),
            (true, Some(_)) => Err(RemoveError::MutuallyExclusive),
            (true, None) => Ok(PathSource::Explicit(&self.paths)),
            (false, Some(patterns)) => Ok(PathSource::Glob(patterns)),
        }
    }

    /// Exclusion patterns in effect for glob matching
    pub fn effective_exclude(&self) -> Vec<String> {
        match &self.exclude {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_EXCLUDE.iter().map(|p| p.to_string()).collect(),
        }
    }

    // 空文字列のパスは無視する
    fn non_empty<I, S>(paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        paths
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect()
    }
}
