//! remove-glob: remove files and directories by path or glob pattern
//!
//! Paths are resolved first (explicit paths, or glob patterns with negation,
//! brace expansion and protective exclusions), then removed one by one.
//! Version-control and dependency directories are excluded from glob
//! matching unless the caller overrides the exclusion list.

pub mod cli;
pub mod config;
pub mod error;
pub mod init;
pub mod options;
pub mod pattern;
pub mod remover;
pub mod report;
pub mod resolver;

pub use error::{PathFailure, RemoveError};
pub use options::{RemoveOptions, DEFAULT_EXCLUDE};
pub use remover::{RemovalOutcome, Remover};
pub use report::{ConsoleReporter, MemoryReporter, Reporter, SilentReporter};
pub use resolver::{PathResolver, ResolvedPathSet};

/// Resolve and remove, printing progress to stdout
///
/// Returns true if at least one target existed.
pub fn remove(opts: &RemoveOptions) -> Result<bool, RemoveError> {
    remove_with(opts, &mut ConsoleReporter).map(|outcome| outcome.any_existed)
}

/// Resolve and remove, sending progress lines to `reporter`
pub fn remove_with(
    opts: &RemoveOptions,
    reporter: &mut dyn Reporter,
) -> Result<RemovalOutcome, RemoveError> {
    let resolved = PathResolver::resolve(opts)?;
    Remover::new(opts).apply(&resolved, reporter)
}

/// Callback flavour of [`remove_with`]
///
/// The callback runs exactly once, with the error if there was one.
/// Errors are only delivered through the callback, never returned;
/// the return value is false whenever the run failed.
pub fn remove_with_callback<F>(opts: &RemoveOptions, reporter: &mut dyn Reporter, callback: F) -> bool
where
    F: FnOnce(Option<&RemoveError>),
{
    match remove_with(opts, reporter) {
        Ok(outcome) => {
            callback(None);
            outcome.any_existed
        }
        Err(e) => {
            callback(Some(&e));
            false
        }
    }
}
