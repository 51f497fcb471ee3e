//! Removal of resolved paths
//!
//! Each path is checked and removed on its own. Missing paths are skipped,
//! failures are collected and reported once the whole batch has run.

use crate::error::{PathFailure, RemoveError};
use crate::options::RemoveOptions;
use crate::report::Reporter;
use crate::resolver::{rebase, ResolvedPathSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Delay unit between directory removal retries (multiplied by the attempt number)
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Retries for busy directories; only Windows locks files aggressively enough to need them
pub const DEFAULT_MAX_RETRIES: u32 = if cfg!(windows) { 10 } else { 0 };

/// What a path points at when it is about to be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Inspect a path without following symlinks, `None` if it does not exist
    pub fn of(path: &Path) -> Option<Self> {
        let metadata = fs::symlink_metadata(path).ok()?;
        if metadata.is_dir() {
            Some(Self::Directory)
        } else {
            Some(Self::File)
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Summary of one removal pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovalOutcome {
    /// Paths that existed and were (or would be) removed
    pub items_processed: usize,
    /// True if at least one resolved path existed
    pub any_existed: bool,
    pub elapsed: Duration,
}

/// ファイル削除の実行器
pub struct Remover<'a> {
    opts: &'a RemoveOptions,
    max_retries: u32,
}

impl<'a> Remover<'a> {
    pub fn new(opts: &'a RemoveOptions) -> Self {
        Self {
            opts,
            max_retries: opts.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        }
    }

    /// Remove (or preview removing) every path in the set
    ///
    /// # Returns
    /// * `Ok(RemovalOutcome)` - every existing path was handled
    /// * `Err(RemoveError::PartialFailure)` - some paths could not be removed,
    ///   the rest were still processed
    pub fn apply(
        &self,
        paths: &ResolvedPathSet,
        reporter: &mut dyn Reporter,
    ) -> Result<RemovalOutcome, RemoveError> {
        let started = Instant::now();
        let mut outcome = RemovalOutcome::default();
        let mut failures = Vec::new();

        if self.opts.dry_run {
            reporter.line("-- dry-run --");
        }

        for path in paths {
            let target = self.target_path(path, paths.is_explicit());

            let Some(kind) = EntryKind::of(&target) else {
                debug!(event = "remover.path_missing", path = %target.display());
                continue;
            };
            outcome.any_existed = true;
            outcome.items_processed += 1;

            if self.opts.dry_run {
                reporter.line(&format!("would remove {}: {}", kind, path.display()));
                continue;
            }

            if self.opts.verbose {
                reporter.line(&format!("removing {}: {}", kind, path.display()));
            }

            if let Err(error) = self.remove_entry(&target, kind) {
                warn!(
                    event = "remover.remove_failed",
                    path = %target.display(),
                    error = %error
                );
                failures.push(PathFailure {
                    path: target,
                    error,
                });
            }
        }

        outcome.elapsed = started.elapsed();

        if self.opts.stat || self.opts.verbose {
            reporter.line(&format!("Removed:  {} items", paths.len()));
            reporter.line(&format!("Duration: {}", format_duration(outcome.elapsed)));
        }

        if self.opts.dry_run {
            reporter.line("-- end --");
        }

        if failures.is_empty() {
            Ok(outcome)
        } else {
            Err(RemoveError::PartialFailure {
                removed: outcome.items_processed - failures.len(),
                failures,
            })
        }
    }

    /// Explicit paths are rebased through cwd here, glob matches already are
    fn target_path(&self, path: &Path, explicit: bool) -> PathBuf {
        match (&self.opts.cwd, explicit) {
            (Some(cwd), true) => rebase(Some(cwd), path),
            _ => path.to_path_buf(),
        }
    }

    fn remove_entry(&self, path: &Path, kind: EntryKind) -> io::Result<()> {
        match kind {
            EntryKind::Directory => self.remove_dir_with_retry(path),
            EntryKind::File => ignore_not_found(fs::remove_file(path)),
        }
    }

    fn remove_dir_with_retry(&self, path: &Path) -> io::Result<()> {
        retry_transient(path, self.max_retries, RETRY_DELAY, || {
            ignore_not_found(fs::remove_dir_all(path))
        })
    }
}

/// Run `op` until it succeeds, fails permanently or `max_retries` is spent
///
/// Sleeps `delay` × attempt between tries.
fn retry_transient<F>(path: &Path, max_retries: u32, delay: Duration, mut op: F) -> io::Result<()>
where
    F: FnMut() -> io::Result<()>,
{
    let mut attempt = 0;
    loop {
        match op() {
            Ok(()) => return Ok(()),
            Err(e) if attempt < max_retries && is_transient(&e) => {
                attempt += 1;
                debug!(
                    event = "remover.retry",
                    path = %path.display(),
                    attempt,
                    error = %e
                );
                thread::sleep(delay * attempt);
            }
            Err(e) => return Err(e),
        }
    }
}

/// 削除中に他プロセスが先に消した場合は成功扱い
fn ignore_not_found(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Errors worth retrying on platforms that lock files in use
fn is_transient(err: &io::Error) -> bool {
    match err.kind() {
        io::ErrorKind::ResourceBusy | io::ErrorKind::DirectoryNotEmpty => true,
        io::ErrorKind::PermissionDenied => cfg!(windows),
        _ => false,
    }
}

fn format_duration(elapsed: Duration) -> String {
    format!("{:.3}ms", elapsed.as_secs_f64() * 1000.0)
}
