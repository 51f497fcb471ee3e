//! Path resolution for remove-glob
//!
//! Turns `RemoveOptions` into the ordered, deduplicated list of paths the
//! remover acts on. Explicit paths pass through untouched; glob patterns
//! are matched against the filesystem with exclusions pruned during the walk.

use crate::error::RemoveError;
use crate::options::{PathSource, RemoveOptions};
use crate::pattern::{CompiledGlob, ExcludeSet, PatternSet};
use path_clean::PathClean;
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Ordered, deduplicated paths for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPathSet {
    paths: Vec<PathBuf>,
    /// Explicit paths are rebased against cwd only when removed
    explicit: bool,
}

impl ResolvedPathSet {
    fn new(paths: Vec<PathBuf>, explicit: bool) -> Self {
        let mut seen = HashSet::new();
        let paths = paths
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        Self { paths, explicit }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl<'a> IntoIterator for &'a ResolvedPathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// One filesystem match: dedup key plus the path to act on
#[derive(Debug, Clone)]
struct Match {
    key: String,
    path: PathBuf,
}

/// パスリゾルバ
pub struct PathResolver;

impl PathResolver {
    /// Resolve options into the paths to remove
    ///
    /// # Returns
    /// * `Ok(ResolvedPathSet)` - order-stable, deduplicated paths
    /// * `Err(RemoveError)` - invalid paths/glob combination, bad pattern or cwd
    pub fn resolve(opts: &RemoveOptions) -> Result<ResolvedPathSet, RemoveError> {
        match opts.source()? {
            PathSource::Explicit(paths) => Ok(ResolvedPathSet::new(
                paths.iter().map(PathBuf::from).collect(),
                true,
            )),
            PathSource::Glob(patterns) => Self::resolve_glob(opts, patterns),
        }
    }

    fn resolve_glob(
        opts: &RemoveOptions,
        patterns: &[String],
    ) -> Result<ResolvedPathSet, RemoveError> {
        let patterns = PatternSet::compile(patterns, opts.include_dotfiles)?;
        let exclude = ExcludeSet::compile(&opts.effective_exclude())?;

        let cwd = match &opts.cwd {
            Some(dir) => {
                let absolute = to_absolute(dir)?;
                if !absolute.is_dir() {
                    return Err(RemoveError::InvalidCwd(dir.clone()));
                }
                Some(absolute)
            }
            None => None,
        };
        let root = cwd.clone().unwrap_or_else(|| PathBuf::from("."));

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for glob in &patterns.positive {
            let matches = Self::match_glob(&root, glob, &exclude);
            debug!(
                event = "resolver.pattern_matched",
                pattern = glob.as_str(),
                count = matches.len()
            );
            for m in matches {
                if seen.insert(m.key.clone()) {
                    candidates.push(m);
                }
            }
        }

        // 否定パターンに一致したものを除外
        let mut negated = HashSet::new();
        for glob in &patterns.negated {
            negated.extend(Self::match_glob(&root, glob, &exclude).into_iter().map(|m| m.key));
        }
        if !negated.is_empty() {
            candidates.retain(|m| !negated.contains(&m.key));
        }

        let paths = candidates
            .into_iter()
            .map(|m| rebase(cwd.as_deref(), &m.path))
            .collect();

        Ok(ResolvedPathSet::new(paths, false))
    }

    /// Match one compiled glob below `root`
    fn match_glob(root: &Path, glob: &CompiledGlob, exclude: &ExcludeSet) -> Vec<Match> {
        let base = glob.base();

        if prefix_excluded(glob.prefix(), exclude) {
            debug!(
                event = "resolver.prefix_excluded",
                pattern = glob.as_str()
            );
            return Vec::new();
        }

        if glob.is_literal() {
            let key = glob.prefix().to_string();
            if root.join(&base).symlink_metadata().is_ok() {
                return vec![Match { key, path: base }];
            }
            return Vec::new();
        }

        let walk_root = if glob.prefix().is_empty() {
            root.to_path_buf()
        } else {
            root.join(&base)
        };
        let mut walker = WalkDir::new(&walk_root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();
        if let Some(depth) = glob.max_depth() {
            walker = walker.max_depth(depth);
        }

        let mut matches = Vec::new();
        let entries = walker.into_iter().filter_entry(|entry| {
            match relative_key(&walk_root, entry.path()) {
                Some(rel) => !exclude.is_excluded(&glob.key_for(&rel)),
                None => {
                    debug!(
                        event = "resolver.non_utf8_skipped",
                        pattern = glob.as_str(),
                        path = %entry.path().display()
                    );
                    false
                }
            }
        });

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log_walk_error(glob, &e);
                    continue;
                }
            };
            let Some(rel) = relative_key(&walk_root, entry.path()) else {
                continue;
            };
            let key = glob.key_for(&rel);
            if glob.matches(&key) {
                let path = match entry.path().strip_prefix(&walk_root) {
                    Ok(relative) => base.join(relative),
                    Err(_) => entry.path().to_path_buf(),
                };
                matches.push(Match { key, path });
            }
        }
        matches
    }
}

/// `/` 区切りの相対キーを作成（UTF-8 でない名前は None）
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

/// True if the literal prefix itself, or any directory above it, is excluded
fn prefix_excluded(prefix: &str, exclude: &ExcludeSet) -> bool {
    if prefix.is_empty() || exclude.is_empty() {
        return false;
    }
    let mut key = String::with_capacity(prefix.len());
    if prefix.starts_with('/') {
        key.push('/');
    }
    for part in prefix.split('/').filter(|p| !p.is_empty()) {
        if !key.is_empty() && !key.ends_with('/') {
            key.push('/');
        }
        key.push_str(part);
        if exclude.is_excluded(&key) {
            return true;
        }
    }
    false
}

fn log_walk_error(glob: &CompiledGlob, err: &walkdir::Error) {
    let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
    match err.io_error().map(io::Error::kind) {
        Some(io::ErrorKind::NotFound) => debug!(
            event = "resolver.walk_root_missing",
            pattern = glob.as_str(),
            path = %path
        ),
        _ => warn!(
            event = "resolver.walk_error",
            pattern = glob.as_str(),
            path = %path,
            error = %err
        ),
    }
}

/// 相対パスをプロセスのカレントディレクトリ基準の絶対パスに変換
pub fn to_absolute(path: &Path) -> Result<PathBuf, RemoveError> {
    if path.is_absolute() {
        Ok(path.clean())
    } else {
        Ok(std::env::current_dir()?.join(path).clean())
    }
}

/// Rebase a match against cwd, or keep it process-relative without one
pub fn rebase(cwd: Option<&Path>, path: &Path) -> PathBuf {
    match cwd {
        Some(dir) => dir.join(path).clean(),
        None => path.clean(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "hello").unwrap();
        path
    }

    fn resolve_in(root: &Path, patterns: &[&str]) -> Vec<PathBuf> {
        let opts = RemoveOptions::with_glob(patterns.iter().copied()).cwd(root);
        PathResolver::resolve(&opts).unwrap().as_slice().to_vec()
    }

    fn names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_explicit_paths_pass_through_unchanged() {
        let opts = RemoveOptions::with_paths(["./tests/foo.txt", "bar"]).cwd("/somewhere");
        let resolved = PathResolver::resolve(&opts).unwrap();
        assert!(resolved.is_explicit());
        assert_eq!(
            resolved.as_slice(),
            [PathBuf::from("./tests/foo.txt"), PathBuf::from("bar")]
        );
    }

    #[test]
    fn test_explicit_paths_dedup_by_string() {
        let opts = RemoveOptions::with_paths(["a", "a", "./a"]);
        let resolved = PathResolver::resolve(&opts).unwrap();
        assert_eq!(resolved.as_slice(), [PathBuf::from("a"), PathBuf::from("./a")]);
    }

    #[test]
    fn test_config_errors_before_filesystem() {
        let err = PathResolver::resolve(&RemoveOptions::default()).unwrap_err();
        assert!(matches!(err, RemoveError::MissingInput));

        let opts = RemoveOptions::with_paths(["file1.txt"]).glob(["dist/**"]);
        let err = PathResolver::resolve(&opts).unwrap_err();
        assert!(matches!(err, RemoveError::MutuallyExclusive));
    }

    #[test]
    fn test_glob_union_and_negation() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        for name in ["a.js", "b.spec.js", "c.test.js", "d.js"] {
            touch(&root, &format!("dir/{}", name));
        }

        let paths = resolve_in(&root, &["dir/*.js", "!dir/*.spec.js", "!dir/*.test.js"]);
        assert_eq!(names(&root, &paths), vec!["dir/a.js", "dir/d.js"]);
    }

    #[test]
    fn test_brace_expansion() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        for name in ["foo1.txt", "bar2.txt", "baz3.txt"] {
            touch(&root, &format!("dir/{}", name));
        }

        let paths = resolve_in(&root, &["dir/{foo,bar}*.txt"]);
        assert_eq!(names(&root, &paths), vec!["dir/foo1.txt", "dir/bar2.txt"]);
    }

    #[test]
    fn test_only_negated_patterns_yield_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "dir/a.js");

        assert!(resolve_in(&root, &["!dir/*.js"]).is_empty());
    }

    #[test]
    fn test_empty_pattern_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "a.txt");

        assert!(resolve_in(&root, &[""]).is_empty());
    }

    #[test]
    fn test_default_exclusion_protects_vcs_and_dependencies() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "tests/keep/file.txt");
        touch(&root, "tests/node_modules/pkg/index.js");
        touch(&root, "tests/.git/HEAD");

        let opts = RemoveOptions::with_glob(["tests/**/*"])
            .cwd(&root)
            .include_dotfiles(true);
        let resolved = PathResolver::resolve(&opts).unwrap();
        let found = names(&root, resolved.as_slice());

        assert_eq!(found, vec!["tests/keep", "tests/keep/file.txt"]);
    }

    #[test]
    fn test_empty_exclusion_disables_protection() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "tests/node_modules/pkg/index.js");

        let opts = RemoveOptions::with_glob(["tests/**/*"])
            .cwd(&root)
            .exclude(Vec::<String>::new());
        let resolved = PathResolver::resolve(&opts).unwrap();
        let found = names(&root, resolved.as_slice());

        assert!(found.contains(&"tests/node_modules".to_string()));
        assert!(found.contains(&"tests/node_modules/pkg/index.js".to_string()));
    }

    #[test]
    fn test_custom_exclusion_replaces_defaults() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "out/node_modules/x.js");
        touch(&root, "out/keep/y.js");

        let opts = RemoveOptions::with_glob(["out/**/*.js"])
            .cwd(&root)
            .exclude(["**/keep/**"]);
        let resolved = PathResolver::resolve(&opts).unwrap();

        assert_eq!(
            names(&root, resolved.as_slice()),
            vec!["out/node_modules/x.js"]
        );
    }

    #[test]
    fn test_exclusion_applies_to_literal_prefix() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "vendor/sub/a.js");
        touch(&root, "src/b.js");

        let patterns = [
            "*/sub/a.js",
            "vendor/*/a.js",
            "vendor/sub/*.js",
            "vendor/sub/a.js",
            "vendor",
        ];
        for pattern in patterns {
            let opts = RemoveOptions::with_glob([pattern])
                .cwd(&root)
                .exclude(["**/vendor"]);
            let resolved = PathResolver::resolve(&opts).unwrap();
            assert!(resolved.is_empty(), "{} should be excluded", pattern);
        }

        let opts = RemoveOptions::with_glob(["src/*.js"])
            .cwd(&root)
            .exclude(["**/vendor"]);
        assert_eq!(PathResolver::resolve(&opts).unwrap().len(), 1);
    }

    #[test]
    fn test_prefix_excluded_checks_every_ancestor() {
        let exclude = ExcludeSet::compile(&["**/vendor".to_string()]).unwrap();
        assert!(prefix_excluded("vendor", &exclude));
        assert!(prefix_excluded("vendor/sub", &exclude));
        assert!(prefix_excluded("lib/vendor/sub", &exclude));
        assert!(!prefix_excluded("src/vendored", &exclude));
        assert!(!prefix_excluded("", &exclude));
        assert!(!prefix_excluded("vendor", &ExcludeSet::default()));
    }

    #[test]
    fn test_dotfiles_hidden_unless_requested() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "visible.txt");
        touch(&root, ".hidden.txt");

        assert_eq!(names(&root, &resolve_in(&root, &["*.txt"])), vec!["visible.txt"]);

        let opts = RemoveOptions::with_glob(["*.txt"])
            .cwd(&root)
            .include_dotfiles(true);
        let resolved = PathResolver::resolve(&opts).unwrap();
        assert_eq!(
            names(&root, resolved.as_slice()),
            vec![".hidden.txt", "visible.txt"]
        );
    }

    #[test]
    fn test_recursive_suffix_matches_directory_itself() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "tests/foo/bar.txt");

        let paths = resolve_in(&root, &["./tests/foo/**"]);
        assert_eq!(names(&root, &paths), vec!["tests/foo", "tests/foo/bar.txt"]);
    }

    #[test]
    fn test_literal_pattern_matches_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("tests/foo")).unwrap();

        let paths = resolve_in(&root, &["./tests/foo"]);
        assert_eq!(paths, vec![root.join("tests").join("foo")]);
        assert!(resolve_in(&root, &["./tests/404.txt"]).is_empty());
    }

    #[test]
    fn test_union_dedups_in_first_match_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "b.txt");
        touch(&root, "a.txt");
        touch(&root, "c.md");

        let paths = resolve_in(&root, &["c.md", "*.txt", "a.txt"]);
        assert_eq!(names(&root, &paths), vec!["c.md", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_globstar_reaches_nested_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "tests/foo.txt");
        touch(&root, "tests/bar.txt");

        let paths = resolve_in(&root, &["**/foo.txt"]);
        assert_eq!(names(&root, &paths), vec!["tests/foo.txt"]);
    }

    #[test]
    fn test_glob_results_are_absolute_with_cwd() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "hello.txt");

        let paths = resolve_in(&root, &["hello.txt"]);
        assert_eq!(paths, vec![root.join("hello.txt")]);
        assert!(paths[0].is_absolute());
    }

    #[test]
    fn test_invalid_cwd() {
        let opts = RemoveOptions::with_glob(["*"]).cwd("/definitely/not/here");
        let err = PathResolver::resolve(&opts).unwrap_err();
        assert!(matches!(err, RemoveError::InvalidCwd(_)));
    }

    #[test]
    fn test_rebase() {
        assert_eq!(
            rebase(Some(Path::new("/project")), Path::new("src/../a.txt")),
            PathBuf::from("/project/a.txt")
        );
        assert_eq!(rebase(None, Path::new("tests/foo")), PathBuf::from("tests/foo"));
        assert_eq!(
            rebase(Some(Path::new("/project")), Path::new("/abs/file")),
            PathBuf::from("/abs/file")
        );
    }

    #[test]
    fn test_to_absolute_relative() {
        let result = to_absolute(Path::new("some/dir")).unwrap();
        assert!(result.is_absolute());
        assert!(result.ends_with("some/dir"));
    }

    #[test]
    fn test_relative_key() {
        let root = Path::new("/r");
        assert_eq!(
            relative_key(root, Path::new("/r/a/b.txt")),
            Some("a/b.txt".to_string())
        );
        assert_eq!(relative_key(root, Path::new("/other")), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_entries_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        touch(&root, "ok.txt");
        fs::write(root.join(OsStr::from_bytes(b"bad\xff.txt")), "x").unwrap();

        assert_eq!(names(&root, &resolve_in(&root, &["*.txt"])), vec!["ok.txt"]);
    }
}
