//! Glob pattern preparation for remove-glob
//!
//! Patterns are normalized before they reach the `glob` crate:
//! `!` negation is split off, brace groups are expanded into separate
//! patterns, leading `./` is dropped and `dir/**` also yields `dir`.
//! Each compiled pattern remembers its literal directory prefix so that
//! matching only walks the part of the tree it can actually match.

use crate::error::RemoveError;
use glob::{MatchOptions, Pattern};
use std::path::PathBuf;

/// Characters that make a path component a wildcard
const MAGIC_CHARS: [char; 3] = ['*', '?', '['];

/// A single compiled glob, ready to be matched against cwd-relative paths
#[derive(Debug, Clone)]
pub struct CompiledGlob {
    /// Normalized pattern text (braces expanded, `./` removed)
    source: String,
    pattern: Pattern,
    /// Literal leading components, joined with `/`
    prefix: String,
    /// Number of components after the literal prefix
    remaining: usize,
    recursive: bool,
    /// Also match names with a leading dot
    dot_aware: bool,
}

impl CompiledGlob {
    /// Compile one already-expanded pattern
    ///
    /// `original` is only used for the error message.
    fn compile(original: &str, expanded: &str, dot_aware: bool) -> Result<Self, RemoveError> {
        let absolute = expanded.starts_with('/');
        let components: Vec<&str> = expanded
            .split('/')
            .filter(|c| !c.is_empty() && *c != ".")
            .collect();

        let literal_len = components.iter().take_while(|c| !has_magic(c)).count();
        let joined = components.join("/");
        let literal_prefix = components[..literal_len].join("/");

        let (source, prefix) = if absolute {
            (format!("/{}", joined), format!("/{}", literal_prefix))
        } else {
            (joined, literal_prefix)
        };

        let pattern = Pattern::new(&source).map_err(|e| RemoveError::InvalidPattern {
            pattern: original.to_string(),
            reason: e.to_string(),
        })?;

        let rest = &components[literal_len..];
        let recursive = rest.contains(&"**");
        let has_dot_leaf = components.last().is_some_and(|c| c.starts_with('.'));

        Ok(Self {
            source,
            pattern,
            prefix,
            remaining: rest.len(),
            recursive,
            dot_aware: dot_aware && !rest.is_empty() && !has_dot_leaf,
        })
    }

    /// Pattern text as it is matched
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the pattern has no wildcard at all
    pub fn is_literal(&self) -> bool {
        self.remaining == 0
    }

    /// Directory the walk starts from, relative to cwd unless the pattern is absolute
    pub fn base(&self) -> PathBuf {
        PathBuf::from(&self.prefix)
    }

    /// Literal prefix as a `/`-joined string
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Deepest level below `base()` that can match, `None` when `**` is present
    pub fn max_depth(&self) -> Option<usize> {
        if self.recursive {
            None
        } else {
            Some(self.remaining)
        }
    }

    /// Build the match key for an entry found `relative` below `base()`
    pub fn key_for(&self, relative: &str) -> String {
        match self.prefix.as_str() {
            "" => relative.to_string(),
            "/" => format!("/{}", relative),
            prefix => format!("{}/{}", prefix, relative),
        }
    }

    /// Match a `/`-separated, cwd-relative (or absolute) path
    pub fn matches(&self, key: &str) -> bool {
        if self.pattern.matches_with(key, match_options(false)) {
            return true;
        }
        // dotfile-aware variant, additive to the strict match
        self.dot_aware && self.pattern.matches_with(key, match_options(true))
    }
}

/// Positive and negated patterns of one request
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    pub positive: Vec<CompiledGlob>,
    pub negated: Vec<CompiledGlob>,
}

impl PatternSet {
    /// Split, expand and compile the user's glob patterns
    pub fn compile(patterns: &[String], include_dotfiles: bool) -> Result<Self, RemoveError> {
        let mut set = Self::default();
        for raw in patterns {
            let (negated, body) = split_negation(raw);
            if body.is_empty() {
                continue;
            }
            for expanded in expand(body) {
                let glob = CompiledGlob::compile(raw, &expanded, include_dotfiles)?;
                // "." alone would select cwd itself
                if glob.as_str().is_empty() {
                    continue;
                }
                if negated {
                    set.negated.push(glob);
                } else {
                    set.positive.push(glob);
                }
            }
        }
        Ok(set)
    }
}

/// Exclusion filter applied while walking
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    pub fn compile(patterns: &[String]) -> Result<Self, RemoveError> {
        let mut compiled = Vec::new();
        for raw in patterns {
            if raw.is_empty() {
                continue;
            }
            for expanded in expand_braces(raw) {
                let normalized = strip_current_dir(&expanded);
                let pattern = Pattern::new(normalized).map_err(|e| RemoveError::InvalidPattern {
                    pattern: raw.clone(),
                    reason: e.to_string(),
                })?;
                compiled.push(pattern);
            }
        }
        Ok(Self { patterns: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Exclusions always see dot entries, otherwise `**/.git` could never match
    pub fn is_excluded(&self, key: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(key, match_options(true)))
    }
}

fn match_options(dot_aware: bool) -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: !dot_aware,
    }
}

/// `!pattern` を (true, "pattern") に分割
pub fn split_negation(pattern: &str) -> (bool, &str) {
    match pattern.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    }
}

fn has_magic(component: &str) -> bool {
    component.contains(&MAGIC_CHARS[..])
}

fn strip_current_dir(mut pattern: &str) -> &str {
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    pattern
}

/// Full expansion of one pattern body: braces, `./`, and the `dir/**` stem
pub fn expand(pattern: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for alternative in expand_braces(pattern) {
        let normalized = strip_current_dir(&alternative).to_string();
        if let Some(stem) = normalized.strip_suffix("/**") {
            if !stem.is_empty() && !out.iter().any(|p| p == stem) {
                out.push(stem.to_string());
            }
        }
        if !normalized.is_empty() && !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

/// Expand `{a,b}` groups, including nested ones, in order of appearance
///
/// Groups without a top-level comma and unbalanced braces stay literal.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close, commas)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];

    let mut bounds = Vec::with_capacity(commas.len() + 2);
    bounds.push(open);
    bounds.extend(commas);
    bounds.push(close);

    let mut out: Vec<String> = Vec::new();
    for pair in bounds.windows(2) {
        let alternative = &pattern[pair[0] + 1..pair[1]];
        let candidate = format!("{}{}{}", prefix, alternative, suffix);
        for expanded in expand_braces(&candidate) {
            if !out.contains(&expanded) {
                out.push(expanded);
            }
        }
    }
    out
}

/// 最初の展開可能な `{...}` グループの位置とトップレベルのカンマ位置を返す
fn find_brace_group(pattern: &str) -> Option<(usize, usize, Vec<usize>)> {
    let bytes = pattern.as_bytes();
    let mut start = 0;

    while start < bytes.len() {
        let open = start + next_unescaped(&bytes[start..], b'{')?;
        let mut depth = 0usize;
        let mut commas = Vec::new();
        let mut i = open + 1;
        let mut close = None;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'{' => depth += 1,
                b'}' if depth == 0 => {
                    close = Some(i);
                    break;
                }
                b'}' => depth -= 1,
                b',' if depth == 0 => commas.push(i),
                _ => {}
            }
            i += 1;
        }

        match close {
            Some(close) if !commas.is_empty() => return Some((open, close, commas)),
            _ => start = open + 1,
        }
    }
    None
}

fn next_unescaped(bytes: &[u8], needle: u8) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == needle {
            return Some(i);
        }
        i += 1;
    }
    None
}
