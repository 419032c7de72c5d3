//! Watch-glob compilation.
//!
//! Patterns are matched against paths relative to the project root. `*`
//! does not cross directory separators, and extglob-style `(a|b)` groups
//! are treated as `{a,b}` alternation.

use crate::error::{ConfigError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};

/// Compiled set of watch patterns.
#[derive(Debug, Clone)]
pub struct WatchMatcher {
    set: GlobSet,
    roots: Vec<PathBuf>,
}

impl WatchMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut roots: Vec<PathBuf> = Vec::new();

        for pattern in patterns {
            let normalized = normalize_alternation(pattern);
            let glob = GlobBuilder::new(&normalized)
                .literal_separator(true)
                .build()
                .map_err(|source| ConfigError::InvalidGlob {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);

            let root = static_prefix(&normalized);
            if !roots.contains(&root) {
                roots.push(root);
            }
        }

        let set = builder.build().map_err(|source| ConfigError::InvalidGlob {
            pattern: patterns.join(", "),
            source,
        })?;

        Ok(Self { set, roots })
    }

    /// Whether a project-relative path matches any pattern.
    pub fn is_match(&self, relative: &Path) -> bool {
        self.set.is_match(relative)
    }

    /// Directories that must be watched for the patterns to see every
    /// candidate path, relative to the project root.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Rewrite `(a|b)` groups into `{a,b}`.
fn normalize_alternation(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('(') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(')') {
            Some(close) if after[..close].contains('|') && !after[..close].contains('(') => {
                out.push('{');
                out.push_str(&after[..close].replace('|', ","));
                out.push('}');
                rest = &after[close + 1..];
            }
            _ => {
                out.push('(');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Leading path components that contain no glob syntax.
fn static_prefix(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in Path::new(pattern).components() {
        let Component::Normal(part) = component else {
            continue;
        };
        let part = part.to_string_lossy();
        if part.contains(['*', '?', '[', '{']) {
            break;
        }
        root.push(&*part);
    }

    // A pattern without wildcards names a file; watch its directory.
    if root.as_os_str() == pattern {
        root.pop();
    }
    root
}
