//! File system watcher with debouncing.
//!
//! Watches the static roots of the configured globs and forwards changes to
//! paths the globs match.

use crate::error::{CliError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tether_config::WatchMatcher;
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Project-relative path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_kind(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// Drops repeat events for the same path inside the debounce window.
#[derive(Debug)]
struct Debouncer {
    window: Duration,
    last_seen: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    fn admit(&mut self, path: &Path, now: Instant) -> bool {
        let recent = self
            .last_seen
            .get(path)
            .is_some_and(|last| now.duration_since(*last) < self.window);
        if recent {
            return false;
        }
        self.last_seen.insert(path.to_path_buf(), now);
        true
    }
}

/// Turns raw notify events into debounced, glob-filtered changes.
struct ChangeFilter {
    root: PathBuf,
    matcher: WatchMatcher,
    debouncer: Debouncer,
}

impl ChangeFilter {
    /// Only kinds that become a [`FileChange`] take the path's debounce slot.
    fn accept(&mut self, kind: &EventKind, path: &Path, now: Instant) -> Option<FileChange> {
        let relative = relative_match(path, &self.root, &self.matcher)?;
        let change = FileChange::from_kind(kind, relative)?;
        self.debouncer.admit(change.path(), now).then_some(change)
    }
}

/// File watcher with glob filtering and debouncing.
pub struct FileWatcher {
    /// Underlying notify watcher
    _watcher: RecommendedWatcher,
    /// Project root paths are reported relative to
    root: PathBuf,
    /// Directories actually being watched
    watched: Vec<PathBuf>,
}

impl FileWatcher {
    /// Create a new file watcher.
    ///
    /// # Arguments
    ///
    /// * `root` - Canonical project directory
    /// * `matcher` - Compiled watch globs, relative to `root`
    /// * `debounce_ms` - Debounce delay in milliseconds
    ///
    /// # Returns
    ///
    /// Tuple of (FileWatcher, receiver for change events)
    ///
    /// # Errors
    ///
    /// Returns error if the project directory doesn't exist or the watcher
    /// cannot be created
    pub fn new(
        root: PathBuf,
        matcher: WatchMatcher,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.is_dir() {
            return Err(CliError::FileNotFound(root));
        }

        let roots: Vec<PathBuf> = matcher.roots().iter().map(|r| root.join(r)).collect();

        let (tx, rx) = mpsc::channel(100);
        let mut filter = ChangeFilter {
            root: root.clone(),
            matcher,
            debouncer: Debouncer::new(Duration::from_millis(debounce_ms)),
        };

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "file watcher error");
                    return;
                }
            };

            for path in &event.paths {
                if let Some(change) = filter.accept(&event.kind, path, Instant::now()) {
                    tracing::debug!(?change, "watched file changed");
                    // The receiver is gone once the server shuts down
                    let _ = tx.blocking_send(change);
                }
            }
        })?;

        let mut watched = Vec::new();
        for dir in roots {
            if !dir.is_dir() {
                tracing::warn!(dir = %dir.display(), "watch root does not exist, skipping");
                continue;
            }
            watcher.watch(&dir, RecursiveMode::Recursive)?;
            watched.push(dir);
        }

        Ok((
            Self {
                _watcher: watcher,
                root,
                watched,
            },
            rx,
        ))
    }

    /// Get the project root paths are reported relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories being watched.
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}

/// Project-relative path for `path` if it lies under `root` and matches.
fn relative_match(path: &Path, root: &Path, matcher: &WatchMatcher) -> Option<PathBuf> {
    let relative = path.strip_prefix(root).ok()?;
    matcher.is_match(relative).then(|| relative.to_path_buf())
}
