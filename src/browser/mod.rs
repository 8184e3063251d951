//! The file browser core: a lazily materialized filesystem tree plus the
//! clipboard, name-override, and rename/create machinery that mutates it.
//!
//! Everything here runs synchronously on the dispatch thread; the hosting
//! view layer only renders flattened rows and forwards input.

pub mod clipboard;
pub mod naming;
pub mod ops;
pub mod overrides;
pub mod snapshot;
pub mod tree;
pub mod watcher;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::browser::clipboard::{paste_into, Clipboard, PasteOutcome};
use crate::browser::naming::{unique_target, validate_name, DEFAULT_DIR_NAME, DEFAULT_FILE_NAME};
use crate::browser::overrides::NameOverrides;
use crate::browser::tree::{NodeId, NodeKind, Tree};
use crate::error::{AppError, Result};

/// Invoked with the resolved path when a file is activated.
pub type ActivateCallback = Box<dyn FnMut(&Path)>;
/// Invoked with no arguments after any mutation of the materialized tree.
pub type ChangeCallback = Box<dyn FnMut()>;

/// The browser widget state: tree projection, clipboard, and name-override
/// map, all owned exclusively by this instance.
pub struct Browser {
    tree: Tree,
    pub overrides: NameOverrides,
    pub clipboard: Clipboard,
    on_activate: Option<ActivateCallback>,
    on_change: Option<ChangeCallback>,
}

impl Browser {
    /// Create a browser rooted at `path`.
    pub fn new(path: &Path) -> Result<Self> {
        let overrides = NameOverrides::new();
        let tree = Tree::new(path, &overrides)?;
        Ok(Self {
            tree,
            overrides,
            clipboard: Clipboard::new(),
            on_activate: None,
            on_change: None,
        })
    }

    pub fn set_on_activate(&mut self, callback: ActivateCallback) {
        self.on_activate = Some(callback);
    }

    pub fn set_on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root_path(&self) -> &Path {
        self.tree.root_path()
    }

    /// Point the browser at a new root directory.
    pub fn change_root(&mut self, path: &Path) -> Result<()> {
        self.tree.change_root(path, &self.overrides)?;
        self.notify_change();
        Ok(())
    }

    /// Rebuild the tree wholesale, preserving which directories are open.
    pub fn refresh(&mut self) -> Result<()> {
        let snap = snapshot::capture(&self.tree);
        self.tree.rebuild(&self.overrides)?;
        snapshot::restore(&mut self.tree, &snap, &self.overrides);
        self.notify_change();
        Ok(())
    }

    /// Open a directory node, materializing its children.
    pub fn open_dir(&mut self, id: NodeId) {
        if self.tree.node(id).kind != NodeKind::Directory {
            return;
        }
        self.tree.set_open(id, true);
        self.tree.expand(id, &self.overrides);
    }

    pub fn close_dir(&mut self, id: NodeId) {
        self.tree.set_open(id, false);
    }

    /// Replace the name-override map and relabel the materialized tree.
    pub fn set_overrides<I, P, S>(&mut self, mapping: I) -> Result<()>
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<Path>,
        S: Into<String>,
    {
        self.overrides.set_map(mapping);
        debug!(entries = self.overrides.len(), "name overrides replaced");
        self.refresh()
    }

    /// Activate a path. Directories are the caller's concern (toggle open);
    /// files go to the activation callback, whose panics are swallowed so
    /// they never reach the event loop.
    pub fn activate(&mut self, path: &Path) {
        if path.is_dir() {
            return;
        }
        if let Some(callback) = self.on_activate.as_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| callback(path)));
            if result.is_err() {
                warn!(path = %path.display(), "activation callback panicked");
            }
        }
    }

    fn notify_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback();
        }
    }

    // ── Clipboard operations ─────────────────────────────────────────────

    pub fn cut(&mut self, selection: Vec<PathBuf>) {
        self.clipboard.cut(selection);
    }

    pub fn copy(&mut self, selection: Vec<PathBuf>) {
        self.clipboard.copy(selection);
    }

    /// Resolve the paste destination from a hint: the hinted directory
    /// itself, else its parent, else the tree root when there is no hint.
    fn resolve_destination(&self, hint: Option<&Path>) -> PathBuf {
        match hint {
            Some(p) if p.is_dir() => p.to_path_buf(),
            Some(p) => p
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.tree.root_path().to_path_buf()),
            None => self.tree.root_path().to_path_buf(),
        }
    }

    /// Paste the clipboard into the resolved destination.
    ///
    /// Fails fast (no mutation) when the destination is missing or not a
    /// directory; per-item failures are collected in the outcome instead.
    /// Refreshes and notifies when at least one item succeeded.
    pub fn paste(&mut self, destination_hint: Option<&Path>) -> Result<PasteOutcome> {
        let dest = self.resolve_destination(destination_hint);
        if !dest.exists() {
            return Err(AppError::NotFound(dest));
        }
        if !dest.is_dir() {
            return Err(AppError::NotADirectory(dest));
        }

        let outcome = paste_into(&mut self.clipboard, &dest, &mut self.overrides);
        if outcome.succeeded > 0 {
            self.refresh()?;
        }
        Ok(outcome)
    }

    // ── Delete ───────────────────────────────────────────────────────────

    /// Delete each target, collecting per-item errors. Completed deletions
    /// stay applied; the tree refreshes when anything was removed.
    pub fn delete_paths(&mut self, targets: &[PathBuf]) -> Result<(usize, Vec<String>)> {
        let mut deleted = 0;
        let mut errors = Vec::new();
        for target in targets {
            match ops::delete(target) {
                Ok(()) => deleted += 1,
                Err(e) => errors.push(format!("{}: {}", target.display(), e)),
            }
        }
        if deleted > 0 {
            self.refresh()?;
        }
        Ok((deleted, errors))
    }

    // ── Create / rename ──────────────────────────────────────────────────

    /// Resolve the directory a new entry lands in: the selected directory,
    /// else the selected file's parent, else the tree root.
    pub fn create_target_dir(&self, selection: Option<&Path>) -> PathBuf {
        self.resolve_destination(selection)
    }

    /// Create a new file or directory with a unique default name inside the
    /// directory resolved from `selection`. On success the tree refreshes
    /// with the new entry's parent forced open, and the created path is
    /// returned so the caller can start an inline rename on it.
    pub fn create_entry(&mut self, is_directory: bool, selection: Option<&Path>) -> Result<PathBuf> {
        let dir = self.create_target_dir(selection);
        let default_name = if is_directory {
            DEFAULT_DIR_NAME
        } else {
            DEFAULT_FILE_NAME
        };
        let target = unique_target(&dir, default_name);
        if is_directory {
            ops::create_dir(&target)?;
        } else {
            ops::create_file(&target)?;
        }
        debug!(path = %target.display(), "created entry");
        self.refresh()?;
        self.reveal(&target);
        Ok(target)
    }

    /// Validate and apply a rename, carrying any name-override entry to the
    /// new path. On validation or I/O failure the filesystem is untouched.
    pub fn rename(&mut self, path: &Path, new_name: &str) -> Result<PathBuf> {
        let parent = path
            .parent()
            .ok_or_else(|| AppError::NotADirectory(path.to_path_buf()))?;
        if path.file_name().is_some_and(|n| n == new_name) {
            return Ok(path.to_path_buf());
        }
        validate_name(new_name, parent)?;
        let new_path = parent.join(new_name);
        ops::rename(path, &new_path)?;
        self.overrides.transfer(path, &new_path);
        self.refresh()?;
        Ok(new_path)
    }

    /// Open and expand every ancestor of `path` so its node is materialized
    /// and visible. Returns the node when found.
    pub fn reveal(&mut self, path: &Path) -> Option<NodeId> {
        let ancestors: Vec<PathBuf> = {
            let mut chain: Vec<PathBuf> = path
                .ancestors()
                .skip(1)
                .take_while(|a| a.starts_with(self.tree.root_path()))
                .map(Path::to_path_buf)
                .collect();
            chain.reverse();
            chain
        };
        for ancestor in ancestors {
            if let Some(id) = self.tree.find(&ancestor) {
                self.open_dir(id);
            }
        }
        self.tree.find(path)
    }
}
