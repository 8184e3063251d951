//! Display-name overlay keyed by canonical filesystem path.
//!
//! The map lives independently of the tree: it survives full rebuilds and is
//! only mutated explicitly — wholesale via `set_map`, or entry-by-entry via
//! `transfer` when a path is renamed or moved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Canonicalize a path, falling back to the path as given when resolution
/// fails (not-yet-existing or just-deleted paths).
pub fn resolve_or_raw(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Mapping from resolved path to display-name string.
#[derive(Debug, Clone, Default)]
pub struct NameOverrides {
    map: HashMap<PathBuf, String>,
}

impl NameOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire map. Keys are normalized to their canonical
    /// absolute form; relative keys resolve against the current working
    /// directory at assignment time.
    pub fn set_map<I, P, S>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<Path>,
        S: Into<String>,
    {
        self.map = mapping
            .into_iter()
            .map(|(p, label)| (resolve_or_raw(p.as_ref()), label.into()))
            .collect();
    }

    /// Look up an override: exact match on the given path first, then on its
    /// resolved form.
    pub fn lookup(&self, path: &Path) -> Option<&str> {
        if let Some(label) = self.map.get(path) {
            return Some(label);
        }
        self.map.get(&resolve_or_raw(path)).map(String::as_str)
    }

    /// Move an override from `old_path` to `new_path` — removing both the
    /// raw and resolved key forms of `old_path` and re-inserting the same
    /// value under `new_path`'s resolved form. No-op when `old_path` has no
    /// override.
    pub fn transfer(&mut self, old_path: &Path, new_path: &Path) {
        let raw = self.map.remove(old_path);
        let resolved = self.map.remove(&resolve_or_raw(old_path));
        if let Some(label) = raw.or(resolved) {
            self.map.insert(resolve_or_raw(new_path), label);
        }
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

/// Display label for a path: the override when present, else the raw file
/// name, else (drive roots and other nameless paths) the path rendered with
/// trailing separators trimmed.
pub fn display_label(path: &Path, overrides: &NameOverrides) -> String {
    if let Some(label) = overrides.lookup(path) {
        return label.to_string();
    }
    match path.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => {
            let raw = path.to_string_lossy();
            let trimmed = raw.trim_end_matches(['/', '\\']);
            if trimmed.is_empty() {
                raw.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn set_map_resolves_existing_keys() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        File::create(&file).unwrap();

        let mut ov = NameOverrides::new();
        ov.set_map([(file.clone(), "Alpha")]);

        // lookup through the canonical form succeeds
        assert_eq!(ov.lookup(&file.canonicalize().unwrap()), Some("Alpha"));
        assert_eq!(ov.lookup(&file), Some("Alpha"));
    }

    #[test]
    fn nonexistent_key_falls_back_to_raw_form() {
        let mut ov = NameOverrides::new();
        let ghost = PathBuf::from("/no/such/path/here.txt");
        ov.set_map([(ghost.clone(), "Ghost")]);
        assert_eq!(ov.lookup(&ghost), Some("Ghost"));
    }

    #[test]
    fn lookup_absent_returns_none() {
        let ov = NameOverrides::new();
        assert_eq!(ov.lookup(Path::new("/tmp/whatever")), None);
    }

    #[test]
    fn transfer_moves_value_and_clears_old_keys() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("old.txt");
        File::create(&old).unwrap();

        let mut ov = NameOverrides::new();
        ov.set_map([(old.clone(), "Label")]);

        let new = tmp.path().join("new.txt");
        std::fs::rename(&old, &new).unwrap();
        ov.transfer(&old, &new);

        assert_eq!(ov.lookup(&old), None);
        assert_eq!(ov.lookup(&new), Some("Label"));
        assert_eq!(ov.len(), 1);
    }

    #[test]
    fn transfer_without_override_is_noop() {
        let mut ov = NameOverrides::new();
        ov.transfer(Path::new("/tmp/a"), Path::new("/tmp/b"));
        assert!(ov.is_empty());
    }

    #[test]
    fn set_map_replaces_previous_contents() {
        let mut ov = NameOverrides::new();
        ov.set_map([(PathBuf::from("/x"), "one")]);
        ov.set_map([(PathBuf::from("/y"), "two")]);
        assert_eq!(ov.lookup(Path::new("/x")), None);
        assert_eq!(ov.lookup(Path::new("/y")), Some("two"));
    }

    #[test]
    fn display_label_prefers_override() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("raw_name.txt");
        File::create(&file).unwrap();

        let mut ov = NameOverrides::new();
        ov.set_map([(file.clone(), "Pretty Name")]);
        assert_eq!(display_label(&file, &ov), "Pretty Name");
    }

    #[test]
    fn display_label_falls_back_to_file_name() {
        let ov = NameOverrides::new();
        assert_eq!(
            display_label(Path::new("/some/dir/entry.rs"), &ov),
            "entry.rs"
        );
    }

    #[test]
    fn display_label_for_nameless_root() {
        let ov = NameOverrides::new();
        let label = display_label(Path::new("/"), &ov);
        assert!(!label.is_empty());
    }
}
