//! Clipboard/Transfer Engine: a pending cut/copy selection plus the paste
//! machinery that moves or copies each source into a destination directory
//! with `" (N)"` conflict renaming.
//!
//! Per-item failures never abort the batch; they are accumulated and
//! reported once at the end. Cut marks survive tree rebuilds because they
//! are keyed by path, not node.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::browser::naming::unique_target;
use crate::browser::ops;
use crate::browser::overrides::NameOverrides;

/// At most this many error messages appear in a batch report.
pub const MAX_REPORTED_ERRORS: usize = 5;

/// The pending transfer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    Cut,
    Copy,
}

/// Pending clipboard state: ordered source paths, transfer mode, and the
/// path set of visually dimmed (cut-marked) rows.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    sources: Vec<PathBuf>,
    mode: Option<ClipMode>,
    marked: HashSet<PathBuf>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a cut: replaces any prior clipboard state and re-marks the
    /// affected paths as dimmed.
    pub fn cut(&mut self, selection: Vec<PathBuf>) {
        self.marked = selection.iter().cloned().collect();
        self.sources = selection;
        self.mode = Some(ClipMode::Cut);
    }

    /// Stage a copy: replaces any prior clipboard state and clears cut
    /// marks.
    pub fn copy(&mut self, selection: Vec<PathBuf>) {
        self.marked.clear();
        self.sources = selection;
        self.mode = Some(ClipMode::Copy);
    }

    pub fn clear(&mut self) {
        self.sources.clear();
        self.mode = None;
        self.marked.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn mode(&self) -> Option<ClipMode> {
        self.mode
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Whether a row should render dimmed (pending cut).
    pub fn is_marked(&self, path: &Path) -> bool {
        self.marked.contains(path)
    }
}

/// Result of one paste batch.
#[derive(Debug)]
pub struct PasteOutcome {
    pub succeeded: usize,
    pub errors: Vec<String>,
}

impl PasteOutcome {
    /// One-line summary plus up to [`MAX_REPORTED_ERRORS`] error messages.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Pasted {} item{}",
            self.succeeded,
            if self.succeeded == 1 { "" } else { "s" }
        );
        if !self.errors.is_empty() {
            out.push_str(&format!(", {} failed:\n", self.errors.len()));
            out.push_str(&format_errors(&self.errors));
        }
        out
    }
}

/// Join up to [`MAX_REPORTED_ERRORS`] messages, appending an
/// `"...and N more"` line beyond the cap.
pub fn format_errors(errors: &[String]) -> String {
    let mut out = errors
        .iter()
        .take(MAX_REPORTED_ERRORS)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    if errors.len() > MAX_REPORTED_ERRORS {
        out.push_str(&format!(
            "\n...and {} more",
            errors.len() - MAX_REPORTED_ERRORS
        ));
    }
    out
}

/// Transfer every clipboard source into `dest` (already resolved and
/// verified to be a directory by the caller).
///
/// Each source still existing is moved (cut) or copied (copy) to
/// `dest/name`, renamed `"name (N)"` on collision. Successes carry any
/// name-override entry along. After a cut with at least one success the
/// clipboard is cleared; a copy clipboard persists for repeated pastes.
pub fn paste_into(
    clipboard: &mut Clipboard,
    dest: &Path,
    overrides: &mut NameOverrides,
) -> PasteOutcome {
    let mode = clipboard.mode();
    let mut outcome = PasteOutcome {
        succeeded: 0,
        errors: Vec::new(),
    };

    for source in clipboard.sources().to_vec() {
        let name = match source.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => {
                outcome
                    .errors
                    .push(format!("{}: has no file name", source.display()));
                continue;
            }
        };
        if source.symlink_metadata().is_err() {
            outcome
                .errors
                .push(format!("{}: no longer exists", source.display()));
            continue;
        }

        let target = unique_target(dest, &name);
        let result = match mode {
            Some(ClipMode::Cut) => ops::move_to(&source, &target),
            Some(ClipMode::Copy) => ops::copy_to(&source, &target),
            None => continue,
        };
        match result {
            Ok(()) => {
                overrides.transfer(&source, &target);
                outcome.succeeded += 1;
            }
            Err(e) => {
                warn!(source = %source.display(), error = %e, "paste item failed");
                outcome.errors.push(format!("{}: {}", source.display(), e));
            }
        }
    }

    if mode == Some(ClipMode::Cut) && outcome.succeeded > 0 {
        clipboard.clear();
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn new_clipboard_is_empty() {
        let cb = Clipboard::new();
        assert!(cb.is_empty());
        assert_eq!(cb.mode(), None);
    }

    #[test]
    fn cut_marks_paths_dimmed() {
        let mut cb = Clipboard::new();
        cb.cut(vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]);
        assert!(cb.is_marked(Path::new("/tmp/a")));
        assert!(cb.is_marked(Path::new("/tmp/b")));
        assert_eq!(cb.mode(), Some(ClipMode::Cut));
    }

    #[test]
    fn copy_clears_previous_cut_marks() {
        let mut cb = Clipboard::new();
        cb.cut(vec![PathBuf::from("/tmp/a")]);
        cb.copy(vec![PathBuf::from("/tmp/b")]);
        assert!(!cb.is_marked(Path::new("/tmp/a")));
        assert_eq!(cb.sources(), [PathBuf::from("/tmp/b")]);
        assert_eq!(cb.mode(), Some(ClipMode::Copy));
    }

    #[test]
    fn staging_replaces_prior_state() {
        let mut cb = Clipboard::new();
        cb.copy(vec![PathBuf::from("/old")]);
        cb.cut(vec![PathBuf::from("/new")]);
        assert_eq!(cb.sources(), [PathBuf::from("/new")]);
        assert_eq!(cb.mode(), Some(ClipMode::Cut));
    }

    #[test]
    fn paste_copy_into_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        fs::write(&src, "data").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let mut cb = Clipboard::new();
        let mut ov = NameOverrides::new();
        cb.copy(vec![src.clone()]);
        let outcome = paste_into(&mut cb, &dest, &mut ov);

        assert_eq!(outcome.succeeded, 1);
        assert!(outcome.errors.is_empty());
        assert!(dest.join("a.txt").exists());
        assert!(src.exists());
    }

    #[test]
    fn paste_conflict_appends_numbers() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        fs::write(&src, "new").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("a.txt"), "existing").unwrap();

        let mut cb = Clipboard::new();
        let mut ov = NameOverrides::new();
        cb.copy(vec![src.clone()]);

        paste_into(&mut cb, &dest, &mut ov);
        assert!(dest.join("a (1).txt").exists());

        // copy clipboard persists; a second paste keeps counting
        paste_into(&mut cb, &dest, &mut ov);
        assert!(dest.join("a (2).txt").exists());
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "existing");
    }

    #[test]
    fn cut_paste_moves_and_clears_clipboard() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("move.txt");
        fs::write(&src, "x").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let mut cb = Clipboard::new();
        let mut ov = NameOverrides::new();
        cb.cut(vec![src.clone()]);
        let outcome = paste_into(&mut cb, &dest, &mut ov);

        assert_eq!(outcome.succeeded, 1);
        assert!(!src.exists());
        assert!(dest.join("move.txt").exists());
        assert!(cb.is_empty());
        assert!(!cb.is_marked(&src));

        // a second paste is a no-op on an empty clipboard
        let outcome = paste_into(&mut cb, &dest, &mut ov);
        assert_eq!(outcome.succeeded, 0);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn copy_paste_keeps_clipboard_for_repeat() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("again.txt");
        fs::write(&src, "x").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let mut cb = Clipboard::new();
        let mut ov = NameOverrides::new();
        cb.copy(vec![src.clone()]);
        paste_into(&mut cb, &dest, &mut ov);
        assert!(!cb.is_empty());
        let outcome = paste_into(&mut cb, &dest, &mut ov);
        assert_eq!(outcome.succeeded, 1);
        assert!(dest.join("again (1).txt").exists());
    }

    #[test]
    fn partial_failure_applies_survivors_and_reports_rest() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.txt");
        let b = tmp.path().join("b.txt");
        let ghost = tmp.path().join("ghost.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let mut cb = Clipboard::new();
        let mut ov = NameOverrides::new();
        cb.copy(vec![a, ghost, b]);
        let outcome = paste_into(&mut cb, &dest, &mut ov);

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("no longer exists"));
        assert!(dest.join("a.txt").exists());
        assert!(dest.join("b.txt").exists());
        assert!(!dest.join("ghost.txt").exists());
    }

    #[test]
    fn paste_transfers_name_override() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("labeled.txt");
        fs::write(&src, "x").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let mut cb = Clipboard::new();
        let mut ov = NameOverrides::new();
        ov.set_map([(src.clone(), "Nice Label")]);

        cb.cut(vec![src.clone()]);
        paste_into(&mut cb, &dest, &mut ov);

        assert_eq!(ov.lookup(&src), None);
        assert_eq!(ov.lookup(&dest.join("labeled.txt")), Some("Nice Label"));
    }

    #[test]
    fn paste_directory_recursively() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("pack");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("inner").join("f.txt"), "deep").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let mut cb = Clipboard::new();
        let mut ov = NameOverrides::new();
        cb.copy(vec![src.clone()]);
        paste_into(&mut cb, &dest, &mut ov);

        assert!(dest.join("pack").join("inner").join("f.txt").exists());
        assert!(src.exists());
    }

    #[test]
    fn self_copy_resolves_as_collision() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        fs::write(&src, "self").unwrap();

        let mut cb = Clipboard::new();
        let mut ov = NameOverrides::new();
        cb.copy(vec![src.clone()]);
        let outcome = paste_into(&mut cb, tmp.path(), &mut ov);

        assert_eq!(outcome.succeeded, 1);
        assert!(src.exists());
        assert_eq!(fs::read_to_string(tmp.path().join("a (1).txt")).unwrap(), "self");
    }

    #[test]
    fn format_errors_caps_at_five() {
        let errors: Vec<String> = (1..=8).map(|i| format!("error {}", i)).collect();
        let text = format_errors(&errors);
        assert!(text.contains("error 5"));
        assert!(!text.contains("error 6"));
        assert!(text.ends_with("...and 3 more"));
    }

    #[test]
    fn summary_counts_and_pluralizes() {
        let outcome = PasteOutcome {
            succeeded: 2,
            errors: vec!["x: gone".into()],
        };
        let text = outcome.summary();
        assert!(text.starts_with("Pasted 2 items, 1 failed:"));
        assert!(text.contains("x: gone"));
    }
}
