use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::browser::clipboard::{format_errors, ClipMode};
use crate::browser::naming::preselect_len;
use crate::browser::ops;
use crate::browser::tree::{FlatItem, NodeKind};
use crate::browser::Browser;
use crate::error::Result;

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// Inline rename of an existing entry (also entered right after create).
    Rename { original: PathBuf },
    DeleteConfirm { targets: Vec<PathBuf> },
    Error { message: String },
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
}

/// State for a dialog's text input.
///
/// `selection_end` marks a pre-selected prefix `[0..selection_end)`; the
/// first edit replaces it, the way inline rename pre-selects the stem.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    pub cursor_position: usize,
    pub selection_end: usize,
}

/// Main application state.
pub struct App {
    pub browser: Browser,
    pub flat: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub show_hidden: bool,
    pub confirm_delete: bool,
    pub multi_selected: HashSet<usize>,
    pub should_quit: bool,
    pub mode: AppMode,
    pub dialog_state: DialogState,
    pub status_message: Option<(String, bool, Instant)>,
    pub watcher_active: bool,
}

impl App {
    /// Create a new App rooted at the given path, with the name-override
    /// entries applied before the first render.
    pub fn new(path: &Path, overrides: Vec<(PathBuf, String)>, show_hidden: bool) -> Result<Self> {
        let mut browser = Browser::new(path)?;
        if !overrides.is_empty() {
            browser.set_overrides(overrides)?;
        }
        browser.set_on_activate(Box::new(|path| ops::open_with_os(path)));

        let mut app = Self {
            browser,
            flat: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            show_hidden,
            confirm_delete: true,
            multi_selected: HashSet::new(),
            should_quit: false,
            mode: AppMode::Normal,
            dialog_state: DialogState::default(),
            status_message: None,
            watcher_active: true,
        };
        app.sync();
        Ok(app)
    }

    /// Rebuild the flattened rows from the tree and clamp the selection.
    /// Multi-selection is cleared since indices change.
    pub fn sync(&mut self) {
        self.flat = self.browser.tree().flatten(self.show_hidden);
        self.multi_selected.clear();
        if !self.flat.is_empty() && self.selected_index >= self.flat.len() {
            self.selected_index = self.flat.len() - 1;
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Selection & navigation ───────────────────────────────────────────

    pub fn selected_item(&self) -> Option<&FlatItem> {
        self.flat.get(self.selected_index)
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_item().map(|item| item.path.clone())
    }

    /// Paths for a mutating operation: the multi-selection when present,
    /// else the focused row. The root is never an operand.
    pub fn operand_paths(&self) -> Vec<PathBuf> {
        let root = self.browser.root_path().to_path_buf();
        let picked: Vec<PathBuf> = if self.multi_selected.is_empty() {
            self.selected_path().into_iter().collect()
        } else {
            let mut indices: Vec<usize> = self.multi_selected.iter().copied().collect();
            indices.sort_unstable();
            indices
                .into_iter()
                .filter_map(|i| self.flat.get(i))
                .map(|item| item.path.clone())
                .collect()
        };
        picked.into_iter().filter(|p| *p != root).collect()
    }

    pub fn select_next(&mut self) {
        let len = self.flat.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        if !self.flat.is_empty() {
            self.selected_index = self.flat.len() - 1;
        }
    }

    /// Move the selection to the row showing `path`, if visible.
    pub fn select_path(&mut self, path: &Path) {
        if let Some(i) = self.flat.iter().position(|item| item.path == path) {
            self.selected_index = i;
        }
    }

    /// Update the scroll offset to keep the selected item visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    pub fn toggle_multi_select(&mut self) {
        if self.flat.is_empty() {
            return;
        }
        let idx = self.selected_index;
        if !self.multi_selected.remove(&idx) {
            self.multi_selected.insert(idx);
        }
    }

    // ── Tree commands ────────────────────────────────────────────────────

    pub fn expand_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if item.kind != NodeKind::Directory {
            return;
        }
        let id = item.id;
        self.browser.open_dir(id);
        self.sync();
    }

    /// Collapse the selected directory, or jump to the parent row.
    pub fn collapse_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if item.kind == NodeKind::Directory && item.is_open {
            let id = item.id;
            self.browser.close_dir(id);
            self.sync();
            return;
        }
        if let Some(parent) = item.path.parent().map(Path::to_path_buf) {
            self.select_path(&parent);
        }
    }

    /// Activate the focused row: directories toggle open, files go to the
    /// activation callback.
    pub fn activate_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if item.kind == NodeKind::Directory {
            if item.is_open {
                self.collapse_selected();
            } else {
                self.expand_selected();
            }
            return;
        }
        let path = item.path.clone();
        self.browser.activate(&path);
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.sync();
    }

    pub fn refresh(&mut self) {
        match self.browser.refresh() {
            Ok(()) => self.sync(),
            Err(e) => self.set_status(format!("Refresh failed: {}", e), true),
        }
    }

    /// Re-root the browser at the selected directory.
    pub fn enter_selected_root(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if item.kind != NodeKind::Directory {
            return;
        }
        let path = item.path.clone();
        match self.browser.change_root(&path) {
            Ok(()) => {
                self.selected_index = 0;
                self.sync();
            }
            Err(e) => self.set_status(format!("{}", e), true),
        }
    }

    /// Re-root the browser at the parent of the current root.
    pub fn leave_root(&mut self) {
        let Some(parent) = self.browser.root_path().parent().map(Path::to_path_buf) else {
            return;
        };
        match self.browser.change_root(&parent) {
            Ok(()) => {
                self.selected_index = 0;
                self.sync();
            }
            Err(e) => self.set_status(format!("{}", e), true),
        }
    }

    // ── Clipboard commands ───────────────────────────────────────────────

    pub fn cut_selection(&mut self) {
        let paths = self.operand_paths();
        if paths.is_empty() {
            return;
        }
        let n = paths.len();
        self.browser.cut(paths);
        self.set_status(format!("Cut {} item{}", n, plural(n)), false);
    }

    pub fn copy_selection(&mut self) {
        let paths = self.operand_paths();
        if paths.is_empty() {
            return;
        }
        let n = paths.len();
        self.browser.copy(paths);
        self.set_status(format!("Copied {} item{}", n, plural(n)), false);
    }

    pub fn paste_clipboard(&mut self) {
        if self.browser.clipboard.is_empty() {
            self.set_status("Clipboard is empty".into(), false);
            return;
        }
        let hint = self.selected_path();
        match self.browser.paste(hint.as_deref()) {
            Ok(outcome) => {
                self.sync();
                if outcome.errors.is_empty() {
                    self.set_status(
                        format!("Pasted {} item{}", outcome.succeeded, plural(outcome.succeeded)),
                        false,
                    );
                } else {
                    self.open_error(outcome.summary());
                }
            }
            Err(e) => self.open_error(format!("Paste failed: {}", e)),
        }
    }

    // ── Delete ───────────────────────────────────────────────────────────

    /// Ask for confirmation (when configured) before deleting the operands.
    pub fn request_delete(&mut self) {
        let targets = self.operand_paths();
        if targets.is_empty() {
            return;
        }
        if self.confirm_delete {
            self.open_dialog(DialogKind::DeleteConfirm { targets });
        } else {
            self.perform_delete(&targets);
        }
    }

    fn perform_delete(&mut self, targets: &[PathBuf]) {
        match self.browser.delete_paths(targets) {
            Ok((deleted, errors)) => {
                self.sync();
                if errors.is_empty() {
                    self.set_status(format!("Deleted {} item{}", deleted, plural(deleted)), false);
                } else {
                    self.open_error(format!(
                        "Deleted {}, {} failed:\n{}",
                        deleted,
                        errors.len(),
                        format_errors(&errors)
                    ));
                }
            }
            Err(e) => self.open_error(format!("Delete failed: {}", e)),
        }
    }

    // ── Create / rename ──────────────────────────────────────────────────

    /// Create a new entry with a default unique name, then begin an inline
    /// rename with the name (or just the stem, for files) pre-selected.
    pub fn create_entry(&mut self, is_directory: bool) {
        let selection = self.selected_path();
        match self.browser.create_entry(is_directory, selection.as_deref()) {
            Ok(created) => {
                self.sync();
                self.select_path(&created);
                self.begin_rename_of(&created, is_directory);
            }
            Err(e) => self.open_error(format!("Create failed: {}", e)),
        }
    }

    /// Begin renaming the focused row.
    pub fn begin_rename(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if item.path == self.browser.root_path() {
            return;
        }
        let path = item.path.clone();
        let is_dir = item.kind == NodeKind::Directory;
        self.begin_rename_of(&path, is_dir);
    }

    fn begin_rename_of(&mut self, path: &Path, is_dir: bool) {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => return,
        };
        self.dialog_state = DialogState {
            cursor_position: name.len(),
            selection_end: preselect_len(&name, is_dir),
            input: name,
        };
        self.mode = AppMode::Dialog(DialogKind::Rename {
            original: path.to_path_buf(),
        });
    }

    // ── Dialogs ──────────────────────────────────────────────────────────

    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        self.mode = AppMode::Dialog(kind);
    }

    pub fn open_error(&mut self, message: String) {
        self.open_dialog(DialogKind::Error { message });
    }

    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    /// Confirm the active dialog: apply the rename, run the delete, or
    /// dismiss the error.
    pub fn confirm_dialog(&mut self) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind.clone(),
            AppMode::Normal => return,
        };
        match kind {
            DialogKind::Rename { original } => {
                let new_name = self.dialog_state.input.clone();
                self.close_dialog();
                match self.browser.rename(&original, &new_name) {
                    Ok(new_path) => {
                        self.sync();
                        self.select_path(&new_path);
                        self.set_status(format!("Renamed to {}", new_name), false);
                    }
                    Err(e) => self.open_error(format!("Rename failed: {}", e)),
                }
            }
            DialogKind::DeleteConfirm { targets } => {
                self.close_dialog();
                self.perform_delete(&targets);
            }
            DialogKind::Error { .. } => self.close_dialog(),
        }
    }

    // ── Dialog text editing ──────────────────────────────────────────────

    /// Insert a character at the cursor; a pending pre-selection is
    /// replaced by the first edit.
    pub fn dialog_input_char(&mut self, c: char) {
        self.replace_selection();
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace), or the whole
    /// pre-selection when one is pending.
    pub fn dialog_delete_char(&mut self) {
        if self.dialog_state.selection_end > 0 {
            self.replace_selection();
            return;
        }
        if self.dialog_state.cursor_position > 0 {
            let byte_pos = self.dialog_state.cursor_position;
            let prev_char = self.dialog_state.input[..byte_pos]
                .chars()
                .next_back()
                .expect("cursor > 0 guarantees at least one char");
            self.dialog_state.cursor_position -= prev_char.len_utf8();
            self.dialog_state
                .input
                .remove(self.dialog_state.cursor_position);
        }
    }

    fn replace_selection(&mut self) {
        let end = self.dialog_state.selection_end;
        if end > 0 {
            self.dialog_state.input.replace_range(0..end, "");
            self.dialog_state.cursor_position = 0;
            self.dialog_state.selection_end = 0;
        }
    }

    pub fn dialog_move_cursor_left(&mut self) {
        self.dialog_state.selection_end = 0;
        if self.dialog_state.cursor_position > 0 {
            let prev_char = self.dialog_state.input[..self.dialog_state.cursor_position]
                .chars()
                .next_back()
                .expect("cursor > 0 guarantees at least one char");
            self.dialog_state.cursor_position -= prev_char.len_utf8();
        }
    }

    pub fn dialog_move_cursor_right(&mut self) {
        self.dialog_state.selection_end = 0;
        if self.dialog_state.cursor_position < self.dialog_state.input.len() {
            let next_char = self.dialog_state.input[self.dialog_state.cursor_position..]
                .chars()
                .next()
                .expect("cursor < len guarantees at least one char");
            self.dialog_state.cursor_position += next_char.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.selection_end = 0;
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.selection_end = 0;
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    // ── Status line ──────────────────────────────────────────────────────

    pub fn set_status(&mut self, msg: String, is_error: bool) {
        self.status_message = Some((msg, is_error, Instant::now()));
    }

    /// Drop the status message after it has been shown for a few seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, _, created)) = &self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    // ── OS integration ───────────────────────────────────────────────────

    pub fn open_selected_with_os(&mut self) {
        if let Some(path) = self.selected_path() {
            ops::open_with_os(&path);
        }
    }

    pub fn reveal_selected_in_os(&mut self) {
        if let Some(path) = self.selected_path() {
            ops::reveal_in_os(&path);
        }
    }

    /// Summary of the pending clipboard for the status bar.
    pub fn clipboard_summary(&self) -> Option<String> {
        let cb = &self.browser.clipboard;
        let mode = cb.mode()?;
        if cb.is_empty() {
            return None;
        }
        let verb = match mode {
            ClipMode::Cut => "cut",
            ClipMode::Copy => "copied",
        };
        Some(format!("{} {}", cb.len(), verb))
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
