//! Tree Projection: maps a lazily-expanded subset of a filesystem subtree to
//! a mutable in-memory node table.
//!
//! Nodes live in an arena indexed by `NodeId`; a `Path -> NodeId` index
//! covers the currently materialized subset only and is rebuilt wholesale on
//! every refresh. Every unexpanded directory carries a single synthetic
//! placeholder child so the view can render an expand affordance; expansion
//! swaps the placeholder for real children (or nothing, for empty dirs).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::browser::naming::natural_cmp;
use crate::browser::overrides::{display_label, NameOverrides};
use crate::error::{AppError, Result};

/// Arena handle for a tree node.
pub type NodeId = usize;

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
    /// Synthetic single child of an unexpanded directory.
    Placeholder,
}

/// A node in the materialized tree. Size and mtime are cached at insert
/// time, not live.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub path: PathBuf,
    pub label: String,
    pub kind: NodeKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub is_hidden: bool,
    pub is_open: bool,
    pub children: Vec<NodeId>,
}

/// A flattened row of the tree for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub id: NodeId,
    pub path: PathBuf,
    pub label: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub is_open: bool,
    pub is_last_sibling: bool,
    pub is_hidden: bool,
}

/// The materialized tree: node arena plus the path index for the
/// materialized subset.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    index: HashMap<PathBuf, NodeId>,
    root: Option<NodeId>,
    root_path: PathBuf,
}

impl Tree {
    /// Build a tree rooted at `path`, with the root open and expanded.
    pub fn new(path: &Path, overrides: &NameOverrides) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            root: None,
            root_path: PathBuf::new(),
        };
        tree.change_root(path, overrides)?;
        Ok(tree)
    }

    /// Point the tree at a new root directory and rebuild.
    ///
    /// Fails with `NotFound` if the path is absent and `NotADirectory` if it
    /// is not a directory.
    pub fn change_root(&mut self, path: &Path, overrides: &NameOverrides) -> Result<()> {
        if !path.exists() {
            return Err(AppError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(AppError::NotADirectory(path.to_path_buf()));
        }
        self.root_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.rebuild(overrides)
    }

    /// Discard all nodes and the path index, re-insert the root node open,
    /// and expand it one level.
    pub fn rebuild(&mut self, overrides: &NameOverrides) -> Result<()> {
        self.nodes.clear();
        self.index.clear();
        let root_path = self.root_path.clone();
        let root = self.insert_node(None, &root_path, overrides)?;
        self.nodes[root].is_open = true;
        self.root = Some(root);
        self.expand(root, overrides);
        Ok(())
    }

    pub fn root_id(&self) -> NodeId {
        self.root.expect("tree always has a root after construction")
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Look up the node for a path in the materialized subset.
    pub fn find(&self, path: &Path) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    pub fn set_open(&mut self, id: NodeId, open: bool) {
        self.nodes[id].is_open = open;
    }

    /// Whether a directory node still holds its placeholder (children not
    /// yet materialized).
    pub fn is_unexpanded(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        node.children.len() == 1 && self.nodes[node.children[0]].kind == NodeKind::Placeholder
    }

    /// Populate a directory node's children, replacing the placeholder.
    /// Idempotent: a no-op when the node is already expanded or not a
    /// directory. Listing failures yield an empty child list.
    pub fn expand(&mut self, id: NodeId, overrides: &NameOverrides) {
        if self.nodes[id].kind != NodeKind::Directory || !self.is_unexpanded(id) {
            return;
        }
        self.nodes[id].children.clear();
        let dir = self.nodes[id].path.clone();
        for child_path in list_directory(&dir, overrides) {
            // entries that cannot be stat'ed are skipped
            let _ = self.insert_node(Some(id), &child_path, overrides);
        }
    }

    /// Insert a node for `path` under `parent`, indexing it and seeding a
    /// placeholder child for directories.
    fn insert_node(
        &mut self,
        parent: Option<NodeId>,
        path: &Path,
        overrides: &NameOverrides,
    ) -> Result<NodeId> {
        let metadata = fs::symlink_metadata(path).map_err(|e| AppError::io_at(path, e))?;
        let kind = if metadata.is_symlink() {
            NodeKind::Symlink
        } else if metadata.is_dir() {
            NodeKind::Directory
        } else {
            NodeKind::File
        };
        let label = display_label(path, overrides);
        let is_hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(false);

        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            path: path.to_path_buf(),
            label,
            kind,
            size: metadata.len(),
            modified: metadata.modified().ok(),
            is_hidden,
            is_open: false,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        self.index.insert(path.to_path_buf(), id);

        if kind == NodeKind::Directory {
            let placeholder = self.nodes.len();
            self.nodes.push(Node {
                id: placeholder,
                path: PathBuf::new(),
                label: String::new(),
                kind: NodeKind::Placeholder,
                size: 0,
                modified: None,
                is_hidden: false,
                is_open: false,
                children: Vec::new(),
            });
            self.nodes[id].children.push(placeholder);
        }
        Ok(id)
    }

    /// Flatten the materialized tree into render rows, honoring open state
    /// and hidden-file filtering. The root row is always included.
    pub fn flatten(&self, show_hidden: bool) -> Vec<FlatItem> {
        let mut items = Vec::new();
        if let Some(root) = self.root {
            self.flatten_node(root, 0, true, true, show_hidden, &mut items);
        }
        items
    }

    fn flatten_node(
        &self,
        id: NodeId,
        depth: usize,
        is_last: bool,
        is_root: bool,
        show_hidden: bool,
        items: &mut Vec<FlatItem>,
    ) {
        let node = &self.nodes[id];
        if node.kind == NodeKind::Placeholder {
            return;
        }
        if !is_root && !show_hidden && node.is_hidden {
            return;
        }

        items.push(FlatItem {
            id,
            path: node.path.clone(),
            label: node.label.clone(),
            kind: node.kind,
            depth,
            is_open: node.is_open,
            is_last_sibling: is_last,
            is_hidden: node.is_hidden,
        });

        if node.is_open {
            let visible: Vec<NodeId> = node
                .children
                .iter()
                .copied()
                .filter(|&c| {
                    let child = &self.nodes[c];
                    child.kind != NodeKind::Placeholder && (show_hidden || !child.is_hidden)
                })
                .collect();
            for (i, child) in visible.iter().enumerate() {
                let last = i == visible.len() - 1;
                self.flatten_node(*child, depth + 1, last, false, show_hidden, items);
            }
        }
    }
}

/// List a directory's entries sorted for display: directories before files,
/// each group ordered by the natural-sort key of the display name (post
/// name-override). Permission or I/O failures yield an empty list.
pub fn list_directory(dir: &Path, overrides: &NameOverrides) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut listed: Vec<(bool, String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            let label = display_label(&path, overrides);
            (path.is_dir(), label, path)
        })
        .collect();
    listed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| natural_cmp(&a.1, &b.1)));
    listed.into_iter().map(|(_, _, path)| path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        File::create(dir.path().join("file10.txt")).unwrap();
        File::create(dir.path().join("file2.txt")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        fs::create_dir(dir.path().join("alpha").join("nested")).unwrap();
        File::create(dir.path().join("alpha").join("inner.txt")).unwrap();
        dir
    }

    fn labels(items: &[FlatItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn new_tree_has_open_expanded_root() {
        let dir = setup();
        let tree = Tree::new(dir.path(), &NameOverrides::new()).unwrap();
        let root = tree.node(tree.root_id());
        assert!(root.is_open);
        assert!(!tree.is_unexpanded(tree.root_id()));
    }

    #[test]
    fn change_root_missing_path_fails() {
        let dir = setup();
        let err = Tree::new(&dir.path().join("nope"), &NameOverrides::new()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn change_root_on_file_fails() {
        let dir = setup();
        let err = Tree::new(&dir.path().join("file2.txt"), &NameOverrides::new()).unwrap_err();
        assert!(matches!(err, AppError::NotADirectory(_)));
    }

    #[test]
    fn listing_order_dirs_first_then_natural() {
        let dir = setup();
        let tree = Tree::new(dir.path(), &NameOverrides::new()).unwrap();
        let items = tree.flatten(false);
        // root, then dirs alpha/beta, then file2 before file10
        assert_eq!(
            labels(&items)[1..],
            ["alpha", "beta", "file2.txt", "file10.txt"]
        );
    }

    #[test]
    fn overrides_participate_in_sort_order() {
        let dir = setup();
        let mut ov = NameOverrides::new();
        // relabel "beta" so it sorts before "alpha"
        ov.set_map([(dir.path().join("beta"), "0 first")]);
        let tree = Tree::new(dir.path(), &ov).unwrap();
        let items = tree.flatten(false);
        assert_eq!(items[1].label, "0 first");
        assert_eq!(items[2].label, "alpha");
    }

    #[test]
    fn unexpanded_directory_holds_placeholder() {
        let dir = setup();
        let tree = Tree::new(dir.path(), &NameOverrides::new()).unwrap();
        let alpha = tree.find(&dir.path().join("alpha")).unwrap();
        assert!(tree.is_unexpanded(alpha));
        let node = tree.node(alpha);
        assert_eq!(node.children.len(), 1);
        assert_eq!(tree.node(node.children[0]).kind, NodeKind::Placeholder);
    }

    #[test]
    fn expand_replaces_placeholder_with_children() {
        let dir = setup();
        let ov = NameOverrides::new();
        let mut tree = Tree::new(dir.path(), &ov).unwrap();
        let alpha = tree.find(&dir.path().join("alpha")).unwrap();
        tree.expand(alpha, &ov);
        assert!(!tree.is_unexpanded(alpha));
        let kinds: Vec<NodeKind> = tree
            .node(alpha)
            .children
            .iter()
            .map(|&c| tree.node(c).kind)
            .collect();
        assert_eq!(kinds, [NodeKind::Directory, NodeKind::File]);
    }

    #[test]
    fn expand_empty_directory_removes_placeholder() {
        let dir = setup();
        let ov = NameOverrides::new();
        let mut tree = Tree::new(dir.path(), &ov).unwrap();
        let beta = tree.find(&dir.path().join("beta")).unwrap();
        tree.expand(beta, &ov);
        assert!(tree.node(beta).children.is_empty());
        assert!(!tree.is_unexpanded(beta));
    }

    #[test]
    fn expand_is_idempotent() {
        let dir = setup();
        let ov = NameOverrides::new();
        let mut tree = Tree::new(dir.path(), &ov).unwrap();
        let alpha = tree.find(&dir.path().join("alpha")).unwrap();
        tree.expand(alpha, &ov);
        let first = tree.node(alpha).children.clone();
        tree.expand(alpha, &ov);
        assert_eq!(tree.node(alpha).children, first);
    }

    #[test]
    fn index_covers_materialized_subset_only() {
        let dir = setup();
        let ov = NameOverrides::new();
        let tree = Tree::new(dir.path(), &ov).unwrap();
        assert!(tree.find(&dir.path().join("alpha")).is_some());
        // nested dir not materialized until alpha expands
        assert!(tree.find(&dir.path().join("alpha").join("nested")).is_none());
    }

    #[test]
    fn rebuild_drops_index_entries_for_removed_paths() {
        let dir = setup();
        let ov = NameOverrides::new();
        let mut tree = Tree::new(dir.path(), &ov).unwrap();
        let gone = dir.path().join("file2.txt");
        assert!(tree.find(&gone).is_some());
        fs::remove_file(&gone).unwrap();
        tree.rebuild(&ov).unwrap();
        assert!(tree.find(&gone).is_none());
    }

    #[test]
    fn flatten_hides_dotfiles_unless_requested() {
        let dir = setup();
        let tree = Tree::new(dir.path(), &NameOverrides::new()).unwrap();
        assert!(!labels(&tree.flatten(false)).contains(&".hidden"));
        assert!(labels(&tree.flatten(true)).contains(&".hidden"));
    }

    #[test]
    fn flatten_marks_last_siblings() {
        let dir = setup();
        let tree = Tree::new(dir.path(), &NameOverrides::new()).unwrap();
        let items = tree.flatten(false);
        assert!(items.last().unwrap().is_last_sibling);
        assert_eq!(items.last().unwrap().label, "file10.txt");
    }

    #[test]
    fn flatten_descends_only_into_open_nodes() {
        let dir = setup();
        let ov = NameOverrides::new();
        let mut tree = Tree::new(dir.path(), &ov).unwrap();
        let alpha = tree.find(&dir.path().join("alpha")).unwrap();
        tree.expand(alpha, &ov);
        // expanded but closed: children stay hidden
        assert!(!labels(&tree.flatten(false)).contains(&"inner.txt"));
        tree.set_open(alpha, true);
        assert!(labels(&tree.flatten(false)).contains(&"inner.txt"));
    }

    #[test]
    fn listing_failure_yields_empty() {
        let ov = NameOverrides::new();
        assert!(list_directory(Path::new("/no/such/dir/anywhere"), &ov).is_empty());
    }
}
