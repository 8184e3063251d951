//! Expansion-State Snapshot: captures which directories are open as a set of
//! paths (nodes are invalidated by a rebuild, paths are not) and reapplies
//! that set to a freshly rebuilt tree.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::browser::overrides::NameOverrides;
use crate::browser::tree::{NodeId, NodeKind, Tree};

/// The set of open-directory paths captured before a tree rebuild.
#[derive(Debug, Clone, Default)]
pub struct ExpansionSnapshot {
    paths: HashSet<PathBuf>,
}

impl ExpansionSnapshot {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &std::path::Path) -> bool {
        self.paths.contains(path)
    }
}

/// Walk the materialized tree depth-first and collect the path of every open
/// directory, root included.
pub fn capture(tree: &Tree) -> ExpansionSnapshot {
    let mut snapshot = ExpansionSnapshot::default();
    capture_node(tree, tree.root_id(), &mut snapshot);
    snapshot
}

fn capture_node(tree: &Tree, id: NodeId, snapshot: &mut ExpansionSnapshot) {
    let node = tree.node(id);
    if node.kind == NodeKind::Directory && node.is_open {
        snapshot.paths.insert(node.path.clone());
    }
    for &child in &node.children {
        capture_node(tree, child, snapshot);
    }
}

/// Walk the rebuilt tree depth-first; every directory whose path is in the
/// snapshot is marked open and force-expanded, then its freshly materialized
/// children are visited in turn so nested open state is restored in one
/// pass. No-op for an empty snapshot.
pub fn restore(tree: &mut Tree, snapshot: &ExpansionSnapshot, overrides: &NameOverrides) {
    if snapshot.is_empty() {
        return;
    }
    restore_node(tree, tree.root_id(), snapshot, overrides);
}

fn restore_node(
    tree: &mut Tree,
    id: NodeId,
    snapshot: &ExpansionSnapshot,
    overrides: &NameOverrides,
) {
    let node = tree.node(id);
    if node.kind == NodeKind::Directory && snapshot.contains(&node.path) {
        tree.set_open(id, true);
        tree.expand(id, overrides);
    }
    let children = tree.node(id).children.clone();
    for child in children {
        restore_node(tree, child, snapshot, overrides);
    }
}
