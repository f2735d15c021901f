//! Re-nesting dotted keys into translation trees.
//!
//! The inverse of [`crate::flatten`]. A source file cannot hold both a string
//! and a group at the same path, so when keys such as `a.b` and `a.b.c` are both
//! present the key inserted last wins and the other is reported as a
//! [`StructuralConflict`].

use crate::{
    key_path,
    types::{Node, Tree},
};

/// What was overwritten when two keys claimed the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A string was replaced by a group because a longer key came later.
    ScalarReplacedByContainer,
    /// A group was replaced by a string because a shorter key came later.
    ContainerReplacedByScalar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralConflict {
    /// The key whose insertion caused the overwrite.
    pub key: String,
    /// The path at which the overwrite happened.
    pub path: String,
    pub kind: ConflictKind,
}

/// Builds a nested tree from `(flat key, value)` pairs.
pub fn build_tree<'a, I>(entries: I) -> (Tree, Vec<StructuralConflict>)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut tree = Tree::new();
    let mut conflicts = Vec::new();
    for (key, value) in entries {
        insert_path(&mut tree, key, value, &mut conflicts);
    }
    (tree, conflicts)
}

/// Inserts `value` at the dotted `key`, creating intermediate groups.
pub fn insert_path(
    tree: &mut Tree,
    key: &str,
    value: &str,
    conflicts: &mut Vec<StructuralConflict>,
) {
    let segments: Vec<&str> = key_path::split(key).collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = tree;
    for (depth, segment) in parents.iter().enumerate() {
        if !current.get(segment).is_some_and(Node::is_container) {
            if let Some(Node::Scalar(_)) = current.insert(*segment, Tree::new()) {
                let conflict = StructuralConflict {
                    key: key.to_string(),
                    path: key_path::join_all(&segments[..=depth]),
                    kind: ConflictKind::ScalarReplacedByContainer,
                };
                tracing::warn!(key, path = %conflict.path, "string replaced by group");
                conflicts.push(conflict);
            }
        }
        current = match current.get_mut(segment) {
            Some(Node::Container(child)) => child,
            _ => return,
        };
    }

    if let Some(Node::Container(_)) = current.insert(*last, value) {
        tracing::warn!(key, "group replaced by string");
        conflicts.push(StructuralConflict {
            key: key.to_string(),
            path: key.to_string(),
            kind: ConflictKind::ContainerReplacedByScalar,
        });
    }
}

/// Detaches the vendor override subtree from a language tree.
pub fn split_vendor(mut tree: Tree, vendor_dir: &str) -> (Tree, Option<Node>) {
    let vendor = tree.remove(vendor_dir);
    (tree, vendor)
}
