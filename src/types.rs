//! Core types for nested translation trees.
//!
//! A translation file is a [`Tree`] of [`Node`]s: every node is either a
//! translated string or a nested container. Children keep their insertion
//! order, so files are written back in the order they were read.

use std::collections::HashMap;

/// One value in a translation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single translated string.
    Scalar(String),

    /// A nested group of keys.
    Container(Tree),
}

impl Node {
    /// Shorthand for a scalar node.
    pub fn scalar(value: impl Into<String>) -> Self {
        Node::Scalar(value.into())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(value) => Some(value),
            Node::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&Tree> {
        match self {
            Node::Container(tree) => Some(tree),
            Node::Scalar(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(value)
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Node::Container(tree)
    }
}

/// An insertion-ordered mapping from key segment to [`Node`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<(String, Node)>,
    index: HashMap<String, usize>,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Follows `path` from this tree down to a node.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        let (last, parents) = path.split_last()?;
        let mut tree = self;
        for segment in parents {
            tree = tree.get(segment.as_ref())?.as_container()?;
        }
        tree.get(last.as_ref())
    }

    /// Inserts `node` under `key`.
    ///
    /// An existing key keeps its position and has its node replaced; the old
    /// node is returned.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let node = node.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, node)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, node));
                None
            }
        }
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let i = self.index.remove(key)?;
        let (_, node) = self.entries.remove(i);
        for (_, position) in self.index.iter_mut() {
            if *position > i {
                *position -= 1;
            }
        }
        Some(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of scalar values anywhere below this tree.
    pub fn scalar_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, node)| match node {
                Node::Scalar(_) => 1,
                Node::Container(tree) => tree.scalar_count(),
            })
            .sum()
    }
}

impl IntoIterator for Tree {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for (key, node) in iter {
            tree.insert(key, node);
        }
        tree
    }
}
