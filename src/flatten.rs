//! Flattening nested translation trees into dotted keys.

use crate::{
    key_path,
    table::TranslationTable,
    types::{Node, Tree},
};

/// A flat key that was produced twice for the same language.
///
/// This only happens when a source key itself contains the separator, e.g.
/// `['a.b' => 'x', 'a' => ['b' => 'y']]`. The first value is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub language: String,
    pub key: String,
}

/// Flattens `tree` into `(flat key, value)` pairs, in tree order.
///
/// Every key is prefixed with `prefix`. Empty containers produce nothing.
pub fn flatten(prefix: &str, tree: &Tree) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    flatten_tree(prefix, tree, &mut pairs);
    pairs
}

fn flatten_tree(prefix: &str, tree: &Tree, out: &mut Vec<(String, String)>) {
    for (segment, node) in tree.iter() {
        let key = key_path::join(prefix, segment);
        match node {
            Node::Scalar(value) => out.push((key, value.clone())),
            Node::Container(children) => flatten_tree(&key, children, out),
        }
    }
}

/// Flattens `tree` and records every value under `language` in `table`.
///
/// Returns the keys that were already present for this language.
pub fn flatten_into(
    table: &mut TranslationTable,
    language: &str,
    prefix: &str,
    tree: &Tree,
) -> Vec<KeyCollision> {
    let mut collisions = Vec::new();
    for (key, value) in flatten(prefix, tree) {
        if table.contains(&key, language) {
            tracing::warn!(language, key = %key, "duplicate flat key, keeping first value");
            collisions.push(KeyCollision {
                language: language.to_string(),
                key,
            });
            continue;
        }
        table.insert(key, language, value);
    }
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_tree() -> Tree {
        let nav: Tree = [("home", "Home"), ("about", "About")].into_iter().collect();
        let mut tree = Tree::new();
        tree.insert("title", "Welcome");
        tree.insert("nav", nav);
        tree.insert("empty", Tree::new());
        tree
    }

    #[test]
    fn test_flatten_nested_tree() {
        let pairs = flatten("messages", &sample_tree());
        assert_eq!(
            pairs,
            vec![
                ("messages.title".to_string(), "Welcome".to_string()),
                ("messages.nav.home".to_string(), "Home".to_string()),
                ("messages.nav.about".to_string(), "About".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_containers_are_dropped() {
        let mut deep = Tree::new();
        deep.insert("level1", [("level2", Tree::new())].into_iter().collect::<Tree>());
        assert!(flatten("file", &deep).is_empty());
        assert!(flatten("file", &Tree::new()).is_empty());
    }

    #[test]
    fn test_flatten_is_injective_for_plain_segments() {
        let pairs = flatten("", &sample_tree());
        let keys: HashSet<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys.len(), pairs.len());
    }

    #[test]
    fn test_flatten_into_registers_keys_and_cells() {
        let mut table = TranslationTable::new();
        let collisions = flatten_into(&mut table, "de", "messages", &sample_tree());
        assert!(collisions.is_empty());
        assert_eq!(table.key_count(), 3);
        assert_eq!(table.cell("messages.nav.home", "de"), Some("Home"));
        assert_eq!(table.languages(), ["en", "nl", "fr", "de"]);
    }

    #[test]
    fn test_flatten_into_reports_collisions() {
        let mut tree = Tree::new();
        tree.insert("a.b", "dotted");
        tree.insert("a", [("b", "nested")].into_iter().collect::<Tree>());

        let mut table = TranslationTable::new();
        let collisions = flatten_into(&mut table, "en", "", &tree);
        assert_eq!(
            collisions,
            vec![KeyCollision {
                language: "en".to_string(),
                key: "a.b".to_string()
            }]
        );
        assert_eq!(table.cell("a.b", "en"), Some("dotted"));
    }
}
