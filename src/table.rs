//! The flat exchange model shared by the export and import pipelines.

use std::collections::{HashMap, HashSet};

/// Languages that always lead the column order, whether or not they were found.
pub const DEFAULT_LANGUAGES: [&str; 3] = ["en", "nl", "fr"];

/// A sparse key × language matrix of translated strings.
///
/// Keys and languages are ordered sets: they keep the order in which they were
/// first added and ignore duplicates. A cell exists only when the language
/// actually has a value for that key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    keys: Vec<String>,
    key_set: HashSet<String>,
    languages: Vec<String>,
    cells: HashMap<String, HashMap<String, String>>,
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationTable {
    /// Creates a table whose language columns are seeded with [`DEFAULT_LANGUAGES`].
    pub fn new() -> Self {
        Self::with_languages(DEFAULT_LANGUAGES)
    }

    /// Creates a table with no languages at all.
    pub fn empty() -> Self {
        TranslationTable {
            keys: Vec::new(),
            key_set: HashSet::new(),
            languages: Vec::new(),
            cells: HashMap::new(),
        }
    }

    /// Creates a table whose language columns are seeded with `languages`.
    pub fn with_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::empty();
        for language in languages {
            table.add_language(language);
        }
        table
    }

    /// Appends a language column unless it is already present.
    ///
    /// Returns `true` if the language was added.
    pub fn add_language(&mut self, language: impl Into<String>) -> bool {
        let language = language.into();
        if self.languages.contains(&language) {
            return false;
        }
        self.languages.push(language);
        true
    }

    /// Appends a key unless it is already present.
    ///
    /// Returns `true` if the key was added.
    pub fn add_key(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.key_set.contains(&key) {
            return false;
        }
        self.key_set.insert(key.clone());
        self.keys.push(key);
        true
    }

    /// Sets the cell for `(key, language)`, registering both as needed.
    ///
    /// Returns the value the cell held before, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        language: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let key = key.into();
        let language = language.into();
        self.add_key(key.as_str());
        self.add_language(language.as_str());
        self.cells
            .entry(language)
            .or_default()
            .insert(key, value.into())
    }

    pub fn cell(&self, key: &str, language: &str) -> Option<&str> {
        self.cells
            .get(language)
            .and_then(|column| column.get(key))
            .map(String::as_str)
    }

    pub fn contains(&self, key: &str, language: &str) -> bool {
        self.cell(key, language).is_some()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of cells filled in for `language`.
    pub fn translation_count(&self, language: &str) -> usize {
        self.cells.get(language).map_or(0, HashMap::len)
    }

    /// All `(key, value)` pairs of one language, in key order.
    pub fn entries_for<'a>(&'a self, language: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
        let column = self.cells.get(language);
        self.keys.iter().filter_map(move |key| {
            column
                .and_then(|column| column.get(key))
                .map(|value| (key.as_str(), value.as_str()))
        })
    }

    /// One row per key: the key followed by a cell per language column.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<Option<&str>>)> {
        self.keys.iter().map(move |key| {
            let cells = self
                .languages
                .iter()
                .map(|language| self.cell(key, language))
                .collect();
            (key.as_str(), cells)
        })
    }
}
