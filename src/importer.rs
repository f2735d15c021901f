//! The import pipeline: CSV table → per-language trees → module files.
//!
//! The whole table is parsed before anything is written, so a malformed file
//! leaves the resource tree untouched. Writing itself is not transactional: if
//! a write fails halfway, languages handled before the failure stay updated.

use std::{fmt, path::Path};

pub use crate::options::ImportOptions;

use crate::{
    emitter::{self, WriteReport, WrittenFile, is_safe_file_name},
    error::Error,
    nest::{ConflictKind, StructuralConflict, build_tree},
    store::{LocalFs, ResourceStore},
    table::TranslationTable,
    traits::Parser,
};

/// Something the import could not represent and skipped or overwrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// Two keys claimed the same path; the later one won.
    Conflict {
        language: String,
        conflict: StructuralConflict,
    },
    /// A vendor or vendor package entry that is a string instead of a group.
    SkippedPackage { language: String, key: String },
    /// An entry that cannot be written as a module file.
    SkippedEntry {
        language: String,
        key: String,
        reason: &'static str,
    },
    /// A language column whose name cannot be used as a directory.
    SkippedLanguage { language: String },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::Conflict { language, conflict } => {
                let what = match conflict.kind {
                    ConflictKind::ScalarReplacedByContainer => "string replaced by a group",
                    ConflictKind::ContainerReplacedByScalar => "group replaced by a string",
                };
                write!(
                    f,
                    "[{language}] `{}`: {what} at `{}`",
                    conflict.key, conflict.path
                )
            }
            ImportWarning::SkippedPackage { language, key } => {
                write!(f, "[{language}] `{key}` is not a vendor package group, skipped")
            }
            ImportWarning::SkippedEntry {
                language,
                key,
                reason,
            } => write!(f, "[{language}] `{key}` skipped: {reason}"),
            ImportWarning::SkippedLanguage { language } => {
                write!(f, "language column `{language}` is not a valid directory name, skipped")
            }
        }
    }
}

/// Number of translations imported for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSummary {
    pub language: String,
    pub translations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub languages: Vec<LanguageSummary>,
    pub files: Vec<WrittenFile>,
    pub warnings: Vec<ImportWarning>,
}

/// Writes every language of `table` as module files below `target`.
pub fn import<S: ResourceStore>(
    store: &S,
    table: &TranslationTable,
    target: &Path,
    options: &ImportOptions,
) -> Result<ImportReport, Error> {
    let mut report = ImportReport::default();
    let mut written = WriteReport::default();

    for language in table.languages() {
        if !is_safe_file_name(language) || *language == options.vendor_dir {
            tracing::warn!(language = %language, "language cannot be used as a directory name, skipping");
            report.warnings.push(ImportWarning::SkippedLanguage {
                language: language.clone(),
            });
            continue;
        }

        let translations = table.translation_count(language);
        tracing::debug!(language = %language, translations, "rebuilding language tree");
        report.languages.push(LanguageSummary {
            language: language.clone(),
            translations,
        });

        let (tree, conflicts) = build_tree(table.entries_for(language));
        report
            .warnings
            .extend(conflicts.into_iter().map(|conflict| ImportWarning::Conflict {
                language: language.clone(),
                conflict,
            }));

        emitter::write_language(store, target, language, tree, options, &mut written)?;
    }

    report.files = written.files;
    report.warnings.extend(written.warnings);
    Ok(report)
}

/// Reads the CSV file at `source` and writes its languages below `target`.
pub fn import_file(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<ImportReport, Error> {
    let table = TranslationTable::read_from(source)?;
    import(&LocalFs, &table, target.as_ref(), options)
}
