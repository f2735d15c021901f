//! Discovery of translation modules under a resource root.
//!
//! The expected layout is
//!
//! ```text
//! <root>/<lang>/<module>.php
//! <root>/vendor/<vendor>/<package>/<lang>/<module>.php
//! ```
//!
//! Every module is flattened into the returned [`TranslationTable`] under the
//! key prefix `<module>.` or `vendor.<vendor>.<package>.<module>.`.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    flatten::{KeyCollision, flatten_into},
    key_path,
    options::ExportOptions,
    store::{Listing, ResourceStore},
    table::TranslationTable,
};

/// A language directory that was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDirectory {
    pub path: PathBuf,
    pub language: String,
    /// Key prefix applied to this directory's modules (empty outside vendor overrides).
    pub prefix: String,
    /// Number of module files loaded.
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// A language directory whose name is not a language identifier.
    UnrecognizedLanguage { language: String, path: PathBuf },
    /// A flat key produced twice for one language; the first value was kept.
    KeyCollision(KeyCollision),
    /// A module whose name contains the key separator. Its keys are exported,
    /// but an import nests them under the part before the first separator.
    DottedModuleName { language: String, path: PathBuf },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanWarning::UnrecognizedLanguage { language, path } => write!(
                f,
                "`{language}` is not a language code ({})",
                path.display()
            ),
            ScanWarning::KeyCollision(collision) => write!(
                f,
                "[{}] duplicate key `{}`, keeping the first value",
                collision.language, collision.key
            ),
            ScanWarning::DottedModuleName { language, path } => write!(
                f,
                "[{language}] module name contains `{}` and will not be written back as its own file ({})",
                key_path::SEPARATOR,
                path.display()
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub scanned: Vec<ScannedDirectory>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanReport {
    pub fn files_read(&self) -> usize {
        self.scanned.iter().map(|dir| dir.files).sum()
    }
}

/// Scans the resource tree at `root` into a translation table.
pub fn scan<S: ResourceStore>(
    store: &S,
    root: &Path,
    options: &ExportOptions,
) -> Result<(TranslationTable, ScanReport), Error> {
    let mut scanner = Scanner {
        store,
        options,
        table: TranslationTable::with_languages(options.default_languages.iter().cloned()),
        report: ScanReport::default(),
    };
    scanner.scan_root(root)?;
    Ok((scanner.table, scanner.report))
}

struct Scanner<'a, S> {
    store: &'a S,
    options: &'a ExportOptions,
    table: TranslationTable,
    report: ScanReport,
}

impl<S: ResourceStore> Scanner<'_, S> {
    fn list(&self, dir: &Path) -> Result<Vec<Listing>, Error> {
        let mut listings = self.store.list_dir(dir)?;
        listings.retain(|entry| !entry.name.starts_with('.'));
        if self.options.sort_listings {
            listings.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(listings)
    }

    fn subdirectories(&self, dir: &Path) -> Result<Vec<Listing>, Error> {
        let mut listings = self.list(dir)?;
        listings.retain(|entry| {
            if !entry.is_dir {
                tracing::debug!(path = %entry.path.display(), "skipping file outside a language directory");
            }
            entry.is_dir
        });
        Ok(listings)
    }

    fn scan_root(&mut self, root: &Path) -> Result<(), Error> {
        for entry in self.subdirectories(root)? {
            if entry.name == self.options.vendor_dir {
                self.scan_vendor(&entry.path)?;
            } else {
                self.scan_language(&entry.name, &entry.path, "")?;
            }
        }
        Ok(())
    }

    fn scan_vendor(&mut self, dir: &Path) -> Result<(), Error> {
        for vendor in self.subdirectories(dir)? {
            for package in self.subdirectories(&vendor.path)? {
                let prefix =
                    key_path::join_all(&[&self.options.vendor_dir, &vendor.name, &package.name]);
                for language in self.subdirectories(&package.path)? {
                    self.scan_language(&language.name, &language.path, &prefix)?;
                }
            }
        }
        Ok(())
    }

    fn scan_language(&mut self, language: &str, dir: &Path, prefix: &str) -> Result<(), Error> {
        tracing::debug!(language, dir = %dir.display(), "scanning language directory");
        self.table.add_language(language);
        if language.parse::<LanguageIdentifier>().is_err() {
            tracing::warn!(language, dir = %dir.display(), "directory name is not a language code");
            self.report.warnings.push(ScanWarning::UnrecognizedLanguage {
                language: language.to_string(),
                path: dir.to_path_buf(),
            });
        }

        let mut files = 0;
        for entry in self.list(dir)? {
            let stem = if entry.is_dir {
                None
            } else {
                module_stem(&entry.name, &self.options.extension)
            };
            let Some(stem) = stem else {
                tracing::debug!(path = %entry.path.display(), "skipping non-module entry");
                continue;
            };

            if stem.contains(key_path::SEPARATOR) {
                tracing::warn!(language, path = %entry.path.display(), "module name contains the key separator");
                self.report.warnings.push(ScanWarning::DottedModuleName {
                    language: language.to_string(),
                    path: entry.path.clone(),
                });
            }

            let tree = self.store.read_module(&entry.path)?;
            let root = key_path::join(prefix, stem);
            let collisions = flatten_into(&mut self.table, language, &root, &tree);
            self.report
                .warnings
                .extend(collisions.into_iter().map(ScanWarning::KeyCollision));
            files += 1;
        }

        self.report.scanned.push(ScannedDirectory {
            path: dir.to_path_buf(),
            language: language.to_string(),
            prefix: prefix.to_string(),
            files,
        });
        Ok(())
    }
}

/// The module name of `file_name`, if it carries `extension`.
fn module_stem<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    (ext == extension && !stem.is_empty()).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalFs;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_languages_and_modules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "en/auth.php", "<?php return ['failed' => 'Failed'];");
        write(root, "en/messages.php", "<?php return ['nav' => ['home' => 'Home']];");
        write(root, "nl/auth.php", "<?php return ['failed' => 'Mislukt'];");

        let (table, report) = scan(&LocalFs, root, &ExportOptions::new()).unwrap();
        assert_eq!(table.keys(), ["auth.failed", "messages.nav.home"]);
        assert_eq!(table.cell("auth.failed", "nl"), Some("Mislukt"));
        assert_eq!(table.cell("messages.nav.home", "nl"), None);
        assert_eq!(report.scanned.len(), 2);
        assert_eq!(report.files_read(), 3);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_defaults_are_prepended_to_discovered_languages() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "fr/app.php", "<?php return ['x' => 'X'];");
        write(root, "de/app.php", "<?php return ['x' => 'X'];");

        let (table, _) = scan(&LocalFs, root, &ExportOptions::new()).unwrap();
        assert_eq!(table.languages(), ["en", "nl", "fr", "de"]);
    }

    #[test]
    fn test_vendor_overrides_are_prefixed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(
            root,
            "vendor/acme/pkg/en/messages.php",
            "<?php return ['greeting' => 'hi'];",
        );
        write(root, "vendor/acme/pkg/es/messages.php", "<?php return ['greeting' => 'hola'];");

        let (table, report) = scan(&LocalFs, root, &ExportOptions::new()).unwrap();
        assert_eq!(table.keys(), ["vendor.acme.pkg.messages.greeting"]);
        assert_eq!(table.cell("vendor.acme.pkg.messages.greeting", "en"), Some("hi"));
        assert_eq!(table.languages(), ["en", "nl", "fr", "es"]);
        assert_eq!(report.scanned[0].prefix, "vendor.acme.pkg");
    }

    #[test]
    fn test_empty_modules_and_groups_produce_no_keys() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "en/empty.php", "<?php return [];");
        write(root, "en/groups.php", "<?php return ['a' => [], 'b' => ['c' => []]];");

        let (table, report) = scan(&LocalFs, root, &ExportOptions::new()).unwrap();
        assert_eq!(table.key_count(), 0);
        assert_eq!(report.files_read(), 2);
    }

    #[test]
    fn test_non_module_entries_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "en.json", "{}");
        write(root, ".hidden/app.php", "<?php return ['x' => 'X'];");
        write(root, "en/notes.txt", "not a module");
        write(root, "en/.app.php.swp", "junk");
        write(root, "en/nested/deep.php", "<?php return ['x' => 'X'];");
        write(root, "en/app.php", "<?php return ['x' => 'X'];");

        let (table, report) = scan(&LocalFs, root, &ExportOptions::new()).unwrap();
        assert_eq!(table.keys(), ["app.x"]);
        assert_eq!(report.scanned.len(), 1);
        assert_eq!(report.files_read(), 1);
    }

    #[test]
    fn test_dotted_module_name_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "en/auth.php", "<?php return ['failed' => 'A'];");
        write(root, "en/auth.v2.php", "<?php return ['failed' => 'B'];");

        let (table, report) = scan(&LocalFs, root, &ExportOptions::new()).unwrap();
        assert_eq!(table.cell("auth.v2.failed", "en"), Some("B"));
        match report.warnings.as_slice() {
            [ScanWarning::DottedModuleName { language, path }] => {
                assert_eq!(language, "en");
                assert_eq!(path, &root.join("en/auth.v2.php"));
            }
            other => panic!("unexpected warnings: {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_language_is_scanned_with_warning() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "not a language!/app.php", "<?php return ['x' => 'X'];");

        let (table, report) = scan(&LocalFs, root, &ExportOptions::new()).unwrap();
        assert_eq!(table.cell("app.x", "not a language!"), Some("X"));
        assert!(matches!(
            report.warnings.as_slice(),
            [ScanWarning::UnrecognizedLanguage { .. }]
        ));
    }

    #[test]
    fn test_broken_module_aborts_with_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "en/broken.php", "<?php return ['x' => ");

        let err = scan(&LocalFs, root, &ExportOptions::new()).unwrap_err();
        assert!(err.to_string().contains("broken.php"));
    }

    #[test]
    fn test_missing_root_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let err = scan(&LocalFs, &temp_dir.path().join("nope"), &ExportOptions::new()).unwrap_err();
        assert!(matches!(err, Error::UnreadableSource { .. }));
    }

    #[test]
    fn test_module_stem() {
        assert_eq!(module_stem("auth.php", "php"), Some("auth"));
        assert_eq!(module_stem("auth.v2.php", "php"), Some("auth.v2"));
        assert_eq!(module_stem("auth.json", "php"), None);
        assert_eq!(module_stem("php", "php"), None);
    }
}
