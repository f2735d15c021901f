//! Writing rebuilt language trees back to module files.
//!
//! For language `L`, top-level key `file` becomes `<target>/L/file.php`, and
//! `vendor.<vendor>.<package>.file` becomes
//! `<target>/vendor/<vendor>/<package>/L/file.php`.

use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    importer::ImportWarning,
    key_path,
    nest::split_vendor,
    options::ImportOptions,
    store::ResourceStore,
    types::{Node, Tree},
};

/// A module file that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub language: String,
    pub translations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub files: Vec<WrittenFile>,
    pub warnings: Vec<ImportWarning>,
}

/// Writes one language's tree below `target`, routing the vendor subtree to
/// the vendor override directories.
///
/// Fails if a directory cannot be created or a file cannot be written. Parts
/// of the tree that cannot be represented as files are skipped and reported.
pub fn write_language<S: ResourceStore>(
    store: &S,
    target: &Path,
    language: &str,
    tree: Tree,
    options: &ImportOptions,
    report: &mut WriteReport,
) -> Result<(), Error> {
    let mut emitter = Emitter {
        store,
        options,
        language,
        report,
    };

    let (tree, vendor) = split_vendor(tree, &options.vendor_dir);
    match vendor {
        Some(Node::Container(vendors)) => emitter.write_vendors(target, vendors)?,
        Some(Node::Scalar(_)) => emitter.skip(options.vendor_dir.clone(), "not a group of vendors"),
        None => {}
    }

    emitter.write_directory(&target.join(language), tree, "")
}

struct Emitter<'a, S> {
    store: &'a S,
    options: &'a ImportOptions,
    language: &'a str,
    report: &'a mut WriteReport,
}

impl<S: ResourceStore> Emitter<'_, S> {
    fn write_vendors(&mut self, target: &Path, vendors: Tree) -> Result<(), Error> {
        let vendor_root = target.join(&self.options.vendor_dir);
        for (vendor, node) in vendors {
            let vendor_key = key_path::join(&self.options.vendor_dir, &vendor);
            let packages = match node {
                Node::Container(packages) if is_safe_file_name(&vendor) => packages,
                _ => {
                    self.skip_package(vendor_key);
                    continue;
                }
            };
            for (package, node) in packages {
                let package_key = key_path::join(&vendor_key, &package);
                match node {
                    Node::Container(modules) if is_safe_file_name(&package) => {
                        let dir = vendor_root.join(&vendor).join(&package).join(self.language);
                        self.write_directory(&dir, modules, &package_key)?;
                    }
                    _ => self.skip_package(package_key),
                }
            }
        }
        Ok(())
    }

    fn write_directory(&mut self, dir: &Path, modules: Tree, prefix: &str) -> Result<(), Error> {
        if modules.is_empty() {
            return Ok(());
        }
        tracing::debug!(dir = %dir.display(), modules = modules.len(), "writing language directory");
        self.store.create_dir_all(dir)?;

        for (module, node) in modules {
            let key = key_path::join(prefix, &module);
            let translations = match node {
                Node::Container(translations) if is_safe_file_name(&module) => translations,
                Node::Container(_) => {
                    self.skip(key, "not a valid file name");
                    continue;
                }
                Node::Scalar(_) => {
                    self.skip(key, "a translation needs a file segment");
                    continue;
                }
            };

            let path = dir.join(format!("{module}.{}", self.options.extension));
            tracing::debug!(path = %path.display(), "writing module");
            self.store.write_module(&path, &translations)?;
            self.report.files.push(WrittenFile {
                path,
                language: self.language.to_string(),
                translations: translations.scalar_count(),
            });
        }
        Ok(())
    }

    fn skip_package(&mut self, key: String) {
        tracing::warn!(language = self.language, package = %key, "vendor package is not a group, skipping");
        self.report.warnings.push(ImportWarning::SkippedPackage {
            language: self.language.to_string(),
            key,
        });
    }

    fn skip(&mut self, key: String, reason: &'static str) {
        tracing::warn!(language = self.language, key = %key, reason, "skipping entry");
        self.report.warnings.push(ImportWarning::SkippedEntry {
            language: self.language.to_string(),
            key,
            reason,
        });
    }
}

/// True when `name` can be used as a single path component.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}
