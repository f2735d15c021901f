//! The export pipeline: resource tree → translation table → CSV file.

use std::{fs, path::Path};

pub use crate::options::ExportOptions;

use crate::{
    error::Error,
    scanner::{self, ScanReport},
    store::{LocalFs, ResourceStore},
    table::TranslationTable,
    traits::Parser,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub scan: ScanReport,
    /// Header languages, in column order.
    pub languages: Vec<String>,
    /// Number of rows below the header.
    pub keys: usize,
}

/// Scans the resource tree at `root` into a table.
pub fn export<S: ResourceStore>(
    store: &S,
    root: &Path,
    options: &ExportOptions,
) -> Result<(TranslationTable, ScanReport), Error> {
    scanner::scan(store, root, options)
}

/// Scans the resource tree at `root` and writes it as CSV to `output`.
///
/// Missing parent directories of `output` are created. Nothing is written if
/// the scan fails.
pub fn export_to_file(
    root: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportReport, Error> {
    let output = output.as_ref();
    let (table, scan) = export(&LocalFs, root.as_ref(), options)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::write_failure(parent, e))?;
    }
    table.write_to(output)?;
    tracing::debug!(output = %output.display(), keys = table.key_count(), "table written");

    Ok(ExportReport {
        scan,
        languages: table.languages().to_vec(),
        keys: table.key_count(),
    })
}
