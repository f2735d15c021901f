#![forbid(unsafe_code)]
//! Flatten translation resource trees into one CSV file, and write them back.
//!
//! Translators edit a single spreadsheet instead of dozens of nested PHP
//! modules. The resource tree keeps its structure: every translation becomes
//! one row keyed by its dotted path (`<module>.<group>.<key>`, or
//! `vendor.<vendor>.<package>.<module>.<key>` for vendor overrides), with one
//! column per language.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lang2csv::{ExportOptions, ImportOptions, export_to_file, import_file};
//!
//! // resources/lang/<lang>/*.php -> one CSV file
//! let report = export_to_file("resources/lang", "translations.csv", &ExportOptions::new())?;
//! println!("{} keys", report.keys);
//!
//! // ... and back, overwriting the module files
//! import_file("translations.csv", "resources/lang", &ImportOptions::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Pipelines
//!
//! - **Export**: [`scanner`] walks the tree, [`flatten`] turns each module into
//!   dotted keys, and the [`TranslationTable`] is written by [`formats::csv`].
//! - **Import**: [`formats::csv`] reads the table, [`nest`] rebuilds one tree per
//!   language, and [`emitter`] writes the module files with [`formats::php`].

pub mod emitter;
pub mod error;
pub mod exporter;
pub mod flatten;
pub mod formats;
pub mod importer;
pub mod key_path;
pub mod nest;
pub mod options;
pub mod scanner;
pub mod store;
pub mod table;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    exporter::{ExportReport, export, export_to_file},
    importer::{ImportReport, ImportWarning, import, import_file},
    options::{ExportOptions, ImportOptions},
    store::{LocalFs, ResourceStore},
    table::TranslationTable,
    types::{Node, Tree},
};
