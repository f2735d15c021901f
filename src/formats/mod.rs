//! File formats supported by lang2csv.
//!
//! - [`csv`]: the flat exchange table, implemented on [`crate::TranslationTable`].
//! - [`php`]: one translation module of the resource tree.

pub mod csv;
pub mod php;

pub use php::Format as PhpFormat;

/// File extension of translation modules in the resource tree.
pub const PHP_EXTENSION: &str = "php";
