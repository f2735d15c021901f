//! Options for the export and import pipelines.

use crate::{formats::PHP_EXTENSION, table::DEFAULT_LANGUAGES};

/// Name of the directory holding vendor package overrides.
pub const VENDOR_DIR: &str = "vendor";

/// Behavior options for [`crate::export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Languages that always lead the column order.
    pub default_languages: Vec<String>,
    /// Extension of the module files to load, without the dot.
    pub extension: String,
    /// Name of the vendor override directory at the resource root.
    pub vendor_dir: String,
    /// Sort directory listings by name so the output does not depend on the platform.
    pub sort_listings: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            default_languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            extension: PHP_EXTENSION.to_string(),
            vendor_dir: VENDOR_DIR.to_string(),
            sort_listings: true,
        }
    }
}

impl ExportOptions {
    /// Creates default export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the leading language columns.
    pub fn with_default_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the module file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Enables/disables sorting of directory listings.
    pub fn with_sorted_listings(mut self, sort_listings: bool) -> Self {
        self.sort_listings = sort_listings;
        self
    }
}

/// Behavior options for [`crate::import`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Extension given to written module files, without the dot.
    pub extension: String,
    /// Top-level key (and directory) of vendor package overrides.
    pub vendor_dir: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            extension: PHP_EXTENSION.to_string(),
            vendor_dir: VENDOR_DIR.to_string(),
        }
    }
}

impl ImportOptions {
    /// Creates default import options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_defaults() {
        let options = ExportOptions::new();
        assert_eq!(options.default_languages, ["en", "nl", "fr"]);
        assert_eq!(options.extension, "php");
        assert_eq!(options.vendor_dir, "vendor");
        assert!(options.sort_listings);
    }

    #[test]
    fn test_export_builder() {
        let options = ExportOptions::new()
            .with_default_languages(["de"])
            .with_sorted_listings(false)
            .with_extension("inc");
        assert_eq!(options.default_languages, ["de"]);
        assert!(!options.sort_listings);
        assert_eq!(options.extension, "inc");
    }

    #[test]
    fn test_import_builder() {
        let options = ImportOptions::new().with_extension("inc");
        assert_eq!(options.extension, "inc");
        assert_eq!(options.vendor_dir, "vendor");
    }
}
