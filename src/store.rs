//! File-tree access used by the scanner (reading) and the emitter (writing).

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::Error, formats::php, traits::Parser, types::Tree};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Read and write access to a resource tree.
pub trait ResourceStore {
    /// Lists the entries of `dir`, in whatever order the store yields them.
    fn list_dir(&self, dir: &Path) -> Result<Vec<Listing>, Error>;

    /// Loads the translation tree a module file returns.
    fn read_module(&self, path: &Path) -> Result<Tree, Error>;

    /// Creates `dir` and all of its missing parents.
    fn create_dir_all(&self, dir: &Path) -> Result<(), Error>;

    /// Writes `tree` as a module file at `path`, replacing any existing file.
    fn write_module(&self, path: &Path, tree: &Tree) -> Result<(), Error>;
}

/// The local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl ResourceStore for LocalFs {
    fn list_dir(&self, dir: &Path) -> Result<Vec<Listing>, Error> {
        let entries = fs::read_dir(dir).map_err(|e| Error::unreadable(dir, e))?;
        let mut listings = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::unreadable(dir, e))?;
            let path = entry.path();
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(name) => {
                    tracing::warn!(?name, dir = %dir.display(), "skipping entry with a non UTF-8 name");
                    continue;
                }
            };
            listings.push(Listing {
                name,
                is_dir: path.is_dir(),
                path,
            });
        }
        Ok(listings)
    }

    fn read_module(&self, path: &Path) -> Result<Tree, Error> {
        php::Format::read_from(path).map(Tree::from)
    }

    fn create_dir_all(&self, dir: &Path) -> Result<(), Error> {
        fs::create_dir_all(dir).map_err(|e| Error::write_failure(dir, e))
    }

    fn write_module(&self, path: &Path, tree: &Tree) -> Result<(), Error> {
        php::Format::new(tree.clone()).write_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_dir_reports_kinds() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("en")).unwrap();
        fs::write(temp_dir.path().join("README.md"), "hi").unwrap();

        let mut listings = LocalFs.list_dir(temp_dir.path()).unwrap();
        listings.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "README.md");
        assert!(!listings[0].is_dir);
        assert_eq!(listings[1].name, "en");
        assert!(listings[1].is_dir);
    }

    #[test]
    fn test_list_missing_dir_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let err = LocalFs.list_dir(&temp_dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::UnreadableSource { .. }));
    }

    #[test]
    fn test_write_then_read_module() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("en");
        LocalFs.create_dir_all(&dir).unwrap();

        let tree: Tree = [("greeting", "hi")].into_iter().collect();
        let path = dir.join("messages.php");
        LocalFs.write_module(&path, &tree).unwrap();
        assert_eq!(LocalFs.read_module(&path).unwrap(), tree);
    }
}
