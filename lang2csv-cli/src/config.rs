use std::{
    fs,
    path::{Path, PathBuf},
};

use lang2csv::{ExportOptions, table::DEFAULT_LANGUAGES};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".lang2csv.json";

/// Project settings read from `.lang2csv.json`.
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_lang_dir")]
    pub lang_dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_languages")]
    pub default_languages: Vec<String>,
    #[serde(default = "default_sort_listings")]
    pub sort_listings: bool,
}

fn default_lang_dir() -> String {
    "resources/lang".to_string()
}

fn default_output() -> String {
    "storage/app/translations.csv".to_string()
}

fn default_languages() -> Vec<String> {
    DEFAULT_LANGUAGES.map(String::from).to_vec()
}

fn default_sort_listings() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lang_dir: default_lang_dir(),
            output: default_output(),
            default_languages: default_languages(),
            sort_listings: default_sort_listings(),
        }
    }
}

impl Config {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::new()
            .with_default_languages(self.default_languages.iter().cloned())
            .with_sorted_listings(self.sort_listings)
    }
}

/// Looks for the config file in `start_dir` and its ancestors, stopping at a
/// repository root.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// A loaded config and the directory its relative paths refer to.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: Config,
    pub base_dir: PathBuf,
    /// True if the config was read from a file, false if using defaults.
    pub from_file: bool,
}

impl ConfigLoadResult {
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }
}

/// Loads `explicit` if given, otherwise the nearest config file above
/// `start_dir`, otherwise the defaults.
pub fn load_config(explicit: Option<&Path>, start_dir: &Path) -> Result<ConfigLoadResult, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find_config_file(start_dir) {
            Some(path) => path,
            None => {
                return Ok(ConfigLoadResult {
                    config: Config::default(),
                    base_dir: start_dir.to_path_buf(),
                    from_file: false,
                });
            }
        },
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Cannot read config file {}: {}", path.display(), e))?;
    let config: Config = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "loaded config");

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start_dir.to_path_buf());
    Ok(ConfigLoadResult {
        config,
        base_dir,
        from_file: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.lang_dir, "resources/lang");
        assert_eq!(config.output, "storage/app/translations.csv");
        assert_eq!(config.default_languages, ["en", "nl", "fr"]);
        assert!(config.sort_listings);
    }

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{
            "langDir": "lang",
            "defaultLanguages": ["en", "de"]
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.lang_dir, "lang");
        assert_eq!(config.default_languages, ["en", "de"]);
        assert_eq!(config.output, "storage/app/translations.csv");
        assert!(config.sort_listings);
    }

    #[test]
    fn test_find_config_file_in_parent() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("app").join("Http");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        let found = find_config_file(&sub_dir).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_find_config_file_stops_at_repository_root() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        assert!(find_config_file(&repo).is_none());
    }

    #[test]
    fn test_load_config_resolves_against_config_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "output": "out/t.csv", "sortListings": false }"#,
        )
        .unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        let loaded = load_config(None, &nested).unwrap();
        assert!(loaded.from_file);
        assert!(!loaded.config.sort_listings);
        assert_eq!(
            loaded.resolve(&loaded.config.output),
            dir.path().join("out/t.csv")
        );
    }

    #[test]
    fn test_load_config_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config(Some(&path), dir.path()).unwrap_err();
        assert!(err.contains("Failed to parse config file"));
    }
}
