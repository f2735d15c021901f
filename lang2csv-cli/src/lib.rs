//! CLI library for testing purposes

pub mod config;
pub mod export;
pub mod import;

pub use config::{CONFIG_FILE_NAME, Config, ConfigLoadResult, load_config};
pub use export::run_export_command;
pub use import::{CONFIRMATION_PROMPT, is_confirmed, run_import_command};
