use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use lang2csv::{
    Error, ImportOptions, LocalFs, TranslationTable, import, traits::Parser,
};

use crate::config::ConfigLoadResult;

pub const CONFIRMATION_PROMPT: &str =
    "This action will overwrite all your localization files. Are you sure?";

/// Imports a CSV file, overwriting the module files below the target.
///
/// The file is parsed completely before asking for confirmation, so a broken
/// file is reported without touching anything.
pub fn run_import_command(
    csv_file: &Path,
    target: Option<PathBuf>,
    force: bool,
    config: &ConfigLoadResult,
) -> Result<(), String> {
    if !csv_file.is_file() {
        return Err(format!(
            "Provided file is not readable: {}",
            csv_file.display()
        ));
    }
    let table = TranslationTable::read_from(csv_file).map_err(|e| match e {
        Error::UnreadableSource { path, .. } => {
            format!("Provided file is not readable: {}", path.display())
        }
        other => other.to_string(),
    })?;

    if !force && !confirm_overwrite()? {
        println!("Import cancelled.");
        return Ok(());
    }

    let target = target.unwrap_or_else(|| config.resolve(&config.config.lang_dir));
    let report =
        import(&LocalFs, &table, &target, &ImportOptions::new()).map_err(|e| e.to_string())?;

    for summary in &report.languages {
        println!(
            "Writing {} translations for {}",
            summary.translations, summary.language
        );
        for file in report
            .files
            .iter()
            .filter(|file| file.language == summary.language)
        {
            println!(
                "Writing {} translations to {}",
                file.translations,
                file.path.display()
            );
        }
    }
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    let total: usize = report.languages.iter().map(|s| s.translations).sum();
    println!(
        "✅ Imported {} translations in {} languages ({} files written)",
        total,
        report.languages.len(),
        report.files.len()
    );
    Ok(())
}

fn confirm_overwrite() -> Result<bool, String> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(
            "Refusing to overwrite localization files without confirmation. Use --force to skip the prompt."
                .to_string(),
        );
    }

    print!("{} [y/N] ", CONFIRMATION_PROMPT);
    io::stdout()
        .flush()
        .map_err(|e| format!("Failed to write prompt: {}", e))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| format!("Failed to read answer: {}", e))?;
    Ok(is_confirmed(&answer))
}

/// True for a `y` or `yes` answer, in any case.
pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_confirmed() {
        assert!(is_confirmed("y\n"));
        assert!(is_confirmed(" YES "));
        assert!(!is_confirmed("\n"));
        assert!(!is_confirmed("no"));
        assert!(!is_confirmed("yep"));
    }
}
