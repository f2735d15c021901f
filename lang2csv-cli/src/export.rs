use std::path::PathBuf;

use lang2csv::export_to_file;

use crate::config::ConfigLoadResult;

/// Exports the resource tree to one CSV file.
///
/// Flags take precedence over the config file.
pub fn run_export_command(
    lang_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    config: &ConfigLoadResult,
) -> Result<(), String> {
    let lang_dir = lang_dir.unwrap_or_else(|| config.resolve(&config.config.lang_dir));
    let output = output.unwrap_or_else(|| config.resolve(&config.config.output));
    let options = config.config.export_options();

    let report = export_to_file(&lang_dir, &output, &options).map_err(|e| e.to_string())?;

    for dir in &report.scan.scanned {
        println!("Scanning {} for {}", dir.path.display(), dir.language);
    }
    for warning in &report.scan.warnings {
        eprintln!("Warning: {}", warning);
    }

    println!(
        "✅ Exported {} keys in {} languages to {}",
        report.keys,
        report.languages.len(),
        output.display()
    );
    Ok(())
}
