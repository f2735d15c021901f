use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lang2csv_cli::{load_config, run_export_command, run_import_command};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export every translation module to a single CSV file.
    Export {
        /// Root of the translation tree (default: `resources/lang`)
        #[arg(long)]
        lang_dir: Option<PathBuf>,

        /// The CSV file to write (default: `storage/app/translations.csv`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file to use instead of searching for `.lang2csv.json`
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log every directory and file visited
        #[arg(short, long)]
        verbose: bool,
    },

    /// Import a CSV file, overwriting the translation modules.
    Import {
        /// The CSV file to import
        csv_file: PathBuf,

        /// Root of the translation tree to write (default: `resources/lang`)
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Overwrite without asking for confirmation
        #[arg(short, long)]
        force: bool,

        /// Config file to use instead of searching for `.lang2csv.json`
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log every directory and file written
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(commands: Commands) -> Result<(), String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine the current directory: {}", e))?;

    match commands {
        Commands::Export {
            lang_dir,
            output,
            config,
            verbose,
        } => {
            init_logging(verbose);
            let config = load_config(config.as_deref(), &cwd)?;
            run_export_command(lang_dir, output, &config)
        }
        Commands::Import {
            csv_file,
            target,
            force,
            config,
            verbose,
        } => {
            init_logging(verbose);
            let config = load_config(config.as_deref(), &cwd)?;
            run_import_command(&csv_file, target, force, &config)
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args.commands) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
