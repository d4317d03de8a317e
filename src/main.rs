//! photo-dedupe - CLI entry point.

use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use photo_dedupe::{
    cli::Args,
    config::{validation::validate_db_path, validate_config, Config, LoggingConfig, RunMode},
    dedup::DedupIndex,
    error::{exit_codes, Error},
    fs::{delete_if_exists, ensure_dir},
    media::ExifTagSource,
    output::{
        create_spinner, print_banner, print_config_summary, print_error, print_info,
        print_run_stats, print_store_report, print_success, print_warning, SpinnerSink,
        StoreReport,
    },
    scan::{ScanOptions, Scanner, TracingSink},
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

fn exit_code_for(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<Error>() {
        Some(
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingDirectory(_)
            | Error::TomlParse(_),
        ) => exit_codes::CONFIG_ERROR,
        Some(Error::StoreCorrupt { .. } | Error::StoreNotPersistent | Error::Json(_)) => {
            exit_codes::STORE_ERROR
        }
        Some(
            Error::Classification { .. }
            | Error::Fingerprint { .. }
            | Error::Copy { .. }
            | Error::InvalidFilename(_),
        ) => exit_codes::SCAN_ERROR,
        _ => exit_codes::UNEXPECTED_ERROR,
    }
}

fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();
    let mode = args.run_mode();

    // Load configuration, CLI values win
    let mut config = Config::load_or_default(&args.config)?;
    args.merge_into_config(&mut config);

    // A clean run starts a fresh log file
    if mode == RunMode::Clean {
        if let Some(log_file) = &config.logging.file {
            delete_if_exists(log_file)?;
        }
    }

    init_logging(&config.logging)?;

    if !args.quiet {
        print_banner();
        print_config_summary(&config, &mode);
    }

    match &mode {
        RunMode::Stats => {
            validate_db_path(&config.store.db_path)?;
            let index = DedupIndex::open(&config.store.db_path)?;
            print_store_report(&StoreReport::from_records(&index.records()));
            export_if_requested(&args, &index)?;
        }
        RunMode::Purge(pattern) => {
            validate_db_path(&config.store.db_path)?;
            let mut index = DedupIndex::open(&config.store.db_path)?;
            let removed = index.purge(pattern);
            index.persist()?;
            tracing::info!("Purged {} records matching '{}'", removed, pattern);
            if !args.quiet {
                print_success(&format!("Removed {} records matching '{}'", removed, pattern));
            }
            export_if_requested(&args, &index)?;
        }
        RunMode::Scan | RunMode::Clean => {
            validate_config(&config)?;

            if mode == RunMode::Clean && delete_if_exists(&config.store.db_path)? {
                tracing::info!("Removed store {}", config.store.db_path.display());
            }

            ensure_dir(&config.scan.output_dir)?;
            let mut index = DedupIndex::open(&config.store.db_path)?;
            tracing::info!(
                "Loaded {} records from {}",
                index.len(),
                config.store.db_path.display()
            );

            let bar = if args.quiet {
                ProgressBar::hidden()
            } else {
                create_spinner(&format!("Scanning {}", config.scan.source_dir.display()))
            };
            let mut sink = SpinnerSink::new(bar, TracingSink);
            let options = ScanOptions {
                output_dir: config.scan.output_dir.clone(),
                fallback_token: config.naming.fallback_token.clone(),
            };

            let stats = {
                let mut scanner = Scanner::new(&mut index, &ExifTagSource, &mut sink, options);
                scanner.scan(&config.scan.source_dir);
                scanner.into_stats()
            };
            sink.finish();

            index.persist()?;
            tracing::info!(
                "Scan finished: {} processed, {} originals, {} duplicates",
                stats.files_processed(),
                stats.originals,
                stats.duplicates
            );

            if !args.quiet {
                print_run_stats(&stats, &config.scan.source_dir, &config.scan.output_dir);
                print_store_report(&StoreReport::from_records(&index.records()));
                if stats.walk_errors > 0 {
                    print_warning(&format!(
                        "{} entries could not be read during the walk",
                        stats.walk_errors
                    ));
                }
            }
            export_if_requested(&args, &index)?;
        }
    }

    Ok(())
}

/// Set up the tracing subscriber: console always, log file when configured.
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

fn export_if_requested(args: &Args, index: &DedupIndex) -> anyhow::Result<()> {
    if let Some(path) = &args.export {
        index
            .export(path)
            .with_context(|| format!("Failed to export store to {}", path.display()))?;
        if !args.quiet {
            print_info(&format!(
                "Exported {} records to {}",
                index.len(),
                path.display()
            ));
        }
    }
    Ok(())
}
