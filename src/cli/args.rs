//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, RunMode, DEFAULT_CONFIG_FILE};

/// Photo and video dedup CLI.
#[derive(Parser, Debug)]
#[command(
    name = "photo-dedupe",
    version,
    about = "Copy one instance of every distinct photo and video out of a backup tree",
    long_about = "Walks a directory tree of photo and video backups, identifies files by \
                  content fingerprint, and copies the first instance of each distinct file \
                  into a flat output directory.\n\n\
                  Output files are named <capture-time>_<md5>_<original name>. A persistent \
                  store remembers what has been seen, so re-running skips known content."
)]
pub struct Args {
    /// Directory tree to scan.
    #[arg(short, long, env = "PHOTO_DEDUPE_PATH")]
    pub path: Option<PathBuf>,

    /// Directory receiving the first instance of each file.
    #[arg(short, long, env = "PHOTO_DEDUPE_OUT")]
    pub out: Option<PathBuf>,

    /// Dedup store file.
    #[arg(long, env = "PHOTO_DEDUPE_DB")]
    pub db: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Delete the store and log file before scanning.
    #[arg(long, conflicts_with_all = ["stats", "purge"])]
    pub clean: bool,

    /// Report on the existing store and exit without scanning.
    #[arg(long, conflicts_with = "purge")]
    pub stats: bool,

    /// Delete records whose fingerprint contains PATTERN, then exit.
    #[arg(long, value_name = "PATTERN")]
    pub purge: Option<String>,

    /// Write the store as JSON to FILE after the run.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Hide the banner, spinner and reports.
    #[arg(long, short)]
    pub quiet: bool,
}

impl Args {
    /// The run mode selected by the flags.
    pub fn run_mode(&self) -> RunMode {
        if self.clean {
            RunMode::Clean
        } else if self.stats {
            RunMode::Stats
        } else if let Some(pattern) = &self.purge {
            RunMode::Purge(pattern.clone())
        } else {
            RunMode::Scan
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(path) = &self.path {
            config.scan.source_dir = path.clone();
        }

        if let Some(out) = &self.out {
            config.scan.output_dir = out.clone();
        }

        if let Some(db) = &self.db {
            config.store.db_path = db.clone();
        }

        if self.debug {
            config.logging.level = "debug".to_string();
        }
    }
}
