//! Console output utilities.

use console::style;

use crate::config::{Config, RunMode};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     photo-dedupe                                      ║
║     One copy of every photo and video you own         ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(config: &Config, mode: &RunMode) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Mode:   {}", mode);
    if mode.scans() {
        println!("  Source: {}", config.scan.source_dir.display());
        println!("  Output: {}", config.scan.output_dir.display());
    }
    println!("  Store:  {}", config.store.db_path.display());
    println!();
}
