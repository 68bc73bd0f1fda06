//! CLI argument parsing module for npmup

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a positive number of seconds.
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid concurrency: {}", s))?;
    if n == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    Ok(n)
}

/// npm dependency range checker and updater
#[derive(Parser, Debug, Clone)]
#[command(name = "npmup", version, about = "Check and update package.json dependency ranges")]
pub struct CliArgs {
    /// Only check the named packages
    pub filters: Vec<String>,

    /// Rewrite the manifest with the computed ranges
    #[arg(short = 'u', long)]
    pub update: bool,

    /// Show (and with -u, apply) the latest versions ignoring declared ranges
    #[arg(short = 'l', long)]
    pub latest: bool,

    /// Include prerelease versions
    #[arg(long = "pre", alias = "prerelease")]
    pub prerelease: bool,

    /// Manifest file to check
    #[arg(short = 'p', long, default_value = "package.json")]
    pub project: PathBuf,

    /// Registry base URL
    #[arg(short = 'r', long, default_value = crate::registry::NPM_REGISTRY_URL)]
    pub registry: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", value_parser = parse_seconds)]
    pub timeout: Duration,

    /// Maximum simultaneous registry requests
    #[arg(long, default_value = "5", value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Suppress the progress bar
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Skip the backup copy when rewriting the manifest
    #[arg(long)]
    pub no_backup: bool,
}
