//! npmup - npm dependency range checker and updater CLI
//!
//! Checks every dependency range in a package.json against the registry and
//! reports the newer in-range and latest versions; with `-u` the manifest is
//! rewritten in place, preserving the declared range style.

use clap::Parser;
use npmup::checker::{CheckOptions, Checker};
use npmup::cli::CliArgs;
use npmup::limiter::{RateLimiter, DEFAULT_MIN_INTERVAL};
use npmup::manifest::{collect_dependencies, read_manifest, update_manifest, RangePatch};
use npmup::output::{render_report, RenderOptions};
use npmup::registry::{HttpClient, NpmRegistry};
use npmup::update::{build_report, UpdateReport};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let content = read_manifest(&args.project)?;
    let deps = collect_dependencies(&content, &args.project, &args.filters)?;

    let user_agent = format!("npmup/{}", env!("CARGO_PKG_VERSION"));
    let client = HttpClient::with_config(args.timeout, &user_agent)?;
    let registry = Arc::new(NpmRegistry::new(client, args.registry.clone()));
    let limiter = Arc::new(RateLimiter::new(args.concurrency, DEFAULT_MIN_INTERVAL));
    let options = CheckOptions {
        latest: args.latest,
        prerelease: args.prerelease,
        timeout: args.timeout,
        quiet: args.quiet,
    };
    let checker = Checker::new(registry, limiter, options);

    let checked = checker.check(deps).await;
    let report = build_report(&checked, args.prerelease);

    if args.update {
        apply_updates(&args, &content, &report)?;
    }

    let render_options = RenderOptions {
        update: args.update,
        latest: args.latest,
        prerelease: args.prerelease,
        filters: args.filters.clone(),
        manifest: args.project.display().to_string(),
    };
    let mut stdout = io::stdout().lock();
    render_report(&report, &render_options, &mut stdout)?;
    stdout.flush()?;

    if report.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        // some dependencies could not be checked
        Ok(ExitCode::from(2))
    }
}

/// Rewrite the manifest with the computed ranges. The backup is written
/// first; if it fails, the manifest is left untouched.
fn apply_updates(args: &CliArgs, content: &str, report: &UpdateReport) -> anyhow::Result<()> {
    let patches: Vec<RangePatch> = report
        .rows
        .iter()
        .filter_map(|row| {
            let cell = if args.latest {
                row.latest.as_ref()
            } else {
                row.newer.as_ref()
            }?;
            Some(RangePatch::new(
                row.dep_type,
                row.name.clone(),
                row.current_raw.clone(),
                cell.plain.clone(),
            ))
        })
        .collect();

    if patches.is_empty() {
        return Ok(());
    }

    update_manifest(&args.project, content, &patches, !args.no_backup)?;

    Ok(())
}
