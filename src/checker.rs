//! Resolution pipeline
//!
//! Drives every dependency through the state machine
//! `Pending -> {InvalidRange, ComplexRange, NetworkError, Resolved}`:
//!
//! 1. The declared range is validity-checked and classified. Compound `||`
//!    ranges are reported for user inspection and never auto-updated.
//! 2. Registry metadata is fetched through the shared admission gate, under
//!    an explicit timeout. No retry happens here.
//! 3. Deprecated versions are dropped; prerelease versions are dropped
//!    unless inclusion is requested globally or implied by the declared
//!    range itself. From what remains, the "latest" and in-range "newer"
//!    candidates are selected.
//!
//! Fetches run concurrently; one dependency's failure never blocks or
//! aborts its siblings, and results are keyed by dependency identity, not
//! arrival order.

use crate::domain::{CheckStatus, Dependency};
use crate::limiter::RateLimiter;
use crate::progress::Progress;
use crate::registry::{PackageMetadata, Registry};
use crate::semver::{Range, VersionParts};
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Default per-fetch timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Compute the unconstrained latest candidate
    pub latest: bool,
    /// Globally include prerelease versions
    pub prerelease: bool,
    /// Per-fetch timeout
    pub timeout: Duration,
    /// Suppress the progress bar
    pub quiet: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            latest: false,
            prerelease: false,
            timeout: DEFAULT_FETCH_TIMEOUT,
            quiet: false,
        }
    }
}

/// Dependency checker with an injected registry and admission gate
pub struct Checker {
    registry: Arc<dyn Registry>,
    limiter: Arc<RateLimiter>,
    options: CheckOptions,
}

impl Checker {
    pub fn new(
        registry: Arc<dyn Registry>,
        limiter: Arc<RateLimiter>,
        options: CheckOptions,
    ) -> Self {
        Self {
            registry,
            limiter,
            options,
        }
    }

    /// Resolve all dependencies concurrently. The returned vector preserves
    /// the input order regardless of fetch completion order.
    pub async fn check(&self, deps: Vec<Dependency>) -> Vec<Dependency> {
        let progress = Progress::start(deps.len() as u64, !self.options.quiet);
        let mut slots: Vec<Option<Dependency>> = (0..deps.len()).map(|_| None).collect();

        let mut tasks = JoinSet::new();
        for (index, dep) in deps.into_iter().enumerate() {
            let registry = Arc::clone(&self.registry);
            let limiter = Arc::clone(&self.limiter);
            let options = self.options.clone();
            let progress = progress.clone();

            tasks.spawn(async move {
                let resolved = resolve_one(registry, limiter, &options, dep).await;
                progress.tick(&resolved.name);
                (index, resolved)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            // a panicking task loses only its own slot
            if let Ok((index, dep)) = joined {
                slots[index] = Some(dep);
            }
        }

        progress.finish(&"Done!".green().to_string());

        slots.into_iter().flatten().collect()
    }
}

/// Run one dependency through the state machine.
async fn resolve_one(
    registry: Arc<dyn Registry>,
    limiter: Arc<RateLimiter>,
    options: &CheckOptions,
    mut dep: Dependency,
) -> Dependency {
    if !Range::is_valid(&dep.current) {
        dep.status = CheckStatus::InvalidRange;
        return dep;
    }

    let range = match Range::parse(&dep.current) {
        Ok(range) => range,
        Err(_) => {
            dep.status = CheckStatus::InvalidRange;
            return dep;
        }
    };

    if range == Range::Compound {
        dep.status = CheckStatus::ComplexRange;
        return dep;
    }

    let metadata = {
        let _permit = limiter.admit().await;
        match tokio::time::timeout(options.timeout, registry.fetch_metadata(&dep.name)).await {
            Ok(Ok(metadata)) => metadata,
            Ok(Err(_)) | Err(_) => {
                dep.status = CheckStatus::NetworkError;
                return dep;
            }
        }
    };

    resolve_candidates(&mut dep, &range, &metadata, options);
    dep
}

/// Populate `newer`/`latest` from fetched metadata. Pure, so it is tested
/// directly without a runtime.
fn resolve_candidates(
    dep: &mut Dependency,
    range: &Range,
    metadata: &PackageMetadata,
    options: &CheckOptions,
) {
    let include_prerelease = options.prerelease || range.names_prerelease();

    // Deprecated versions are excluded from both candidates; prereleases
    // only participate under inclusion.
    let mut versions: Vec<VersionParts> = metadata
        .versions
        .iter()
        .filter(|(_, meta)| !meta.is_deprecated())
        .filter_map(|(text, _)| VersionParts::parse(text).ok())
        .filter(|version| include_prerelease || !version.is_prerelease())
        .collect();
    versions.sort();

    dep.status = CheckStatus::Resolved;

    let latest = if include_prerelease {
        versions.last().cloned()
    } else {
        VersionParts::parse(&metadata.dist_tags.latest).ok()
    };

    if options.latest {
        dep.latest = latest.as_ref().map(|v| v.to_string());
    }

    if !range.is_upgradable() {
        return;
    }

    let newer = versions.iter().rev().find(|v| range.satisfies(v));
    match newer {
        Some(version) => dep.newer = Some(version.to_string()),
        None => {
            // Downgrade scenario: everything in range was deprecated or
            // unpublished and even the unconstrained best sits below the
            // declared floor.
            if let (Some(latest), Some(floor)) = (latest, range.floor()) {
                if latest < floor {
                    dep.newer = Some(latest.to_string());
                }
            }
        }
    }
}
