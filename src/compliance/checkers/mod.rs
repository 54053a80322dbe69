//! Compliance checkers.
//!
//! Each checker evaluates one resource domain against its built-in rules:
//! - [`ClusterChecker`] - live Kubernetes resources
//! - [`RuntimeChecker`] - Docker containers and images
//! - [`FileChecker`] - manifests, Dockerfiles and compose files on disk

pub mod cluster;
pub mod files;
pub mod runtime;

pub use cluster::ClusterChecker;
pub use files::FileChecker;
pub use runtime::RuntimeChecker;

use super::providers::ProviderError;
use super::types::{CheckOptions, CheckResult};

/// A pluggable rule evaluator for one resource domain.
pub trait Checker {
    /// Short domain name used in log output.
    fn name(&self) -> &'static str;

    /// Evaluate every resource instance against this checker's rules.
    ///
    /// Holds no state between calls; any provider connection is opened and
    /// released within the call.
    fn run(&self, options: &CheckOptions) -> Result<Vec<CheckResult>, ProviderError>;
}

/// Outcome of one sub-check: the findings it produced plus an optional error.
#[derive(Debug, Default)]
pub struct SubCheck {
    pub results: Vec<CheckResult>,
    pub error: Option<ProviderError>,
}

impl SubCheck {
    pub fn ok(results: Vec<CheckResult>) -> Self {
        Self {
            results,
            error: None,
        }
    }

    pub fn failed(error: ProviderError) -> Self {
        Self {
            results: Vec::new(),
            error: Some(error),
        }
    }

    /// Append the findings to `into`; the error is logged and dropped.
    pub fn fold_into(self, label: &str, into: &mut Vec<CheckResult>) {
        if let Some(err) = self.error {
            log::warn!("Skipping {} checks: {}", label, err);
        }
        into.extend(self.results);
    }
}

/// Whether an image reference is floating: no tag, or the `latest` tag.
///
/// Digest references (`name@sha256:...`) are pinned. Only the last path
/// segment is inspected, so a registry port is not mistaken for a tag.
pub fn is_floating_image(image: &str) -> bool {
    let image = image.trim();
    if image.is_empty() {
        return true;
    }
    if image.contains('@') {
        return false;
    }
    let last_segment = image.rsplit('/').next().unwrap_or(image);
    match last_segment.split_once(':') {
        Some((_, tag)) => tag.is_empty() || tag == "latest",
        None => true,
    }
}
