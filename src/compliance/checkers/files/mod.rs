//! Static configuration file checks.
//!
//! Walks a directory tree and evaluates:
//! - Kubernetes manifests (`*.yaml` / `*.yml` with `apiVersion` and `kind`)
//! - Dockerfiles (`Dockerfile`, `Dockerfile.*`, `*.dockerfile`)
//! - Docker Compose files (`docker-compose.yml`, `compose.yaml`, ...)
//!
//! Unreadable or unparseable files are skipped.

pub mod compose;
pub mod dockerfile;
pub mod manifest;

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::Checker;
use crate::compliance::providers::ProviderError;
use crate::compliance::types::{CheckOptions, CheckResult};

/// Error reading or parsing a single file. Never escapes the file checker.
#[derive(Debug, thiserror::Error)]
pub enum FileParseError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Which evaluators apply to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Manifest,
    Dockerfile,
    Compose,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileChecker;

impl FileChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Checker for FileChecker {
    fn name(&self) -> &'static str {
        "files"
    }

    fn run(&self, options: &CheckOptions) -> Result<Vec<CheckResult>, ProviderError> {
        let results = scan_directory(&options.path);
        log::debug!(
            "File checks under {} produced {} results",
            options.path.display(),
            results.len()
        );
        Ok(results)
    }
}

/// Walk `root` (sorted by file name) and evaluate every recognized file.
pub fn scan_directory(root: &Path) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        match check_file(path) {
            Ok(found) => results.extend(found),
            Err(err) => log::debug!("Skipping {}: {}", path.display(), err),
        }
    }

    results
}

/// Evaluate a single file with every classifier that matches it.
pub fn check_file(path: &Path) -> Result<Vec<CheckResult>, FileParseError> {
    let kinds = classify_path(path);
    if kinds.is_empty() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let resource = path.display().to_string();
    let mut results = Vec::new();

    for kind in kinds {
        match kind {
            FileKind::Manifest if manifest::looks_like_manifest(&content) => {
                results.extend(manifest::check_manifest(&content, &resource)?);
            }
            FileKind::Manifest => {}
            FileKind::Dockerfile => results.extend(dockerfile::check_dockerfile(&content, &resource)),
            FileKind::Compose => results.extend(compose::check_compose(&content, &resource)?),
        }
    }

    Ok(results)
}

/// Classify by file name alone; manifests additionally need a content sniff.
pub fn classify_path(path: &Path) -> Vec<FileKind> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    let lower = name.to_lowercase();
    let mut kinds = Vec::new();

    if is_dockerfile_name(name) {
        kinds.push(FileKind::Dockerfile);
    }
    if is_compose_name(&lower) {
        kinds.push(FileKind::Compose);
    } else if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        kinds.push(FileKind::Manifest);
    }

    kinds
}

fn is_dockerfile_name(name: &str) -> bool {
    name == "Dockerfile" || name.starts_with("Dockerfile.") || name.to_lowercase().ends_with(".dockerfile")
}

fn is_compose_name(lower: &str) -> bool {
    matches!(
        lower,
        "docker-compose.yml" | "docker-compose.yaml" | "compose.yml" | "compose.yaml"
    )
}
