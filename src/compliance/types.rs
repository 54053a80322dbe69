//! Result model for compliance checks.
//!
//! - `Severity` - ordered rule severity (`Low < Medium < High < Critical`)
//! - `CheckStatus` - outcome of evaluating one rule against one resource
//! - `CheckResult` - a single finding
//! - `CheckOptions` - per-invocation checker configuration
//! - `Report` / `ReportSummary` - the aggregated, immutable report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// Severity of a compliance rule.
///
/// Ordered from least to most severe: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Parse a severity from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Critical => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of one rule against one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single compliance finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub rule_id: String,
    pub rule_name: String,
    pub category: String,
    pub severity: Severity,
    pub status: CheckStatus,
    /// Human-readable locator (`namespace/pod`, container name, file path)
    pub resource: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl CheckResult {
    pub fn is_failed(&self) -> bool {
        self.status == CheckStatus::Failed
    }

    pub fn is_passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }

    pub fn is_skipped(&self) -> bool {
        self.status == CheckStatus::Skipped
    }
}

/// Configuration for one checker invocation.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Namespace filter for cluster checks (`None` = all namespaces)
    pub namespace: Option<String>,
    /// Image to inspect for runtime image rules
    pub image: Option<String>,
    /// Root directory for file checks
    pub path: PathBuf,
    /// Rule ids to drop
    pub skip: Vec<String>,
    /// Rule ids to keep (empty = keep all)
    pub only: Vec<String>,
    /// Minimum severity to keep
    pub min_severity: Option<Severity>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            image: None,
            path: PathBuf::from("."),
            skip: Vec::new(),
            only: Vec::new(),
            min_severity: None,
        }
    }
}

impl CheckOptions {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_skip(mut self, skip: Vec<String>) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = Some(severity);
        self
    }
}

/// Aggregated counts and score for a report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub score: f64,
}

impl ReportSummary {
    /// Compute the summary with a single pass over `results`.
    ///
    /// `score = passed / (total - skipped) * 100`, or `0` when nothing was evaluated.
    pub fn from_results(results: &[CheckResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.total += 1;
            match result.status {
                CheckStatus::Passed => summary.passed += 1,
                CheckStatus::Failed => summary.failed += 1,
                CheckStatus::Skipped => summary.skipped += 1,
            }
        }

        let evaluated = summary.total - summary.skipped;
        summary.score = if evaluated == 0 {
            0.0
        } else {
            summary.passed as f64 / evaluated as f64 * 100.0
        };
        summary
    }
}

/// A finished compliance report. Built once, never mutated by renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub results: Vec<CheckResult>,
}

impl Report {
    pub fn new(title: impl Into<String>, results: Vec<CheckResult>) -> Self {
        Self::with_timestamp(title, results, Utc::now())
    }

    pub fn with_timestamp(
        title: impl Into<String>,
        results: Vec<CheckResult>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            generated_at,
            summary: ReportSummary::from_results(&results),
            results,
        }
    }
}
