//! Report renderers.
//!
//! Each format is an independent, pure `&Report -> String` function.

pub mod html;
pub mod json;
pub mod junit;
pub mod table;

use std::fmt;

use super::types::{CheckResult, Report};
use crate::error::ComplianceError;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Per-category tables with a score bar.
    #[default]
    Table,
    /// Structured JSON.
    Json,
    /// JUnit XML for CI systems.
    Junit,
    /// Self-contained HTML document.
    Html,
}

impl OutputFormat {
    /// Parse from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" | "text" => Some(Self::Table),
            "json" => Some(Self::Json),
            "junit" | "xml" => Some(Self::Junit),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Junit => "junit",
            Self::Html => "html",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ComplianceError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render a report in the given format.
pub fn format_report(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => table::format(report),
        OutputFormat::Json => json::format(report),
        OutputFormat::Junit => junit::format(report),
        OutputFormat::Html => html::format(report),
    }
}

/// Results grouped by category, in order of first appearance.
pub fn group_by_category(results: &[CheckResult]) -> Vec<(&str, Vec<&CheckResult>)> {
    let mut groups: Vec<(&str, Vec<&CheckResult>)> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|(c, _)| *c == result.category) {
            Some((_, members)) => members.push(result),
            None => groups.push((result.category.as_str(), vec![result])),
        }
    }
    groups
}
