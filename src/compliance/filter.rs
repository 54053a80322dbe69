//! Post-hoc result filtering (skip list, only list, minimum severity).

use std::collections::HashSet;

use super::types::{CheckOptions, CheckResult, Severity};

/// Filter controls, borrowed from [`CheckOptions`].
#[derive(Debug, Clone, Default)]
pub struct ResultFilter<'a> {
    skip: HashSet<&'a str>,
    only: HashSet<&'a str>,
    min_severity: Option<Severity>,
}

impl<'a> ResultFilter<'a> {
    pub fn new(skip: &'a [String], only: &'a [String], min_severity: Option<Severity>) -> Self {
        Self {
            skip: skip.iter().map(String::as_str).collect(),
            only: only.iter().map(String::as_str).collect(),
            min_severity,
        }
    }

    pub fn from_options(options: &'a CheckOptions) -> Self {
        Self::new(&options.skip, &options.only, options.min_severity)
    }

    /// True when no control is set.
    pub fn is_noop(&self) -> bool {
        self.skip.is_empty() && self.only.is_empty() && self.min_severity.is_none()
    }

    /// Whether a single result survives. Skip is evaluated before only.
    pub fn keeps(&self, result: &CheckResult) -> bool {
        let id = result.rule_id.as_str();
        if self.skip.contains(id) {
            return false;
        }
        if !self.only.is_empty() && !self.only.contains(id) {
            return false;
        }
        match self.min_severity {
            Some(min) => result.severity >= min,
            None => true,
        }
    }

    /// Apply the filter, preserving input order.
    pub fn apply(&self, results: Vec<CheckResult>) -> Vec<CheckResult> {
        if self.is_noop() {
            return results;
        }
        results.into_iter().filter(|r| self.keeps(r)).collect()
    }
}

/// Filter `results` with the controls in `options`.
pub fn filter_results(results: Vec<CheckResult>, options: &CheckOptions) -> Vec<CheckResult> {
    ResultFilter::from_options(options).apply(results)
}
