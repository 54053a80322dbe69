//! Compliance rule-evaluation engine.
//!
//! Evaluates Kubernetes clusters, Docker hosts and configuration files
//! against a fixed rule catalog and renders the findings as a report.
//!
//! # Architecture
//!
//! - [`policies`] - static rule catalog
//! - [`types`] - result model (`CheckResult`, `Report`, ...)
//! - [`checkers`] - one [`Checker`] per resource domain
//! - [`providers`] - cluster and runtime resource providers
//! - [`filter`] - skip / only / minimum-severity filtering
//! - [`aggregator`] - target dispatch, merging and summaries
//! - [`formatter`] - table, JSON, JUnit and HTML output
//!
//! # Example
//!
//! ```rust,no_run
//! use compliance_ctl::compliance::{Aggregator, CheckOptions, ReportOptions, Target};
//! use compliance_ctl::compliance::formatter::{OutputFormat, format_report};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = CheckOptions::default().with_path("./deploy");
//! let report = Aggregator::default().report(Target::Files, &options, &ReportOptions::default())?;
//! println!("{}", format_report(&report, OutputFormat::Junit));
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod checkers;
pub mod filter;
pub mod formatter;
pub mod policies;
pub mod providers;
pub mod types;

pub use aggregator::{Aggregator, ReportOptions, Target, build_report, should_fail};
pub use checkers::{Checker, ClusterChecker, FileChecker, RuntimeChecker};
pub use filter::{ResultFilter, filter_results};
pub use formatter::{OutputFormat, format_report};
pub use policies::{Policy, all_policies, find_policy};
pub use types::{CheckOptions, CheckResult, CheckStatus, Report, ReportSummary, Severity};
