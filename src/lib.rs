//! # compliance-ctl
//!
//! A command-line tool and library that evaluates Kubernetes clusters,
//! Docker containers and images, and configuration files against a
//! built-in catalog of security and best-practice rules.
//!
//! ## Features
//!
//! - **Cluster checks**: pod security, probes, resources, network policies and RBAC
//! - **Runtime checks**: container host settings and image inspection via the Docker CLI
//! - **File checks**: Kubernetes manifests, Dockerfiles and compose files on disk
//! - **Filtering**: skip / only rule lists and a minimum severity
//! - **Reports**: table, JSON, JUnit XML and HTML output
//!
//! ## Example
//!
//! ```rust,no_run
//! use compliance_ctl::compliance::{Aggregator, CheckOptions, ReportOptions, Target};
//! use compliance_ctl::compliance::formatter::{OutputFormat, format_report};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = CheckOptions::default().with_path("./deploy");
//! let report = Aggregator::default().report(Target::Files, &options, &ReportOptions::default())?;
//! println!("{}", format_report(&report, OutputFormat::Json));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod compliance;
pub mod config;
pub mod error;
pub mod handlers;

// Re-export commonly used types and functions
pub use compliance::{CheckOptions, CheckResult, Report, Severity};
pub use error::{ComplianceError, Result};
pub use handlers::*;
use cli::Commands;
use config::types::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dispatch a parsed command. Returns `true` when the process should exit non-zero.
pub fn run_command(command: Commands, quiet: bool, config: &Config) -> Result<bool> {
    match command {
        Commands::Check {
            target,
            args,
            fail_on_warn,
        } => handlers::handle_check(&target, args, fail_on_warn, quiet, config),
        Commands::Report {
            target,
            args,
            format,
            output_file,
            title,
            include_passed,
        } => handlers::handle_report(
            ReportCommand {
                target,
                args,
                format,
                output_file,
                title,
                include_passed,
            },
            quiet,
            config,
        )
        .map(|_| false),
        Commands::Policies {
            category,
            severity,
            json,
        } => handlers::handle_policies(category, severity, json).map(|_| false),
    }
}
