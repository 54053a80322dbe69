use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "comply-ctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check Kubernetes, Docker and config files against compliance policies")]
#[command(long_about = "Evaluates live Kubernetes clusters, Docker containers and images, and static configuration files (manifests, Dockerfiles, compose files) against a built-in catalog of security and best-practice rules, and renders the results as a table, JSON, JUnit XML or HTML report.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Selection and filtering flags shared by `check` and `report`.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Directory to scan for file checks
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub path: PathBuf,

    /// Kubernetes namespace to check (default: all namespaces)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Docker image to inspect
    #[arg(long)]
    pub image: Option<String>,

    /// Rule ids to skip (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "RULES")]
    pub skip: Vec<String>,

    /// Only run these rule ids (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "RULES")]
    pub only: Vec<String>,

    /// Minimum severity to report (low, medium, high, critical)
    #[arg(long, value_name = "LEVEL")]
    pub severity: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run compliance checks and print the results
    Check {
        /// What to check: k8s, docker, files or all
        #[arg(value_name = "TARGET")]
        target: String,

        #[command(flatten)]
        args: CheckArgs,

        /// Exit with an error on any failure, not just high/critical ones
        #[arg(long)]
        fail_on_warn: bool,
    },

    /// Generate a compliance report
    Report {
        /// What to check: k8s, docker, files or all
        #[arg(value_name = "TARGET", default_value = "all")]
        target: String,

        #[command(flatten)]
        args: CheckArgs,

        /// Output format (table, json, junit, html)
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output_file: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Include passed checks in the report
        #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
        include_passed: Option<bool>,
    },

    /// List the built-in compliance policies
    #[command(visible_aliases = ["rules", "list"])]
    Policies {
        /// Filter by category (substring match)
        #[arg(long)]
        category: Option<String>,

        /// Filter by severity (low, medium, high, critical)
        #[arg(long)]
        severity: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
