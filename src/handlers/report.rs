use std::fs;
use std::path::PathBuf;

use colored::*;

use super::utils::{build_aggregator, resolve_options};
use crate::cli::CheckArgs;
use crate::compliance::formatter::{OutputFormat, format_report, table};
use crate::compliance::{ReportOptions, Target};
use crate::config::types::Config;

/// Flags of the `report` subcommand
#[derive(Debug, Clone)]
pub struct ReportCommand {
    pub target: String,
    pub args: CheckArgs,
    pub format: Option<String>,
    pub output_file: Option<PathBuf>,
    pub title: Option<String>,
    pub include_passed: Option<bool>,
}

pub fn handle_report(command: ReportCommand, quiet: bool, config: &Config) -> crate::Result<()> {
    let target: Target = command.target.parse()?;
    let format: OutputFormat = command
        .format
        .as_deref()
        .unwrap_or(&config.report.format)
        .parse()?;
    let options = resolve_options(&command.args, config)?;
    let report_options = ReportOptions {
        title: command.title.unwrap_or_else(|| config.report.title.clone()),
        include_passed: command.include_passed.unwrap_or(config.report.include_passed),
    };

    log::info!("Generating {} report for target {}", format, target);
    let report = build_aggregator(config).report(target, &options, &report_options)?;

    match command.output_file {
        Some(path) => {
            fs::write(&path, format_report(&report, format))?;
            if !quiet {
                println!(
                    "{} Report written to {}",
                    "✓".green(),
                    path.display().to_string().cyan()
                );
            }
        }
        None if format == OutputFormat::Table => table::print(&report),
        None => println!("{}", format_report(&report, format)),
    }

    Ok(())
}
