use colored::*;

use super::utils::{build_aggregator, resolve_options};
use crate::cli::CheckArgs;
use crate::compliance::formatter::table;
use crate::compliance::{ReportOptions, Target, build_report, should_fail};
use crate::config::types::Config;

/// Run the checks for `target` and print them as tables.
///
/// Returns `true` when the run should exit non-zero.
pub fn handle_check(
    target: &str,
    args: CheckArgs,
    fail_on_warn: bool,
    quiet: bool,
    config: &Config,
) -> crate::Result<bool> {
    let target: Target = target.parse()?;
    let options = resolve_options(&args, config)?;
    let fail_on_warn = fail_on_warn || config.check.fail_on_warn;

    if !quiet {
        println!("🔍 Running {} compliance checks...", target.to_string().cyan());
    }

    let results = build_aggregator(config).check(target, &options)?;
    let report = build_report(
        results,
        &ReportOptions {
            title: config.report.title.clone(),
            include_passed: true,
        },
    );

    if !quiet {
        table::print(&report);
    }

    let failed = should_fail(&report.results, fail_on_warn);
    if failed {
        eprintln!(
            "\n{}",
            format!(
                "✗ Compliance check failed: {} of {} checks failed",
                report.summary.failed, report.summary.total
            )
            .red()
            .bold()
        );
    } else if !quiet {
        println!("\n{}", "✓ Compliance check passed".green().bold());
    }

    Ok(failed)
}
