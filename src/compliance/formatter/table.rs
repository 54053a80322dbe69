//! Terminal table output: one table per category, a summary and a score bar.

use colored::Colorize;
use prettytable::format::consts::FORMAT_BOX_CHARS;
use prettytable::{Cell, Row, Table};

use super::group_by_category;
use crate::compliance::types::{CheckResult, CheckStatus, Report, Severity};

const RESOURCE_WIDTH: usize = 30;
const MESSAGE_WIDTH: usize = 40;
const SCORE_BAR_WIDTH: usize = 30;

/// Format a report as plain-text tables.
pub fn format(report: &Report) -> String {
    if report.results.is_empty() {
        return "No issues found!\n".to_string();
    }

    let mut out = String::new();
    for (category, results) in group_by_category(&report.results) {
        out.push('\n');
        out.push_str(category);
        out.push('\n');
        out.push_str(&category_table(&results).to_string());
    }
    out.push_str(&summary_block(report));
    out
}

/// Print a report to stdout, with terminal colors where supported.
pub fn print(report: &Report) {
    if report.results.is_empty() {
        println!("{}", "✓ No issues found!".green());
        return;
    }

    for (category, results) in group_by_category(&report.results) {
        println!("\n{}", category.bold());
        category_table(&results).printstd();
    }
    print!("{}", summary_block(report));
}

fn category_table(results: &[&CheckResult]) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new("Status").style_spec("b"),
        Cell::new("Severity").style_spec("b"),
        Cell::new("Rule").style_spec("b"),
        Cell::new("Resource").style_spec("b"),
        Cell::new("Message").style_spec("b"),
    ]));

    for result in results {
        let (icon, status_style) = status_icon(result);
        table.add_row(Row::new(vec![
            Cell::new(icon).style_spec(status_style),
            Cell::new(severity_badge(result.severity)).style_spec(severity_style(result.severity)),
            Cell::new(&result.rule_id).style_spec("Fc"),
            Cell::new(&truncate(&result.resource, RESOURCE_WIDTH)),
            Cell::new(&truncate(&result.message, MESSAGE_WIDTH)),
        ]));
    }

    table
}

fn status_icon(result: &CheckResult) -> (&'static str, &'static str) {
    match result.status {
        CheckStatus::Passed => ("✓", "Fg"),
        CheckStatus::Failed if result.severity >= Severity::High => ("✗", "Fr"),
        CheckStatus::Failed => ("⚠", "Fy"),
        CheckStatus::Skipped => ("○", "Fd"),
    }
}

fn severity_badge(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "CRIT",
        Severity::High => "HIGH",
        Severity::Medium => "MED",
        Severity::Low => "LOW",
    }
}

fn severity_style(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "Fr",
        Severity::Medium => "Fy",
        Severity::Low => "Fc",
    }
}

/// Summary counts and score bar. Failures below high severity count as warnings.
fn summary_block(report: &Report) -> String {
    let summary = &report.summary;
    let failed = report
        .results
        .iter()
        .filter(|r| r.is_failed() && r.severity >= Severity::High)
        .count();
    let warnings = summary.failed - failed;

    let mut out = String::new();
    out.push('\n');
    out.push_str(&"─".repeat(60));
    out.push_str("\n\nSummary\n");
    out.push_str(&format!("  Total Checks: {}\n", summary.total));
    out.push_str(&format!("  ✓ Passed: {}\n", summary.passed));
    if failed > 0 {
        out.push_str(&format!("  ✗ Failed: {}\n", failed));
    }
    if warnings > 0 {
        out.push_str(&format!("  ⚠ Warnings: {}\n", warnings));
    }
    if summary.skipped > 0 {
        out.push_str(&format!("  ○ Skipped: {}\n", summary.skipped));
    }
    out.push_str(&format!(
        "\n  Compliance Score: {} {:.1}%\n",
        score_bar(summary.score),
        summary.score
    ));
    out
}

fn score_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * SCORE_BAR_WIDTH as f64) as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(SCORE_BAR_WIDTH - filled)
    )
}

/// Truncate to `max` characters, ending with `...` when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::policies::{FILE_DOCKER_HEALTHCHECK, FILE_DOCKER_USER, K8S_PRIVILEGED};

    #[test]
    fn test_empty_report() {
        assert_eq!(format(&Report::new("r", Vec::new())), "No issues found!\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        let long = "a".repeat(45);
        let cut = truncate(&long, MESSAGE_WIDTH);
        assert_eq!(cut.chars().count(), MESSAGE_WIDTH);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate("ééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0.0), format!("[{}]", "░".repeat(30)));
        assert_eq!(score_bar(100.0), format!("[{}]", "█".repeat(30)));
        assert_eq!(score_bar(50.0).matches('█').count(), 15);
    }

    #[test]
    fn test_table_sections_and_summary() {
        let report = Report::new(
            "r",
            vec![
                K8S_PRIVILEGED.pass("default/web", "Container 'web' is not privileged"),
                FILE_DOCKER_USER.fail("Dockerfile", "Dockerfile has no USER directive"),
                FILE_DOCKER_HEALTHCHECK.fail("Dockerfile", "Dockerfile has no HEALTHCHECK"),
            ],
        );
        let out = format(&report);
        let k8s = out.find("Kubernetes Security").unwrap();
        let files = out.find("File Compliance").unwrap();
        assert!(k8s < files);
        assert!(out.contains("FILE-DOCKER-003"));
        assert!(out.contains("CRIT"));
        assert!(out.contains("  Total Checks: 3\n"));
        assert!(out.contains("  ✗ Failed: 1\n"));
        assert!(out.contains("  ⚠ Warnings: 1\n"));
        assert!(out.contains("Compliance Score: ["));
        assert!(out.contains("] 33.3%\n"));
    }
}
