//! JUnit XML formatter for CI systems.
//!
//! One `<testsuite>` per category; each result is a `<testcase>` named by
//! rule id with the resource as classname.

use super::group_by_category;
use crate::compliance::types::{CheckStatus, Report};

/// Format a report as JUnit XML.
pub fn format(report: &Report) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<testsuites name=\"Compliance Checks\" tests=\"{}\" failures=\"{}\" time=\"0\">\n",
        report.summary.total, report.summary.failed
    ));

    for (category, results) in group_by_category(&report.results) {
        let failures = results.iter().filter(|r| r.is_failed()).count();
        xml.push_str(&format!(
            "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\">\n",
            escape_xml(category),
            results.len(),
            failures
        ));

        for result in results {
            xml.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"{}\">\n",
                escape_xml(&result.rule_id),
                escape_xml(&result.resource)
            ));

            match result.status {
                CheckStatus::Failed => {
                    xml.push_str(&format!(
                        "      <failure message=\"{}\" type=\"{}\">{}</failure>\n",
                        escape_xml(&result.message),
                        result.severity,
                        escape_xml(&result.message)
                    ));
                }
                CheckStatus::Skipped => xml.push_str("      <skipped/>\n"),
                CheckStatus::Passed => {}
            }

            xml.push_str("    </testcase>\n");
        }

        xml.push_str("  </testsuite>\n");
    }

    xml.push_str("</testsuites>");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
