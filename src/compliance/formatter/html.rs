//! Self-contained HTML report.

use super::group_by_category;
use crate::compliance::types::{CheckStatus, Report};

const STYLE: &str = r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0f172a; color: #e2e8f0; line-height: 1.6; }
        .container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
        h1 { color: #7c3aed; margin-bottom: 0.5rem; }
        .subtitle { color: #64748b; margin-bottom: 2rem; }
        .summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
        .stat { background: #1e293b; padding: 1.5rem; border-radius: 8px; text-align: center; }
        .stat-value { font-size: 2rem; font-weight: bold; }
        .stat-label { color: #64748b; font-size: 0.875rem; }
        .passed { color: #10b981; }
        .failed { color: #ef4444; }
        .warning { color: #f59e0b; }
        .score-bar { height: 8px; background: #374151; border-radius: 4px; overflow: hidden; margin-top: 1rem; }
        .score-fill { height: 100%; background: linear-gradient(90deg, #10b981, #7c3aed); }
        .category { background: #1e293b; border-radius: 8px; margin-bottom: 1rem; overflow: hidden; }
        .category-header { padding: 1rem; background: #334155; font-weight: bold; }
        table { width: 100%; border-collapse: collapse; }
        th, td { padding: 0.75rem 1rem; text-align: left; border-bottom: 1px solid #374151; }
        th { background: #1e293b; color: #94a3b8; font-weight: 500; }
        .badge { display: inline-block; padding: 0.25rem 0.5rem; border-radius: 4px; font-size: 0.75rem; font-weight: bold; }
        .badge-critical { background: #ef4444; }
        .badge-high { background: #f97316; }
        .badge-medium { background: #f59e0b; color: #000; }
        .badge-low { background: #06b6d4; }
        .status-icon { width: 20px; text-align: center; }
"#;

/// Format a report as a standalone HTML document.
pub fn format(report: &Report) -> String {
    let title = escape_html(&report.title);
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("    <title>{}</title>\n", title));
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n    <div class=\"container\">\n");
    html.push_str(&format!("        <h1>{}</h1>\n", title));
    html.push_str(&format!(
        "        <p class=\"subtitle\">Generated: {}</p>\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    html.push_str("\n        <div class=\"summary\">\n");
    html.push_str(&stat("", summary.total.to_string(), "Total Checks"));
    html.push_str(&stat(" passed", summary.passed.to_string(), "Passed"));
    html.push_str(&stat(" failed", summary.failed.to_string(), "Failed"));
    html.push_str(&format!(
        r#"            <div class="stat">
                <div class="stat-value">{score:.1}%</div>
                <div class="stat-label">Score</div>
                <div class="score-bar"><div class="score-fill" style="width: {score:.1}%"></div></div>
            </div>
"#,
        score = summary.score
    ));
    html.push_str("        </div>\n");

    for (category, results) in group_by_category(&report.results) {
        html.push_str(&format!(
            r#"
        <div class="category">
            <div class="category-header">{}</div>
            <table>
                <thead>
                    <tr>
                        <th class="status-icon">Status</th>
                        <th>Severity</th>
                        <th>Rule</th>
                        <th>Resource</th>
                        <th>Message</th>
                    </tr>
                </thead>
                <tbody>
"#,
            escape_html(category)
        ));

        for result in results {
            let (icon, class) = match result.status {
                CheckStatus::Passed => ("✓", "passed"),
                CheckStatus::Failed => ("✗", "failed"),
                CheckStatus::Skipped => ("○", ""),
            };
            html.push_str(&format!(
                r#"                    <tr>
                        <td class="status-icon {class}">{icon}</td>
                        <td><span class="badge badge-{severity}">{severity}</span></td>
                        <td>{rule}</td>
                        <td>{resource}</td>
                        <td>{message}</td>
                    </tr>
"#,
                severity = result.severity,
                rule = escape_html(&result.rule_id),
                resource = escape_html(&result.resource),
                message = escape_html(&result.message),
            ));
        }

        html.push_str("                </tbody>\n            </table>\n        </div>\n");
    }

    html.push_str("    </div>\n</body>\n</html>\n");
    html
}

fn stat(class: &str, value: String, label: &str) -> String {
    format!(
        r#"            <div class="stat">
                <div class="stat-value{class}">{value}</div>
                <div class="stat-label">{label}</div>
            </div>
"#
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::policies::{DOCKER_MEMORY_LIMIT, K8S_PRIVILEGED, K8S_READINESS_PROBE};
    use chrono::{TimeZone, Utc};

    fn sample() -> Report {
        Report::with_timestamp(
            "Prod <cluster>",
            vec![
                K8S_PRIVILEGED.pass("prod/api", "Container 'api' is not privileged"),
                K8S_PRIVILEGED.pass("prod/web", "Container 'web' is not privileged"),
                K8S_READINESS_PROBE.fail("prod/web", "Container 'web' has no readiness probe"),
                DOCKER_MEMORY_LIMIT.fail("cache", "Container has no memory limit"),
            ],
            Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 1).unwrap(),
        )
    }

    #[test]
    fn test_html_document_structure() {
        let html = format(&sample());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Prod &lt;cluster&gt;</title>"));
        assert!(html.contains("<p class=\"subtitle\">Generated: 2024-03-09 08:05:01</p>"));
        assert_eq!(html.matches("class=\"category\"").count(), 3);
        assert!(html.contains("<span class=\"badge badge-medium\">medium</span>"));
        assert!(html.contains("<td class=\"status-icon passed\">✓</td>"));
        assert!(html.contains("<td class=\"status-icon failed\">✗</td>"));
        assert!(html.contains("Container &#39;web&#39; has no readiness probe"));
    }

    #[test]
    fn test_score_bar_width_matches_score() {
        let report = sample();
        let html = format(&report);
        assert!(html.contains(&format!(
            "<div class=\"score-fill\" style=\"width: {:.1}%\"></div>",
            report.summary.score
        )));
        assert!(html.contains("style=\"width: 50.0%\""));
        assert!(html.contains("<div class=\"stat-value\">50.0%</div>"));
    }
}
