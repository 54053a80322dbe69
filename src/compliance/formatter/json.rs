//! JSON formatter.

use crate::compliance::types::Report;

/// Format a report as pretty-printed JSON.
pub fn format(report: &Report) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::policies::{K8S_LIVENESS_PROBE, K8S_PRIVILEGED};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_json_shape() {
        let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let report = Report::with_timestamp(
            "Compliance Report",
            vec![
                K8S_PRIVILEGED.pass("default/web", "Container 'web' is not privileged"),
                K8S_LIVENESS_PROBE.fail("default/web", "Container 'web' has no liveness probe"),
            ],
            generated_at,
        );

        let value: serde_json::Value = serde_json::from_str(&format(&report)).unwrap();
        assert_eq!(value["title"], "Compliance Report");
        assert_eq!(value["generated_at"], "2024-05-01T12:00:00Z");
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["passed"], 1);
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["summary"]["skipped"], 0);
        assert_eq!(value["summary"]["score"], 50.0);

        let passed = &value["results"][0];
        assert_eq!(passed["rule_id"], "K8S-SEC-001");
        assert_eq!(passed["status"], "passed");
        assert!(passed.get("remediation").is_none());

        let failed = &value["results"][1];
        assert_eq!(failed["severity"], "medium");
        assert_eq!(failed["remediation"], "Add livenessProbe to container spec");
    }

    #[test]
    fn test_json_round_trips_report() {
        let report = Report::new("Nightly", vec![K8S_PRIVILEGED.fail("prod/api", "privileged")]);
        let parsed: Report = serde_json::from_str(&format(&report)).unwrap();
        assert_eq!(parsed, report);
    }
}
