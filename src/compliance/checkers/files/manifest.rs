//! Kubernetes manifest rules (FILE-K8S-*).

use serde::Deserialize;
use serde_yaml::Value;

use super::FileParseError;
use crate::compliance::checkers::is_floating_image;
use crate::compliance::policies::{
    FILE_K8S_LATEST_TAG, FILE_K8S_LIVENESS_PROBE, FILE_K8S_RESOURCE_LIMITS,
    FILE_K8S_SECURITY_CONTEXT,
};
use crate::compliance::types::CheckResult;

/// Whether the content has top-level `apiVersion:` and `kind:` keys.
pub fn looks_like_manifest(content: &str) -> bool {
    let mut has_api_version = false;
    let mut has_kind = false;
    for line in content.lines() {
        has_api_version |= line.starts_with("apiVersion:");
        has_kind |= line.starts_with("kind:");
    }
    has_api_version && has_kind
}

/// Evaluate every document in a (possibly multi-document) manifest file.
pub fn check_manifest(content: &str, resource: &str) -> Result<Vec<CheckResult>, FileParseError> {
    let mut results = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document)?;
        if let Some(spec) = pod_spec(&value) {
            results.extend(check_pod_spec(spec, resource));
        }
    }
    Ok(results)
}

/// Locate the pod spec for the supported workload kinds.
fn pod_spec(value: &Value) -> Option<&Value> {
    let kind = value.get("kind")?.as_str()?;
    let spec = value.get("spec")?;
    match kind {
        "Pod" => Some(spec),
        "Deployment" | "StatefulSet" | "DaemonSet" | "ReplicaSet" | "Job" => {
            spec.get("template")?.get("spec")
        }
        "CronJob" => spec
            .get("jobTemplate")?
            .get("spec")?
            .get("template")?
            .get("spec"),
        _ => None,
    }
}

fn check_pod_spec(spec: &Value, resource: &str) -> Vec<CheckResult> {
    let Some(containers) = spec.get("containers").and_then(|c| c.as_sequence()) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    for container in containers {
        let name = get_str(container, "name").unwrap_or_default();

        if is_floating_image(get_str(container, "image").unwrap_or_default()) {
            results.push(FILE_K8S_LATEST_TAG.fail(
                resource,
                format!("Container '{}' uses latest or no tag", name),
            ));
        }

        let has_limits = container
            .get("resources")
            .and_then(|r| r.get("limits"))
            .is_some_and(Value::is_mapping);
        if !has_limits {
            results.push(FILE_K8S_RESOURCE_LIMITS.fail(
                resource,
                format!("Container '{}' has no resource limits", name),
            ));
        }

        if !container.get("securityContext").is_some_and(Value::is_mapping) {
            results.push(FILE_K8S_SECURITY_CONTEXT.fail(
                resource,
                format!("Container '{}' has no securityContext", name),
            ));
        }

        if container.get("livenessProbe").is_none_or(Value::is_null) {
            results.push(FILE_K8S_LIVENESS_PROBE.fail(
                resource,
                format!("Container '{}' has no livenessProbe", name),
            ));
        }
    }

    results
}

fn get_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(|v| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::types::Severity;

    #[test]
    fn test_looks_like_manifest() {
        assert!(looks_like_manifest("apiVersion: v1\nkind: Pod\n"));
        assert!(!looks_like_manifest("image:\n  apiVersion: v1\n  kind: Pod\n"));
        assert!(!looks_like_manifest("replicas: 3\n"));
    }

    #[test]
    fn test_bare_deployment_has_four_findings() {
        let yaml = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: myapp
spec:
  template:
    spec:
      containers:
        - name: myapp
          image: myapp:latest
"#;
        let results = check_manifest(yaml, "deploy.yaml").unwrap();
        let summary: Vec<_> = results
            .iter()
            .map(|r| (r.rule_id.as_str(), r.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("FILE-K8S-001", Severity::Medium),
                ("FILE-K8S-002", Severity::Medium),
                ("FILE-K8S-003", Severity::High),
                ("FILE-K8S-004", Severity::Medium),
            ]
        );
        assert!(results.iter().all(|r| r.resource == "deploy.yaml"));
    }

    #[test]
    fn test_resources_without_limits_reported_once() {
        let yaml = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: nginx:1.25
      resources:
        requests:
          cpu: 100m
      securityContext:
        runAsNonRoot: true
      livenessProbe:
        tcpSocket:
          port: 80
"#;
        let results = check_manifest(yaml, "pod.yaml").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rule_id, "FILE-K8S-002");
        assert_eq!(results[0].message, "Container 'web' has no resource limits");
    }

    #[test]
    fn test_multi_document_and_cronjob() {
        let yaml = r#"
apiVersion: v1
kind: Service
metadata:
  name: web
spec:
  ports:
    - port: 80
---
apiVersion: batch/v1
kind: CronJob
metadata:
  name: backup
spec:
  schedule: "0 3 * * *"
  jobTemplate:
    spec:
      template:
        spec:
          containers:
            - name: backup
              image: registry:5000/tools/backup@sha256:abcdef
              resources:
                limits:
                  memory: 128Mi
              securityContext:
                readOnlyRootFilesystem: true
"#;
        let results = check_manifest(yaml, "jobs.yaml").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rule_id, "FILE-K8S-004");
        assert_eq!(results[0].message, "Container 'backup' has no livenessProbe");
    }
}
