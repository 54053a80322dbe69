//! Built-in compliance policy catalog.
//!
//! Every rule a checker can emit has exactly one entry here. Checkers build
//! their findings through [`Policy::fail`] and [`Policy::pass`], so a result's
//! name, category and severity always come from the catalog.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use super::types::{CheckResult, CheckStatus, Severity};

/// A read-only rule template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub remediation: &'static str,
}

impl Policy {
    /// A failed finding for this rule.
    pub fn fail(&self, resource: impl Into<String>, message: impl Into<String>) -> CheckResult {
        CheckResult {
            remediation: Some(self.remediation.to_string()),
            ..self.result(CheckStatus::Failed, resource.into(), message.into())
        }
    }

    /// A passed finding for this rule. Passed results carry no remediation.
    pub fn pass(&self, resource: impl Into<String>, message: impl Into<String>) -> CheckResult {
        self.result(CheckStatus::Passed, resource.into(), message.into())
    }

    fn result(&self, status: CheckStatus, resource: String, message: String) -> CheckResult {
        CheckResult {
            rule_id: self.id.to_string(),
            rule_name: self.name.to_string(),
            category: self.category.to_string(),
            severity: self.severity,
            status,
            resource,
            message,
            remediation: None,
        }
    }
}

const K8S_SECURITY: &str = "Kubernetes Security";
const K8S_BEST_PRACTICES: &str = "Kubernetes Best Practices";
const K8S_RESOURCES: &str = "Kubernetes Resources";
const K8S_NETWORK: &str = "Kubernetes Network";
const K8S_RBAC: &str = "Kubernetes RBAC";
const DOCKER_SECURITY: &str = "Docker Security";
const DOCKER_RESOURCES: &str = "Docker Resources";
const DOCKER_CONFIGURATION: &str = "Docker Configuration";
const DOCKER_IMAGES: &str = "Docker Images";
const FILE_COMPLIANCE: &str = "File Compliance";

// ============================================================================
// Kubernetes
// ============================================================================

pub static K8S_PRIVILEGED: Policy = Policy {
    id: "K8S-SEC-001",
    name: "No Privileged Containers",
    category: K8S_SECURITY,
    severity: Severity::Critical,
    description: "Containers should not run in privileged mode as it grants full host access",
    remediation: "Set securityContext.privileged to false",
};

pub static K8S_RUN_AS_NON_ROOT: Policy = Policy {
    id: "K8S-SEC-002",
    name: "Run as Non-Root",
    category: K8S_SECURITY,
    severity: Severity::High,
    description: "Containers should run as non-root user to limit potential damage",
    remediation: "Set securityContext.runAsNonRoot to true and specify runAsUser",
};

pub static K8S_READ_ONLY_ROOT_FS: Policy = Policy {
    id: "K8S-SEC-003",
    name: "Read-Only Root Filesystem",
    category: K8S_SECURITY,
    severity: Severity::Medium,
    description: "Container root filesystem should be read-only to prevent modifications",
    remediation: "Set securityContext.readOnlyRootFilesystem to true",
};

pub static K8S_HOST_NETWORK: Policy = Policy {
    id: "K8S-SEC-004",
    name: "No Host Network",
    category: K8S_SECURITY,
    severity: Severity::High,
    description: "Pods should not use the host network namespace",
    remediation: "Set hostNetwork to false",
};

pub static K8S_HOST_PID: Policy = Policy {
    id: "K8S-SEC-005",
    name: "No Host PID",
    category: K8S_SECURITY,
    severity: Severity::High,
    description: "Pods should not share the host PID namespace",
    remediation: "Set hostPID to false",
};

pub static K8S_LATEST_TAG: Policy = Policy {
    id: "K8S-IMG-001",
    name: "No Latest Tag",
    category: K8S_BEST_PRACTICES,
    severity: Severity::Medium,
    description: "Images should use specific tags instead of 'latest'",
    remediation: "Use specific version tags for container images",
};

pub static K8S_LIVENESS_PROBE: Policy = Policy {
    id: "K8S-PROBE-001",
    name: "Liveness Probe",
    category: K8S_BEST_PRACTICES,
    severity: Severity::Medium,
    description: "Containers should have liveness probes for automatic restart",
    remediation: "Add livenessProbe to container spec",
};

pub static K8S_READINESS_PROBE: Policy = Policy {
    id: "K8S-PROBE-002",
    name: "Readiness Probe",
    category: K8S_BEST_PRACTICES,
    severity: Severity::Medium,
    description: "Containers should have readiness probes for traffic management",
    remediation: "Add readinessProbe to container spec",
};

pub static K8S_CPU_LIMIT: Policy = Policy {
    id: "K8S-RES-001",
    name: "CPU Limits",
    category: K8S_RESOURCES,
    severity: Severity::Medium,
    description: "Containers should have CPU limits to prevent resource starvation",
    remediation: "Set resources.limits.cpu",
};

pub static K8S_MEMORY_LIMIT: Policy = Policy {
    id: "K8S-RES-002",
    name: "Memory Limits",
    category: K8S_RESOURCES,
    severity: Severity::High,
    description: "Containers should have memory limits to prevent OOM issues",
    remediation: "Set resources.limits.memory",
};

pub static K8S_CPU_REQUEST: Policy = Policy {
    id: "K8S-RES-003",
    name: "CPU Requests",
    category: K8S_RESOURCES,
    severity: Severity::Low,
    description: "Containers should request CPU so the scheduler can place them",
    remediation: "Set resources.requests.cpu",
};

pub static K8S_MEMORY_REQUEST: Policy = Policy {
    id: "K8S-RES-004",
    name: "Memory Requests",
    category: K8S_RESOURCES,
    severity: Severity::Low,
    description: "Containers should request memory so the scheduler can place them",
    remediation: "Set resources.requests.memory",
};

pub static K8S_NETWORK_POLICIES: Policy = Policy {
    id: "K8S-NET-001",
    name: "Network Policies",
    category: K8S_NETWORK,
    severity: Severity::Medium,
    description: "Namespaces should have NetworkPolicies to restrict traffic",
    remediation: "Define NetworkPolicies for the namespace",
};

pub static K8S_CLUSTER_ADMIN: Policy = Policy {
    id: "K8S-RBAC-001",
    name: "Cluster Admin Bindings",
    category: K8S_RBAC,
    severity: Severity::High,
    description: "Avoid granting cluster-admin role to non-system users",
    remediation: "Use more restrictive roles",
};

// ============================================================================
// Docker runtime
// ============================================================================

pub static DOCKER_PRIVILEGED: Policy = Policy {
    id: "DOCKER-SEC-001",
    name: "No Privileged Containers",
    category: DOCKER_SECURITY,
    severity: Severity::Critical,
    description: "Containers should not run in privileged mode",
    remediation: "Remove --privileged flag",
};

pub static DOCKER_ROOT_USER: Policy = Policy {
    id: "DOCKER-SEC-002",
    name: "Non-Root User",
    category: DOCKER_SECURITY,
    severity: Severity::High,
    description: "Containers should run as non-root user",
    remediation: "Use USER directive in Dockerfile or --user flag",
};

pub static DOCKER_HOST_NETWORK: Policy = Policy {
    id: "DOCKER-SEC-003",
    name: "No Host Network",
    category: DOCKER_SECURITY,
    severity: Severity::High,
    description: "Containers should not use host network",
    remediation: "Use bridge or custom network",
};

pub static DOCKER_HOST_PID: Policy = Policy {
    id: "DOCKER-SEC-004",
    name: "No Host PID",
    category: DOCKER_SECURITY,
    severity: Severity::High,
    description: "Containers should not share host PID namespace",
    remediation: "Remove --pid=host flag",
};

pub static DOCKER_DANGEROUS_CAPABILITIES: Policy = Policy {
    id: "DOCKER-SEC-005",
    name: "No Dangerous Capabilities",
    category: DOCKER_SECURITY,
    severity: Severity::High,
    description: "Containers should not have dangerous Linux capabilities",
    remediation: "Remove unnecessary --cap-add flags",
};

pub static DOCKER_READ_ONLY_ROOT_FS: Policy = Policy {
    id: "DOCKER-SEC-006",
    name: "Read-Only Root Filesystem",
    category: DOCKER_SECURITY,
    severity: Severity::Medium,
    description: "Container root filesystem should be read-only",
    remediation: "Use --read-only flag",
};

pub static DOCKER_MEMORY_LIMIT: Policy = Policy {
    id: "DOCKER-RES-001",
    name: "Memory Limits",
    category: DOCKER_RESOURCES,
    severity: Severity::Medium,
    description: "Containers should have memory limits",
    remediation: "Set --memory flag",
};

pub static DOCKER_CPU_LIMIT: Policy = Policy {
    id: "DOCKER-RES-002",
    name: "CPU Limits",
    category: DOCKER_RESOURCES,
    severity: Severity::Low,
    description: "Containers should have CPU limits",
    remediation: "Set --cpus or --cpu-quota flag",
};

pub static DOCKER_RESTART_POLICY: Policy = Policy {
    id: "DOCKER-CFG-001",
    name: "Restart Policy",
    category: DOCKER_CONFIGURATION,
    severity: Severity::Low,
    description: "Containers should have a restart policy",
    remediation: "Set --restart=unless-stopped",
};

pub static DOCKER_HEALTH_CHECK: Policy = Policy {
    id: "DOCKER-CFG-002",
    name: "Health Check",
    category: DOCKER_CONFIGURATION,
    severity: Severity::Medium,
    description: "Containers should have health checks",
    remediation: "Add HEALTHCHECK in Dockerfile or --health-cmd",
};

pub static DOCKER_IMAGE_LATEST_TAG: Policy = Policy {
    id: "DOCKER-IMG-001",
    name: "No Latest Tag",
    category: DOCKER_IMAGES,
    severity: Severity::Medium,
    description: "Images should use specific tags",
    remediation: "Use specific version tags",
};

pub static DOCKER_IMAGE_SIZE: Policy = Policy {
    id: "DOCKER-IMG-002",
    name: "Image Size",
    category: DOCKER_IMAGES,
    severity: Severity::Low,
    description: "Images should not be excessively large",
    remediation: "Use multi-stage builds or smaller base images",
};

pub static DOCKER_IMAGE_ROOT_USER: Policy = Policy {
    id: "DOCKER-IMG-003",
    name: "Non-Root User in Image",
    category: DOCKER_IMAGES,
    severity: Severity::Medium,
    description: "Images should define a non-root user",
    remediation: "Add USER directive in Dockerfile",
};

pub static DOCKER_IMAGE_PRIVILEGED_PORTS: Policy = Policy {
    id: "DOCKER-IMG-004",
    name: "Privileged Ports",
    category: DOCKER_IMAGES,
    severity: Severity::Low,
    description: "Images should not expose ports below 1024",
    remediation: "Use non-privileged ports (>1024)",
};

// ============================================================================
// Files
// ============================================================================

pub static FILE_K8S_LATEST_TAG: Policy = Policy {
    id: "FILE-K8S-001",
    name: "No Latest Tag in Manifests",
    category: FILE_COMPLIANCE,
    severity: Severity::Medium,
    description: "Kubernetes manifests should use specific image tags",
    remediation: "Use specific version tags",
};

pub static FILE_K8S_RESOURCE_LIMITS: Policy = Policy {
    id: "FILE-K8S-002",
    name: "Resource Limits in Manifests",
    category: FILE_COMPLIANCE,
    severity: Severity::Medium,
    description: "Kubernetes manifests should define resource limits",
    remediation: "Add resources.limits",
};

pub static FILE_K8S_SECURITY_CONTEXT: Policy = Policy {
    id: "FILE-K8S-003",
    name: "Security Context in Manifests",
    category: FILE_COMPLIANCE,
    severity: Severity::High,
    description: "Kubernetes manifests should define security context",
    remediation: "Add securityContext",
};

pub static FILE_K8S_LIVENESS_PROBE: Policy = Policy {
    id: "FILE-K8S-004",
    name: "Liveness Probe in Manifests",
    category: FILE_COMPLIANCE,
    severity: Severity::Medium,
    description: "Kubernetes manifests should define liveness probes",
    remediation: "Add livenessProbe",
};

pub static FILE_DOCKER_ADD: Policy = Policy {
    id: "FILE-DOCKER-001",
    name: "Use COPY Instead of ADD",
    category: FILE_COMPLIANCE,
    severity: Severity::Low,
    description: "Dockerfiles should use COPY for local files",
    remediation: "Replace ADD with COPY for local files",
};

pub static FILE_DOCKER_DOWNLOAD_CLEANUP: Policy = Policy {
    id: "FILE-DOCKER-002",
    name: "Clean Up Downloads",
    category: FILE_COMPLIANCE,
    severity: Severity::Low,
    description: "Downloaded files should be removed in the layer that fetched them",
    remediation: "Combine download and cleanup in single RUN command",
};

pub static FILE_DOCKER_USER: Policy = Policy {
    id: "FILE-DOCKER-003",
    name: "USER in Dockerfile",
    category: FILE_COMPLIANCE,
    severity: Severity::High,
    description: "Dockerfiles should define a non-root USER",
    remediation: "Add USER directive",
};

pub static FILE_DOCKER_HEALTHCHECK: Policy = Policy {
    id: "FILE-DOCKER-004",
    name: "HEALTHCHECK in Dockerfile",
    category: FILE_COMPLIANCE,
    severity: Severity::Medium,
    description: "Dockerfiles should define a HEALTHCHECK",
    remediation: "Add HEALTHCHECK directive",
};

pub static FILE_DOCKER_BASE_TAG: Policy = Policy {
    id: "FILE-DOCKER-005",
    name: "Specific Base Image Tag",
    category: FILE_COMPLIANCE,
    severity: Severity::Medium,
    description: "Dockerfiles should pin the base image to a specific tag",
    remediation: "Use specific version tag for base image",
};

pub static FILE_COMPOSE_PRIVILEGED: Policy = Policy {
    id: "FILE-COMPOSE-001",
    name: "No Privileged in Compose",
    category: FILE_COMPLIANCE,
    severity: Severity::Critical,
    description: "Docker Compose services should not be privileged",
    remediation: "Remove privileged: true",
};

pub static FILE_COMPOSE_HOST_NETWORK: Policy = Policy {
    id: "FILE-COMPOSE-002",
    name: "No Host Network in Compose",
    category: FILE_COMPLIANCE,
    severity: Severity::High,
    description: "Docker Compose services should not use the host network",
    remediation: "Remove network_mode: host",
};

pub static FILE_COMPOSE_RESTART_POLICY: Policy = Policy {
    id: "FILE-COMPOSE-003",
    name: "Restart Policy in Compose",
    category: FILE_COMPLIANCE,
    severity: Severity::Low,
    description: "Docker Compose services should define a restart policy",
    remediation: "Add restart: unless-stopped",
};

pub static FILE_COMPOSE_IMAGE_TAG: Policy = Policy {
    id: "FILE-COMPOSE-004",
    name: "Specific Image Tag in Compose",
    category: FILE_COMPLIANCE,
    severity: Severity::Medium,
    description: "Docker Compose services should use specific image tags",
    remediation: "Use specific version tags",
};

static CATALOG: &[&Policy] = &[
    &K8S_PRIVILEGED,
    &K8S_RUN_AS_NON_ROOT,
    &K8S_READ_ONLY_ROOT_FS,
    &K8S_HOST_NETWORK,
    &K8S_HOST_PID,
    &K8S_LATEST_TAG,
    &K8S_LIVENESS_PROBE,
    &K8S_READINESS_PROBE,
    &K8S_CPU_LIMIT,
    &K8S_MEMORY_LIMIT,
    &K8S_CPU_REQUEST,
    &K8S_MEMORY_REQUEST,
    &K8S_NETWORK_POLICIES,
    &K8S_CLUSTER_ADMIN,
    &DOCKER_PRIVILEGED,
    &DOCKER_ROOT_USER,
    &DOCKER_HOST_NETWORK,
    &DOCKER_HOST_PID,
    &DOCKER_DANGEROUS_CAPABILITIES,
    &DOCKER_READ_ONLY_ROOT_FS,
    &DOCKER_MEMORY_LIMIT,
    &DOCKER_CPU_LIMIT,
    &DOCKER_RESTART_POLICY,
    &DOCKER_HEALTH_CHECK,
    &DOCKER_IMAGE_LATEST_TAG,
    &DOCKER_IMAGE_SIZE,
    &DOCKER_IMAGE_ROOT_USER,
    &DOCKER_IMAGE_PRIVILEGED_PORTS,
    &FILE_K8S_LATEST_TAG,
    &FILE_K8S_RESOURCE_LIMITS,
    &FILE_K8S_SECURITY_CONTEXT,
    &FILE_K8S_LIVENESS_PROBE,
    &FILE_DOCKER_ADD,
    &FILE_DOCKER_DOWNLOAD_CLEANUP,
    &FILE_DOCKER_USER,
    &FILE_DOCKER_HEALTHCHECK,
    &FILE_DOCKER_BASE_TAG,
    &FILE_COMPOSE_PRIVILEGED,
    &FILE_COMPOSE_HOST_NETWORK,
    &FILE_COMPOSE_RESTART_POLICY,
    &FILE_COMPOSE_IMAGE_TAG,
];

static BY_ID: Lazy<HashMap<&'static str, &'static Policy>> =
    Lazy::new(|| CATALOG.iter().map(|p| (p.id, *p)).collect());

/// All built-in policies, in catalog order.
pub fn all_policies() -> &'static [&'static Policy] {
    CATALOG
}

/// Look up a policy by rule id.
pub fn find_policy(id: &str) -> Option<&'static Policy> {
    BY_ID.get(id).copied()
}

/// Policies in the given category (case-insensitive), in catalog order.
pub fn policies_by_category(category: &str) -> Vec<&'static Policy> {
    CATALOG
        .iter()
        .copied()
        .filter(|p| p.category.eq_ignore_ascii_case(category))
        .collect()
}

/// Catalog listing filtered by category substring and exact severity.
pub fn list_policies(category: Option<&str>, severity: Option<Severity>) -> Vec<&'static Policy> {
    let category = category.map(|c| c.to_lowercase());
    CATALOG
        .iter()
        .copied()
        .filter(|p| match &category {
            Some(c) => p.category.to_lowercase().contains(c.as_str()),
            None => true,
        })
        .filter(|p| severity.is_none_or(|s| p.severity == s))
        .collect()
}
