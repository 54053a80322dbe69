//! Live Kubernetes cluster checks.
//!
//! Pods are listed once and evaluated in three passes (security, container
//! best practices, resources), followed by per-namespace network policy and
//! cluster-wide RBAC checks. A query failure only drops the affected
//! sub-check; failing to connect at all yields no results.

use k8s_openapi::api::core::v1::{Container, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;

use super::{Checker, SubCheck, is_floating_image};
use crate::compliance::policies::{
    K8S_CLUSTER_ADMIN, K8S_CPU_LIMIT, K8S_CPU_REQUEST, K8S_HOST_NETWORK, K8S_HOST_PID,
    K8S_LATEST_TAG, K8S_LIVENESS_PROBE, K8S_MEMORY_LIMIT, K8S_MEMORY_REQUEST,
    K8S_NETWORK_POLICIES, K8S_PRIVILEGED, K8S_READ_ONLY_ROOT_FS, K8S_READINESS_PROBE,
    K8S_RUN_AS_NON_ROOT,
};
use crate::compliance::providers::{
    ClusterConnector, ClusterProvider, KubeConnector, ProviderError,
};
use crate::compliance::types::{CheckOptions, CheckResult};

const SYSTEM_NAMESPACE_PREFIX: &str = "kube-";
const SYSTEM_BINDING_PREFIX: &str = "system:";
const CLUSTER_ADMIN_ROLE: &str = "cluster-admin";

pub struct ClusterChecker<C = KubeConnector> {
    connector: C,
}

impl<C: ClusterConnector> ClusterChecker<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }
}

impl<C: ClusterConnector> Checker for ClusterChecker<C> {
    fn name(&self) -> &'static str {
        "kubernetes"
    }

    fn run(&self, options: &CheckOptions) -> Result<Vec<CheckResult>, ProviderError> {
        let provider = match self.connector.connect() {
            Ok(provider) => provider,
            Err(err) => {
                log::warn!("Kubernetes cluster unavailable, skipping cluster checks: {}", err);
                return Ok(Vec::new());
            }
        };

        let namespace = options.namespace.as_deref().filter(|ns| !ns.is_empty());
        let mut results = Vec::new();

        match provider.list_pods(namespace) {
            Ok(pods) => {
                results.extend(check_pod_security(&pods));
                results.extend(check_containers(&pods));
                results.extend(check_resources(&pods));
            }
            Err(err) => SubCheck::failed(err).fold_into("pod", &mut results),
        }

        check_network_policies(provider.as_ref(), namespace).fold_into("network policy", &mut results);
        check_rbac(provider.as_ref()).fold_into("RBAC", &mut results);

        log::debug!("Kubernetes checks produced {} results", results.len());
        Ok(results)
    }
}

fn pod_resource(pod: &Pod) -> String {
    format!(
        "{}/{}",
        pod.metadata.namespace.as_deref().unwrap_or_default(),
        pod.metadata.name.as_deref().unwrap_or_default()
    )
}

/// Pods paired with their locator and spec; pods without a spec are skipped.
fn pods_with_spec(pods: &[Pod]) -> impl Iterator<Item = (String, &PodSpec)> {
    pods.iter()
        .filter_map(|pod| pod.spec.as_ref().map(|spec| (pod_resource(pod), spec)))
}

fn check_pod_security(pods: &[Pod]) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for (resource, spec) in pods_with_spec(pods) {
        let pod_non_root = spec
            .security_context
            .as_ref()
            .and_then(|sc| sc.run_as_non_root);

        for container in &spec.containers {
            let sc = container.security_context.as_ref();

            if sc.and_then(|sc| sc.privileged).unwrap_or(false) {
                results.push(K8S_PRIVILEGED.fail(
                    &resource,
                    format!("Container '{}' is running in privileged mode", container.name),
                ));
            } else {
                results.push(K8S_PRIVILEGED.pass(
                    &resource,
                    format!("Container '{}' is not privileged", container.name),
                ));
            }

            let non_root = sc.and_then(|sc| sc.run_as_non_root).or(pod_non_root);
            if non_root != Some(true) {
                results.push(K8S_RUN_AS_NON_ROOT.fail(
                    &resource,
                    format!("Container '{}' may run as root", container.name),
                ));
            }

            if sc.and_then(|sc| sc.read_only_root_filesystem) != Some(true) {
                results.push(K8S_READ_ONLY_ROOT_FS.fail(
                    &resource,
                    format!("Container '{}' has writable root filesystem", container.name),
                ));
            }
        }

        if spec.host_network.unwrap_or(false) {
            results.push(K8S_HOST_NETWORK.fail(&resource, "Pod is using host network"));
        }

        if spec.host_pid.unwrap_or(false) {
            results.push(K8S_HOST_PID.fail(&resource, "Pod is using host PID namespace"));
        }
    }

    results
}

fn check_containers(pods: &[Pod]) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for (resource, spec) in pods_with_spec(pods) {
        for container in &spec.containers {
            let image = container.image.as_deref().unwrap_or_default();
            if is_floating_image(image) {
                results.push(K8S_LATEST_TAG.fail(
                    &resource,
                    format!("Container '{}' uses latest or no tag: {}", container.name, image),
                ));
            }

            if container.liveness_probe.is_none() {
                results.push(K8S_LIVENESS_PROBE.fail(
                    &resource,
                    format!("Container '{}' has no liveness probe", container.name),
                ));
            }

            if container.readiness_probe.is_none() {
                results.push(K8S_READINESS_PROBE.fail(
                    &resource,
                    format!("Container '{}' has no readiness probe", container.name),
                ));
            }
        }
    }

    results
}

fn check_resources(pods: &[Pod]) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for (resource, spec) in pods_with_spec(pods) {
        for container in &spec.containers {
            let limits = resource_map(container, |r| r.limits.as_ref());
            let requests = resource_map(container, |r| r.requests.as_ref());

            if !has_quantity(limits, "cpu") {
                results.push(K8S_CPU_LIMIT.fail(
                    &resource,
                    format!("Container '{}' has no CPU limit", container.name),
                ));
            }
            if !has_quantity(limits, "memory") {
                results.push(K8S_MEMORY_LIMIT.fail(
                    &resource,
                    format!("Container '{}' has no memory limit", container.name),
                ));
            }
            if !has_quantity(requests, "cpu") {
                results.push(K8S_CPU_REQUEST.fail(
                    &resource,
                    format!("Container '{}' has no CPU request", container.name),
                ));
            }
            if !has_quantity(requests, "memory") {
                results.push(K8S_MEMORY_REQUEST.fail(
                    &resource,
                    format!("Container '{}' has no memory request", container.name),
                ));
            }
        }
    }

    results
}

type QuantityMap = BTreeMap<String, Quantity>;

fn resource_map(
    container: &Container,
    select: impl Fn(&k8s_openapi::api::core::v1::ResourceRequirements) -> Option<&QuantityMap>,
) -> Option<&QuantityMap> {
    container.resources.as_ref().and_then(select)
}

/// A quantity counts as set only when present and non-zero (`0`, `0m`, `0Mi` are unset).
fn has_quantity(map: Option<&QuantityMap>, key: &str) -> bool {
    let Some(quantity) = map.and_then(|m| m.get(key)) else {
        return false;
    };
    let value = quantity.0.trim();
    let numeric = value.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    match numeric.parse::<f64>() {
        Ok(n) => n != 0.0,
        Err(_) => !value.is_empty(),
    }
}

fn check_network_policies(provider: &dyn ClusterProvider, namespace: Option<&str>) -> SubCheck {
    let namespaces = match provider.list_namespaces() {
        Ok(namespaces) => namespaces,
        Err(err) => return SubCheck::failed(err),
    };

    let mut results = Vec::new();
    for ns in &namespaces {
        let Some(name) = ns.metadata.name.as_deref() else {
            continue;
        };
        if name.starts_with(SYSTEM_NAMESPACE_PREFIX) {
            continue;
        }
        if namespace.is_some_and(|filter| filter != name) {
            continue;
        }

        match provider.list_network_policies(name) {
            Ok(policies) if policies.is_empty() => {
                results.push(
                    K8S_NETWORK_POLICIES.fail(name, format!("Namespace '{}' has no NetworkPolicies", name)),
                );
            }
            Ok(policies) => {
                results.push(K8S_NETWORK_POLICIES.pass(
                    name,
                    format!("Namespace '{}' has {} NetworkPolicies", name, policies.len()),
                ));
            }
            Err(err) => {
                log::warn!("Skipping network policy check for namespace '{}': {}", name, err);
            }
        }
    }

    SubCheck::ok(results)
}

fn check_rbac(provider: &dyn ClusterProvider) -> SubCheck {
    let bindings = match provider.list_cluster_role_bindings() {
        Ok(bindings) => bindings,
        Err(err) => return SubCheck::failed(err),
    };

    let results = bindings
        .iter()
        .filter(|b| b.role_ref.name == CLUSTER_ADMIN_ROLE)
        .filter_map(|b| b.metadata.name.as_deref())
        .filter(|name| !name.starts_with(SYSTEM_BINDING_PREFIX))
        .map(|name| {
            K8S_CLUSTER_ADMIN.fail(name, format!("ClusterRoleBinding '{}' grants cluster-admin", name))
        })
        .collect();

    SubCheck::ok(results)
}
