//! Docker runtime checks.
//!
//! Emits failure-only findings for every container known to the daemon and,
//! when an image name is given, for that image. Failing to reach the daemon
//! aborts the checker.

use super::{Checker, SubCheck};
use crate::compliance::policies::{
    DOCKER_CPU_LIMIT, DOCKER_DANGEROUS_CAPABILITIES, DOCKER_HEALTH_CHECK, DOCKER_HOST_NETWORK,
    DOCKER_HOST_PID, DOCKER_IMAGE_LATEST_TAG, DOCKER_IMAGE_PRIVILEGED_PORTS,
    DOCKER_IMAGE_ROOT_USER, DOCKER_IMAGE_SIZE, DOCKER_MEMORY_LIMIT, DOCKER_PRIVILEGED,
    DOCKER_READ_ONLY_ROOT_FS, DOCKER_RESTART_POLICY, DOCKER_ROOT_USER,
};
use crate::compliance::providers::{
    ContainerInspect, DockerCli, ImageInspect, ProviderError, RuntimeConnector, RuntimeProvider,
};
use crate::compliance::types::{CheckOptions, CheckResult};

const DANGEROUS_CAPABILITIES: &[&str] = &[
    "SYS_ADMIN",
    "SYS_PTRACE",
    "NET_ADMIN",
    "SYS_MODULE",
    "SYS_RAWIO",
    "SYS_BOOT",
    "MAC_ADMIN",
    "MAC_OVERRIDE",
];

const LARGE_IMAGE_MIB: i64 = 1000;
const PRIVILEGED_PORT_LIMIT: u16 = 1024;

pub struct RuntimeChecker<C = DockerCli> {
    connector: C,
}

impl<C: RuntimeConnector> RuntimeChecker<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }
}

impl<C: RuntimeConnector> Checker for RuntimeChecker<C> {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn run(&self, options: &CheckOptions) -> Result<Vec<CheckResult>, ProviderError> {
        let provider = self.connector.connect()?;
        let mut results = Vec::new();

        check_containers(provider.as_ref()).fold_into("container", &mut results);

        if let Some(image) = options.image.as_deref().filter(|i| !i.is_empty()) {
            match provider.inspect_image(image) {
                Ok(inspect) => results.extend(check_image(image, &inspect)),
                Err(err) => SubCheck::failed(err).fold_into("image", &mut results),
            }
        }

        log::debug!("Docker checks produced {} results", results.len());
        Ok(results)
    }
}

fn check_containers(provider: &dyn RuntimeProvider) -> SubCheck {
    let ids = match provider.list_containers() {
        Ok(ids) => ids,
        Err(err) => return SubCheck::failed(err),
    };

    let mut results = Vec::new();
    for id in &ids {
        match provider.inspect_container(id) {
            Ok(inspect) => results.extend(check_container(&inspect)),
            Err(err) => log::debug!("Skipping container {}: {}", id, err),
        }
    }
    SubCheck::ok(results)
}

/// Findings for one inspected container.
pub fn check_container(inspect: &ContainerInspect) -> Vec<CheckResult> {
    let name = inspect.name.trim_start_matches('/');
    let host = &inspect.host_config;
    let mut results = Vec::new();

    if host.privileged {
        results.push(DOCKER_PRIVILEGED.fail(name, "Container is running in privileged mode"));
    }

    let shares_host_userns = host.userns_mode.is_empty() || host.userns_mode == "host";
    if shares_host_userns && is_root_user(&inspect.config.user) {
        results.push(DOCKER_ROOT_USER.fail(name, "Container is running as root"));
    }

    if host.network_mode == "host" {
        results.push(DOCKER_HOST_NETWORK.fail(name, "Container is using host network"));
    }

    if host.pid_mode == "host" {
        results.push(DOCKER_HOST_PID.fail(name, "Container is using host PID namespace"));
    }

    for cap in &host.cap_add {
        if is_dangerous_capability(cap) {
            results.push(DOCKER_DANGEROUS_CAPABILITIES.fail(
                name,
                format!("Container has dangerous capability: {}", cap),
            ));
        }
    }

    if host.memory == 0 {
        results.push(DOCKER_MEMORY_LIMIT.fail(name, "Container has no memory limit"));
    }

    if host.cpu_quota == 0 && host.nano_cpus == 0 {
        results.push(DOCKER_CPU_LIMIT.fail(name, "Container has no CPU limit"));
    }

    let restart = host.restart_policy.name.as_str();
    if restart.is_empty() || restart == "no" {
        results.push(DOCKER_RESTART_POLICY.fail(name, "Container has no restart policy"));
    }

    let has_healthcheck = inspect
        .config
        .healthcheck
        .as_ref()
        .is_some_and(|hc| !hc.test.is_empty() && hc.test.first().map(String::as_str) != Some("NONE"));
    if !has_healthcheck {
        results.push(DOCKER_HEALTH_CHECK.fail(name, "Container has no health check"));
    }

    if !host.readonly_rootfs {
        results.push(DOCKER_READ_ONLY_ROOT_FS.fail(name, "Container has writable root filesystem"));
    }

    results
}

/// Findings for one inspected image.
pub fn check_image(image: &str, inspect: &ImageInspect) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if inspect.repo_tags.iter().any(|tag| tag.ends_with(":latest")) {
        results.push(DOCKER_IMAGE_LATEST_TAG.fail(image, "Image uses 'latest' tag"));
    }

    let size_mib = inspect.size / (1024 * 1024);
    if size_mib > LARGE_IMAGE_MIB {
        results.push(DOCKER_IMAGE_SIZE.fail(image, format!("Image is large: {} MB", size_mib)));
    }

    if is_root_user(&inspect.config.user) {
        results.push(DOCKER_IMAGE_ROOT_USER.fail(image, "Image runs as root by default"));
    }

    // One finding per exposed port key, so 80/tcp and 80/udp both count
    let mut ports: Vec<(u16, &str)> = inspect
        .config
        .exposed_ports
        .keys()
        .filter_map(|spec| {
            let port: u16 = spec.split('/').next()?.parse().ok()?;
            Some((port, spec.as_str()))
        })
        .filter(|(port, _)| *port < PRIVILEGED_PORT_LIMIT)
        .collect();
    ports.sort_unstable();
    for (port, _) in ports {
        results.push(DOCKER_IMAGE_PRIVILEGED_PORTS.fail(
            image,
            format!("Image exposes privileged port: {}", port),
        ));
    }

    results
}

/// Empty, `root` and `0` (optionally followed by `:group`) run as root.
fn is_root_user(user: &str) -> bool {
    let user = user.split(':').next().unwrap_or_default().trim();
    user.is_empty() || user == "root" || user == "0"
}

fn is_dangerous_capability(cap: &str) -> bool {
    let upper = cap.trim().to_uppercase();
    let normalized = upper.strip_prefix("CAP_").unwrap_or(&upper);
    DANGEROUS_CAPABILITIES.contains(&normalized)
}
