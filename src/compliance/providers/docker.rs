//! Docker runtime provider.
//!
//! Shells out to the `docker` CLI and parses its JSON inspect output.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::process::Command;

use super::{ProviderError, RuntimeConnector, RuntimeProvider};

/// Subset of `docker inspect <container>` used by the runtime checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContainerInspect {
    pub id: String,
    pub name: String,
    pub host_config: HostConfig,
    pub config: ContainerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HostConfig {
    pub privileged: bool,
    pub network_mode: String,
    pub pid_mode: String,
    pub userns_mode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cap_add: Vec<String>,
    pub memory: i64,
    pub cpu_quota: i64,
    pub nano_cpus: i64,
    pub restart_policy: RestartPolicy,
    pub readonly_rootfs: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RestartPolicy {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContainerConfig {
    pub user: String,
    pub healthcheck: Option<HealthConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HealthConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub test: Vec<String>,
}

/// Subset of `docker image inspect <image>`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ImageInspect {
    #[serde(deserialize_with = "null_as_default")]
    pub repo_tags: Vec<String>,
    pub size: i64,
    pub config: ImageConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ImageConfig {
    pub user: String,
    /// Keys look like `80/tcp`; values are always empty objects.
    #[serde(deserialize_with = "null_as_default")]
    pub exposed_ports: BTreeMap<String, serde_json::Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `docker` command-line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| format!("failed to execute {}: {}", self.binary, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(stderr.trim().to_string());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RuntimeConnector for DockerCli {
    fn connect(&self) -> Result<Box<dyn RuntimeProvider>, ProviderError> {
        let version = self
            .run(&["version", "--format", "{{.Server.Version}}"])
            .map_err(ProviderError::Connection)?;
        log::debug!("Connected to Docker daemon {}", version.trim());
        Ok(Box::new(self.clone()))
    }
}

impl RuntimeProvider for DockerCli {
    fn list_containers(&self) -> Result<Vec<String>, ProviderError> {
        let stdout = self
            .run(&["ps", "-a", "-q", "--no-trunc"])
            .map_err(|e| ProviderError::query("containers", e))?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn inspect_container(&self, id: &str) -> Result<ContainerInspect, ProviderError> {
        let stdout = self
            .run(&["container", "inspect", id])
            .map_err(|e| ProviderError::query("container", e))?;
        first_record(&stdout, "container")
    }

    fn inspect_image(&self, image: &str) -> Result<ImageInspect, ProviderError> {
        let stdout = self
            .run(&["image", "inspect", image])
            .map_err(|e| ProviderError::query("image", e))?;
        first_record(&stdout, "image")
    }
}

/// `docker inspect` prints a JSON array even for a single object.
fn first_record<T: serde::de::DeserializeOwned>(stdout: &str, kind: &str) -> Result<T, ProviderError> {
    let mut records: Vec<T> =
        serde_json::from_str(stdout).map_err(|e| ProviderError::query(kind, e))?;
    if records.is_empty() {
        return Err(ProviderError::query(kind, "no such object"));
    }
    Ok(records.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_container_inspect() {
        let json = r#"[{
            "Id": "abc123",
            "Name": "/web",
            "HostConfig": {
                "Privileged": true,
                "NetworkMode": "host",
                "PidMode": "",
                "UsernsMode": "",
                "CapAdd": ["SYS_ADMIN"],
                "Memory": 0,
                "CpuQuota": 0,
                "NanoCpus": 0,
                "RestartPolicy": {"Name": "no", "MaximumRetryCount": 0},
                "ReadonlyRootfs": false
            },
            "Config": {"User": "", "Healthcheck": null}
        }]"#;
        let inspect: ContainerInspect = first_record(json, "container").unwrap();
        assert_eq!(inspect.name, "/web");
        assert!(inspect.host_config.privileged);
        assert_eq!(inspect.host_config.cap_add, vec!["SYS_ADMIN"]);
        assert_eq!(inspect.host_config.restart_policy.name, "no");
        assert!(inspect.config.healthcheck.is_none());
    }

    #[test]
    fn test_parse_image_inspect_null_fields() {
        let json = r#"[{
            "RepoTags": null,
            "Size": 1048576,
            "Config": {"User": "app", "ExposedPorts": {"80/tcp": {}, "8080/tcp": {}}}
        }]"#;
        let inspect: ImageInspect = first_record(json, "image").unwrap();
        assert!(inspect.repo_tags.is_empty());
        assert_eq!(inspect.size, 1_048_576);
        assert_eq!(inspect.config.exposed_ports.len(), 2);
    }

    #[test]
    fn test_empty_inspect_output_is_query_error() {
        let err = first_record::<ImageInspect>("[]", "image").unwrap_err();
        assert!(!err.is_connection());
    }

    #[test]
    fn test_missing_binary_is_connection_error() {
        let cli = DockerCli::new("definitely-not-a-docker-binary");
        match cli.connect() {
            Err(err) => assert!(err.is_connection()),
            Ok(_) => panic!("expected connection failure"),
        }
    }
}
