use serde::{Deserialize, Serialize};

/// Main configuration structure (`.compliance.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub check: CheckConfig,
    pub report: ReportConfig,
    pub cluster: ClusterConfig,
    pub runtime: RuntimeConfig,
}

/// Defaults for `check` and `report` filtering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Rule ids to skip
    pub skip: Vec<String>,
    /// Only run these rule ids
    pub only: Vec<String>,
    /// Minimum severity to report (low, medium, high, critical)
    pub min_severity: Option<String>,
    /// Exit non-zero on any failure, not just high/critical
    pub fail_on_warn: bool,
}

/// Report output defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub format: String,
    pub include_passed: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Compliance Report".to_string(),
            format: "table".to_string(),
            include_passed: true,
        }
    }
}

/// Kubernetes connection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub namespace: Option<String>,
    /// kubeconfig context (defaults to the current context)
    pub context: Option<String>,
}

/// Docker runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub image: Option<String>,
    pub docker_binary: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            image: None,
            docker_binary: "docker".to_string(),
        }
    }
}
