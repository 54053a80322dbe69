pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".compliance.toml";

/// Get the global config file path (~/.compliance.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (project/.compliance.toml)
pub fn local_config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_FILE_NAME)
}

/// Load configuration.
///
/// An explicit file must exist and parse. Otherwise the local config is
/// tried first, then the global one, then defaults.
pub fn load_config(explicit: Option<&Path>, project_path: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }
        return read_config(path);
    }

    // Try local config first
    if let Some(project) = project_path {
        let local = local_config_path(project);
        if local.exists() {
            match read_config(&local) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Ignoring {}: {}", local.display(), e),
            }
        }
    }

    // Try global config
    if let Some(global) = global_config_path() {
        if global.exists() {
            match read_config(&global) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Ignoring {}: {}", global.display(), e),
            }
        }
    }

    Ok(types::Config::default())
}

fn read_config(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[check]
skip = ["K8S-PROBE-002"]
min_severity = "medium"
fail_on_warn = true

[report]
title = "Platform Compliance"

[runtime]
image = "shop:1.0"
"#,
        )
        .unwrap();

        let config = load_config(None, Some(dir.path())).unwrap();
        assert_eq!(config.check.skip, vec!["K8S-PROBE-002"]);
        assert_eq!(config.check.min_severity.as_deref(), Some("medium"));
        assert!(config.check.fail_on_warn);
        assert_eq!(config.report.title, "Platform Compliance");
        assert!(config.report.include_passed);
        assert_eq!(config.report.format, "table");
        assert_eq!(config.runtime.image.as_deref(), Some("shop:1.0"));
        assert_eq!(config.runtime.docker_binary, "docker");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing), None).is_err());
    }

    #[test]
    fn test_explicit_config_must_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[check\nskip = 1").unwrap();
        assert!(load_config(Some(&path), None).is_err());
    }
}
