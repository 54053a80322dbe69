//! Docker Compose rules (FILE-COMPOSE-*).

use serde_yaml::Value;

use super::FileParseError;
use crate::compliance::checkers::is_floating_image;
use crate::compliance::policies::{
    FILE_COMPOSE_HOST_NETWORK, FILE_COMPOSE_IMAGE_TAG, FILE_COMPOSE_PRIVILEGED,
    FILE_COMPOSE_RESTART_POLICY,
};
use crate::compliance::types::CheckResult;

/// Evaluate each declared service, in declaration order.
pub fn check_compose(content: &str, resource: &str) -> Result<Vec<CheckResult>, FileParseError> {
    let compose: Value = serde_yaml::from_str(content)?;
    let Some(services) = compose.get("services").and_then(|s| s.as_mapping()) else {
        return Ok(Vec::new());
    };

    let mut results = Vec::new();
    for (name, service) in services {
        let name = match name {
            Value::String(s) => s.clone(),
            other => serde_yaml::to_string(other)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        };

        if service.get("privileged").and_then(Value::as_bool) == Some(true) {
            results.push(
                FILE_COMPOSE_PRIVILEGED.fail(resource, format!("Service '{}' is privileged", name)),
            );
        }

        if service.get("network_mode").and_then(Value::as_str) == Some("host") {
            results.push(FILE_COMPOSE_HOST_NETWORK.fail(
                resource,
                format!("Service '{}' uses host network", name),
            ));
        }

        let has_restart = service.get("restart").is_some_and(|v| !v.is_null());
        let has_deploy = service.get("deploy").is_some_and(|v| !v.is_null());
        if !has_restart && !has_deploy {
            results.push(FILE_COMPOSE_RESTART_POLICY.fail(
                resource,
                format!("Service '{}' has no restart policy", name),
            ));
        }

        if let Some(image) = service.get("image").and_then(Value::as_str) {
            if is_floating_image(image) {
                results.push(FILE_COMPOSE_IMAGE_TAG.fail(
                    resource,
                    format!("Service '{}' uses latest or no tag", name),
                ));
            }
        }
    }

    Ok(results)
}
