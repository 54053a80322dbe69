use crate::cli::CheckArgs;
use crate::compliance::providers::{DockerCli, KubeConnector};
use crate::compliance::{Aggregator, CheckOptions, Severity};
use crate::config::types::Config;
use crate::error::{ComplianceError, Result};

/// Parse a severity name, rejecting anything outside low/medium/high/critical.
pub fn parse_severity(value: &str) -> Result<Severity> {
    Severity::parse(value).ok_or_else(|| ComplianceError::InvalidSeverity(value.to_string()))
}

/// Merge command-line flags over the loaded configuration.
///
/// Flags win; a non-empty `--skip`/`--only` list replaces the configured one.
pub fn resolve_options(args: &CheckArgs, config: &Config) -> Result<CheckOptions> {
    let severity = args
        .severity
        .as_deref()
        .or(config.check.min_severity.as_deref())
        .map(parse_severity)
        .transpose()?;

    let skip = if args.skip.is_empty() {
        config.check.skip.clone()
    } else {
        args.skip.clone()
    };
    let only = if args.only.is_empty() {
        config.check.only.clone()
    } else {
        args.only.clone()
    };

    Ok(CheckOptions {
        namespace: args.namespace.clone().or_else(|| config.cluster.namespace.clone()),
        image: args.image.clone().or_else(|| config.runtime.image.clone()),
        path: args.path.clone(),
        skip: clean_ids(skip),
        only: clean_ids(only),
        min_severity: severity,
    })
}

/// Aggregator wired to the configured kube context and docker binary.
pub fn build_aggregator(config: &Config) -> Aggregator {
    Aggregator::with_connectors(
        KubeConnector::with_context(config.cluster.context.clone()),
        DockerCli::new(config.runtime.docker_binary.clone()),
    )
}

fn clean_ids(ids: Vec<String>) -> Vec<String> {
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.check.skip = vec!["K8S-PROBE-002".to_string()];
        config.check.min_severity = Some("medium".to_string());
        config.cluster.namespace = Some("prod".to_string());

        let args = CheckArgs {
            path: PathBuf::from("deploy"),
            skip: vec!["FILE-DOCKER-001".to_string(), " ".to_string()],
            severity: Some("high".to_string()),
            ..Default::default()
        };

        let options = resolve_options(&args, &config).unwrap();
        assert_eq!(options.skip, vec!["FILE-DOCKER-001"]);
        assert_eq!(options.min_severity, Some(Severity::High));
        assert_eq!(options.namespace.as_deref(), Some("prod"));
        assert_eq!(options.path, PathBuf::from("deploy"));
        assert!(options.only.is_empty());
    }

    #[test]
    fn test_config_used_when_flags_absent() {
        let mut config = Config::default();
        config.check.only = vec!["DOCKER-SEC-001".to_string()];
        config.check.min_severity = Some("CRITICAL".to_string());
        config.runtime.image = Some("shop:1.0".to_string());

        let options = resolve_options(&CheckArgs::default(), &config).unwrap();
        assert_eq!(options.only, vec!["DOCKER-SEC-001"]);
        assert_eq!(options.min_severity, Some(Severity::Critical));
        assert_eq!(options.image.as_deref(), Some("shop:1.0"));
    }

    #[test]
    fn test_invalid_severity_is_rejected() {
        let args = CheckArgs {
            severity: Some("urgent".to_string()),
            ..Default::default()
        };
        let err = resolve_options(&args, &Config::default()).unwrap_err();
        assert!(matches!(err, ComplianceError::InvalidSeverity(s) if s == "urgent"));
    }
}
