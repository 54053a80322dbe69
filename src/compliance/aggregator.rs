//! Checker dispatch, result merging and report building.

use std::fmt;
use std::str::FromStr;

use super::checkers::{Checker, ClusterChecker, FileChecker, RuntimeChecker};
use super::filter::filter_results;
use super::providers::{DockerCli, KubeConnector, ProviderError};
use super::types::{CheckOptions, CheckResult, Report, Severity};
use crate::error::ComplianceError;

pub const DEFAULT_REPORT_TITLE: &str = "Compliance Report";

/// Which checkers to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Cluster,
    Runtime,
    Files,
    All,
}

impl Target {
    /// Parse a target name or alias (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cluster" | "k8s" | "kubernetes" => Some(Self::Cluster),
            "runtime" | "docker" => Some(Self::Runtime),
            "files" | "file" => Some(Self::Files),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cluster => "k8s",
            Self::Runtime => "docker",
            Self::Files => "files",
            Self::All => "all",
        }
    }
}

impl FromStr for Target {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ComplianceError::UnknownTarget(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options that shape the final report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// When false, passed results are dropped before the summary is computed.
    pub include_passed: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            include_passed: true,
        }
    }
}

/// Owns one checker per domain and runs them for a target.
pub struct Aggregator {
    cluster: Box<dyn Checker>,
    runtime: Box<dyn Checker>,
    files: Box<dyn Checker>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::with_connectors(KubeConnector::new(), DockerCli::default())
    }
}

impl Aggregator {
    pub fn new(cluster: Box<dyn Checker>, runtime: Box<dyn Checker>, files: Box<dyn Checker>) -> Self {
        Self {
            cluster,
            runtime,
            files,
        }
    }

    /// Production checkers talking to the given cluster and runtime.
    pub fn with_connectors(kube: KubeConnector, docker: DockerCli) -> Self {
        Self::new(
            Box::new(ClusterChecker::new(kube)),
            Box::new(RuntimeChecker::new(docker)),
            Box::new(FileChecker::new()),
        )
    }

    /// Checkers selected by `target`, in invocation order.
    fn checkers(&self, target: Target) -> Vec<&dyn Checker> {
        match target {
            Target::Cluster => vec![self.cluster.as_ref()],
            Target::Runtime => vec![self.runtime.as_ref()],
            Target::Files => vec![self.files.as_ref()],
            Target::All => vec![self.cluster.as_ref(), self.runtime.as_ref(), self.files.as_ref()],
        }
    }

    /// Run the selected checkers and concatenate their unfiltered results.
    ///
    /// A checker error (runtime connection failure) aborts the run.
    pub fn run(&self, target: Target, options: &CheckOptions) -> Result<Vec<CheckResult>, ProviderError> {
        let mut results = Vec::new();
        for checker in self.checkers(target) {
            log::info!("Running {} compliance checks", checker.name());
            let found = checker.run(options)?;
            log::debug!("{} checker returned {} results", checker.name(), found.len());
            results.extend(found);
        }
        Ok(results)
    }

    /// Run the selected checkers and apply the skip/only/severity filter.
    pub fn check(&self, target: Target, options: &CheckOptions) -> Result<Vec<CheckResult>, ProviderError> {
        let results = self.run(target, options)?;
        Ok(filter_results(results, options))
    }

    /// Run, filter and summarize into a report.
    pub fn report(
        &self,
        target: Target,
        options: &CheckOptions,
        report_options: &ReportOptions,
    ) -> Result<Report, ProviderError> {
        let results = self.check(target, options)?;
        Ok(build_report(results, report_options))
    }
}

/// Build a report from already-filtered results.
pub fn build_report(results: Vec<CheckResult>, options: &ReportOptions) -> Report {
    let results = if options.include_passed {
        results
    } else {
        results.into_iter().filter(|r| !r.is_passed()).collect()
    };
    Report::new(options.title.clone(), results)
}

/// Whether a run should exit non-zero.
///
/// Any high or critical failure fails the run; with `fail_on_warn`, any
/// failure does.
pub fn should_fail(results: &[CheckResult], fail_on_warn: bool) -> bool {
    results
        .iter()
        .filter(|r| r.is_failed())
        .any(|r| fail_on_warn || r.severity >= Severity::High)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::policies::{
        DOCKER_CPU_LIMIT, FILE_DOCKER_USER, K8S_LIVENESS_PROBE, K8S_PRIVILEGED,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Scripted {
        name: &'static str,
        outcome: Result<Vec<CheckResult>, String>,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Checker for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn run(&self, _options: &CheckOptions) -> Result<Vec<CheckResult>, ProviderError> {
            self.calls.borrow_mut().push(self.name);
            self.outcome
                .clone()
                .map_err(ProviderError::Connection)
        }
    }

    fn aggregator(runtime: Result<Vec<CheckResult>, String>) -> (Aggregator, Rc<RefCell<Vec<&'static str>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let agg = Aggregator::new(
            Box::new(Scripted {
                name: "k8s",
                outcome: Ok(vec![K8S_PRIVILEGED.pass("default/web", "ok")]),
                calls: calls.clone(),
            }),
            Box::new(Scripted {
                name: "docker",
                outcome: runtime,
                calls: calls.clone(),
            }),
            Box::new(Scripted {
                name: "files",
                outcome: Ok(vec![FILE_DOCKER_USER.fail("Dockerfile", "no user")]),
                calls: calls.clone(),
            }),
        );
        (agg, calls)
    }

    #[test]
    fn test_target_aliases() {
        assert_eq!(Target::parse("kubernetes"), Some(Target::Cluster));
        assert_eq!(Target::parse("K8S"), Some(Target::Cluster));
        assert_eq!(Target::parse("docker"), Some(Target::Runtime));
        assert_eq!(Target::parse("file"), Some(Target::Files));
        assert_eq!(Target::parse("all"), Some(Target::All));
        assert!("nomad".parse::<Target>().is_err());
    }

    #[test]
    fn test_all_runs_in_fixed_order() {
        let (agg, calls) = aggregator(Ok(vec![DOCKER_CPU_LIMIT.fail("api", "no cpu")]));
        let results = agg.run(Target::All, &CheckOptions::default()).unwrap();
        assert_eq!(*calls.borrow(), vec!["k8s", "docker", "files"]);
        let ids: Vec<_> = results.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["K8S-SEC-001", "DOCKER-RES-002", "FILE-DOCKER-003"]);
    }

    #[test]
    fn test_single_target_runs_one_checker() {
        let (agg, calls) = aggregator(Ok(Vec::new()));
        agg.run(Target::Files, &CheckOptions::default()).unwrap();
        assert_eq!(*calls.borrow(), vec!["files"]);
    }

    #[test]
    fn test_runtime_error_aborts_run() {
        let (agg, calls) = aggregator(Err("daemon not running".to_string()));
        let err = agg.run(Target::All, &CheckOptions::default()).unwrap_err();
        assert!(err.is_connection());
        assert_eq!(*calls.borrow(), vec!["k8s", "docker"]);
    }

    #[test]
    fn test_report_applies_filter_then_summarizes() {
        let (agg, _) = aggregator(Ok(vec![DOCKER_CPU_LIMIT.fail("api", "no cpu")]));
        let options = CheckOptions::default().with_min_severity(Severity::Medium);
        let report = agg
            .report(Target::All, &options, &ReportOptions::default())
            .unwrap();
        assert_eq!(report.title, DEFAULT_REPORT_TITLE);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.failed, 1);
        assert!((report.summary.score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_report_excluding_passed() {
        let results = vec![
            K8S_PRIVILEGED.pass("default/web", "ok"),
            K8S_LIVENESS_PROBE.fail("default/web", "no probe"),
        ];
        let options = ReportOptions {
            title: "Nightly".to_string(),
            include_passed: false,
        };
        let report = build_report(results, &options);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.summary.passed, 0);
        assert_eq!(report.summary.score, 0.0);
    }

    #[test]
    fn test_should_fail() {
        let medium = vec![K8S_LIVENESS_PROBE.fail("default/web", "no probe")];
        assert!(!should_fail(&medium, false));
        assert!(should_fail(&medium, true));

        let critical = vec![K8S_PRIVILEGED.fail("default/web", "privileged")];
        assert!(should_fail(&critical, false));

        let passed = vec![K8S_PRIVILEGED.pass("default/web", "ok")];
        assert!(!should_fail(&passed, true));
    }
}
