//! Resource providers consumed by the checkers.
//!
//! A provider is opened once per checker run through its connector and
//! dropped when the run finishes. Production implementations talk to the
//! Kubernetes API ([`kubernetes::KubeConnector`]) and the Docker CLI
//! ([`docker::DockerCli`]); tests supply in-memory fakes.

pub mod docker;
pub mod kubernetes;

use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::rbac::v1::ClusterRoleBinding;
use thiserror::Error;

pub use docker::{ContainerInspect, DockerCli, ImageInspect};
pub use kubernetes::KubeConnector;

/// Error type for resource provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider could not be reached at all.
    #[error("Failed to connect: {0}")]
    Connection(String),

    /// A single query failed; other queries may still succeed.
    #[error("Failed to query {kind}: {message}")]
    Query { kind: String, message: String },
}

impl ProviderError {
    pub fn query(kind: impl Into<String>, message: impl ToString) -> Self {
        Self::Query {
            kind: kind.into(),
            message: message.to_string(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Typed snapshots of cluster resources.
pub trait ClusterProvider {
    /// Pods in `namespace`, or in all namespaces when `None`.
    fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, ProviderError>;

    fn list_namespaces(&self) -> Result<Vec<Namespace>, ProviderError>;

    fn list_network_policies(&self, namespace: &str) -> Result<Vec<NetworkPolicy>, ProviderError>;

    fn list_cluster_role_bindings(&self) -> Result<Vec<ClusterRoleBinding>, ProviderError>;
}

/// Opens a [`ClusterProvider`] for the duration of one run.
pub trait ClusterConnector {
    fn connect(&self) -> Result<Box<dyn ClusterProvider>, ProviderError>;
}

/// Container and image inspection records from a container runtime.
pub trait RuntimeProvider {
    /// Ids of all containers, running or not.
    fn list_containers(&self) -> Result<Vec<String>, ProviderError>;

    fn inspect_container(&self, id: &str) -> Result<ContainerInspect, ProviderError>;

    fn inspect_image(&self, image: &str) -> Result<ImageInspect, ProviderError>;
}

/// Opens a [`RuntimeProvider`] for the duration of one run.
pub trait RuntimeConnector {
    fn connect(&self) -> Result<Box<dyn RuntimeProvider>, ProviderError>;
}
