//! Kubernetes API provider backed by `kube`.
//!
//! The checkers are synchronous, so each connection owns a current-thread
//! tokio runtime and blocks on every request.

use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::rbac::v1::ClusterRoleBinding;
use kube::{
    Client, Config,
    api::{Api, ListParams},
    config::{KubeConfigOptions, Kubeconfig},
};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tokio::runtime::Runtime;

use super::{ClusterConnector, ClusterProvider, ProviderError};

/// Connects to the cluster named by the current (or given) kubeconfig context.
#[derive(Debug, Clone, Default)]
pub struct KubeConnector {
    context: Option<String>,
}

impl KubeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: Option<String>) -> Self {
        Self {
            context: context.filter(|c| !c.is_empty()),
        }
    }
}

impl ClusterConnector for KubeConnector {
    fn connect(&self) -> Result<Box<dyn ClusterProvider>, ProviderError> {
        // TLS for the K8s API
        let _ = rustls::crypto::ring::default_provider().install_default();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProviderError::Connection(format!("failed to start runtime: {}", e)))?;

        let client = runtime.block_on(create_client(self.context.as_deref()))?;
        Ok(Box::new(KubeProvider { client, runtime }))
    }
}

async fn create_client(context: Option<&str>) -> Result<Client, ProviderError> {
    let config = match context {
        Some(ctx) => {
            let kubeconfig = Kubeconfig::read().map_err(connection_error)?;
            Config::from_custom_kubeconfig(
                kubeconfig,
                &KubeConfigOptions {
                    context: Some(ctx.to_string()),
                    ..Default::default()
                },
            )
            .await
            .map_err(connection_error)?
        }
        None => Config::infer().await.map_err(connection_error)?,
    };

    let client = Client::try_from(config).map_err(connection_error)?;
    let version = client.apiserver_version().await.map_err(connection_error)?;
    log::debug!("Connected to Kubernetes API server {}.{}", version.major, version.minor);
    Ok(client)
}

fn connection_error(e: impl std::fmt::Display) -> ProviderError {
    ProviderError::Connection(e.to_string())
}

/// A live cluster connection.
pub struct KubeProvider {
    client: Client,
    runtime: Runtime,
}

impl KubeProvider {
    fn list<K>(&self, api: Api<K>, kind: &str) -> Result<Vec<K>, ProviderError>
    where
        K: Clone + DeserializeOwned + Debug,
    {
        self.runtime
            .block_on(api.list(&ListParams::default()))
            .map(|list| list.items)
            .map_err(|e| ProviderError::query(kind, e))
    }
}

impl ClusterProvider for KubeProvider {
    fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, ProviderError> {
        let api: Api<Pod> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        self.list(api, "pods")
    }

    fn list_namespaces(&self) -> Result<Vec<Namespace>, ProviderError> {
        self.list(Api::all(self.client.clone()), "namespaces")
    }

    fn list_network_policies(&self, namespace: &str) -> Result<Vec<NetworkPolicy>, ProviderError> {
        self.list(
            Api::namespaced(self.client.clone(), namespace),
            "networkpolicies",
        )
    }

    fn list_cluster_role_bindings(&self) -> Result<Vec<ClusterRoleBinding>, ProviderError> {
        self.list(Api::all(self.client.clone()), "clusterrolebindings")
    }
}
