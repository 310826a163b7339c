use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use kube::Client;
use tokio::sync::RwLock;

use crate::{
    error::ScopeError,
    kube::{client_config, read_context, read_kubeconfig},
    logger,
};

use super::provider::ClusterInfo;

/// Clusters returned by the last PaaS admin fetch.
#[derive(Debug, Default, Clone)]
pub struct ClusterRegistry {
    inner: Arc<RwLock<Vec<ClusterInfo>>>,
}

impl ClusterRegistry {
    pub async fn replace(&self, clusters: Vec<ClusterInfo>) {
        *self.inner.write().await = clusters;
    }

    pub async fn find(&self, cluster_id: &str) -> Option<ClusterInfo> {
        self.inner
            .read()
            .await
            .iter()
            .find(|c| c.cluster_id == cluster_id)
            .cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConnection {
    pub cluster: String,
    pub server_url: Option<String>,
    pub version: String,
}

/// Connects to a cluster with its own kubeconfig, `<kube_config_dir>/<cluster id>`.
#[derive(Debug, Clone)]
pub struct ClusterConnector {
    registry: ClusterRegistry,
    kube_config_dir: Option<PathBuf>,
}

impl ClusterConnector {
    pub fn new(registry: ClusterRegistry, kube_config_dir: Option<PathBuf>) -> Self {
        Self {
            registry,
            kube_config_dir,
        }
    }

    pub fn kubeconfig_path(&self, cluster: &str) -> Result<PathBuf, ScopeError> {
        let dir = self
            .kube_config_dir
            .as_ref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ScopeError::MissingEnv("KUBE_CONFIG_DIR"))?;

        let path = dir.join(cluster);

        if !path.try_exists()? {
            return Err(ScopeError::KubeconfigNotFound(path));
        }

        Ok(path)
    }

    /// Api server from the registry, else the server of the kubeconfig.
    pub async fn server_url(&self, cluster: &str) -> Option<String> {
        self.registry
            .find(cluster)
            .await
            .map(|info| info.api_server_url())
    }

    pub async fn connect(&self, cluster: &str) -> Result<ClusterConnection> {
        let path = self.kubeconfig_path(cluster)?;

        let server_url = self.server_url(cluster).await;

        logger!(
            info,
            "Cluster {} api server is {}",
            cluster,
            server_url.as_deref().unwrap_or("<kubeconfig>")
        );

        let kubeconfig = read_kubeconfig(Some(path.as_path())).map_err(ScopeError::from)?;
        let context = read_context(&kubeconfig, None)?;
        let config = client_config(&kubeconfig, &context, server_url.as_deref()).await?;

        let client = Client::try_from(config).map_err(ScopeError::from)?;

        let version = client
            .apiserver_version()
            .await
            .map_err(ScopeError::from)?;

        logger!(
            info,
            "Successful initial request to the apiserver, version: {}",
            version.git_version
        );

        Ok(ClusterConnection {
            cluster: cluster.to_string(),
            server_url,
            version: version.git_version,
        })
    }
}
