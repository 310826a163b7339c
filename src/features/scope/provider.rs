mod dashboard;
mod kube_namespace;
mod paas_admin;

pub use dashboard::*;
pub use kube_namespace::*;
pub use paas_admin::*;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{ProviderConfig, ProviderKind};

use super::connection::{ClusterConnector, ClusterRegistry};

/// Result of a successful fetch. `errors` are reported by the remote side
/// next to the items and are shown to the user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScopeList {
    pub items: Vec<String>,
    pub errors: Vec<String>,
}

impl ScopeList {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            errors: Vec::new(),
        }
    }
}

/// Source of the selectable scopes.
///
/// `Err` means the fetch itself failed; the caller logs it and keeps the
/// previous list.
#[async_trait]
pub trait ScopeListProvider: Send + Sync {
    async fn fetch(&self) -> Result<ScopeList>;
}

/// Builds the configured provider. The PaaS admin provider also comes with a
/// connector resolving the clusters it lists.
pub async fn build_provider(
    config: &ProviderConfig,
) -> Result<(Box<dyn ScopeListProvider>, Option<ClusterConnector>)> {
    let ret: (Box<dyn ScopeListProvider>, Option<ClusterConnector>) = match config.kind {
        ProviderKind::Dashboard => (
            Box::new(DashboardProvider::new(&config.dashboard_url)),
            None,
        ),
        ProviderKind::PaasAdmin => {
            let registry = ClusterRegistry::default();

            let provider = PaasAdminProvider::new(
                config.paas_admin_url.as_deref(),
                &config.cluster_marker,
                registry.clone(),
            );

            let connector = ClusterConnector::new(registry, config.kube_config_dir.clone());

            (Box::new(provider), Some(connector))
        }
        ProviderKind::Kube => {
            let provider =
                KubeNamespaceProvider::try_new(config.kubeconfig.as_ref(), config.context.as_deref())
                    .await?;

            (Box::new(provider), None)
        }
    };

    Ok(ret)
}

#[cfg(test)]
pub mod mock {
    use super::{Result, ScopeList, ScopeListProvider};
    use mockall::mock;

    mock! {
        pub TestScopeListProvider {}

        #[async_trait::async_trait]
        impl ScopeListProvider for TestScopeListProvider {
            async fn fetch(&self) -> Result<ScopeList>;
        }
    }
}
