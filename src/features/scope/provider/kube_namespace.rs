use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ListParams, Api, Client, ResourceExt as _};

use crate::{kube::kube_client, logger};

use super::{ScopeList, ScopeListProvider};

/// Namespaces visible to the kubeconfig context.
#[derive(Clone)]
pub struct KubeNamespaceProvider {
    client: Client,
}

impl KubeNamespaceProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn try_new(kubeconfig: Option<&PathBuf>, context: Option<&str>) -> Result<Self> {
        let client = kube_client(kubeconfig, context).await?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl ScopeListProvider for KubeNamespaceProvider {
    /// API failures are returned as list errors with no items.
    async fn fetch(&self) -> Result<ScopeList> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());

        match namespaces.list(&ListParams::default()).await {
            Ok(list) => Ok(ScopeList::new(
                list.iter().map(|ns| ns.name_any()).collect(),
            )),
            Err(e) => {
                logger!(error, "Failed to list namespaces: {}", e);

                Ok(ScopeList {
                    items: Vec::new(),
                    errors: vec![e.to_string()],
                })
            }
        }
    }
}
