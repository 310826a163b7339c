use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::{error::ScopeError, logger};

use super::{ScopeList, ScopeListProvider};

/// Generic list endpoint of the dashboard backend.
pub const NAMESPACE_LIST_PATH: &str = "/api/v1/namespace";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceList {
    #[serde(default)]
    pub namespaces: Vec<NamespaceItem>,
    #[serde(default)]
    pub errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceItem {
    pub object_meta: ObjectMeta,
}

#[derive(Debug, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

impl From<NamespaceList> for ScopeList {
    fn from(list: NamespaceList) -> Self {
        Self {
            items: list
                .namespaces
                .into_iter()
                .map(|ns| ns.object_meta.name)
                .collect(),
            errors: list.errors.iter().map(error_message).collect(),
        }
    }
}

/// Backend errors are Kubernetes status objects wrapped in `ErrStatus`;
/// anything else is shown verbatim.
fn error_message(error: &Value) -> String {
    error
        .pointer("/ErrStatus/message")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .unwrap_or_else(|| error.to_string())
}

#[derive(Debug, Clone)]
pub struct DashboardProvider {
    client: reqwest::Client,
    url: String,
}

impl DashboardProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}{}", base_url.trim_end_matches('/'), NAMESPACE_LIST_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_list(&self) -> Result<NamespaceList> {
        logger!(debug, "GET {}", self.url);

        let res = self.client.get(&self.url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ScopeError::Status {
                url: self.url.clone(),
                status,
            }
            .into());
        }

        Ok(res.json().await?)
    }
}

#[async_trait]
impl ScopeListProvider for DashboardProvider {
    /// Request failures are returned as list errors with no items.
    async fn fetch(&self) -> Result<ScopeList> {
        match self.fetch_list().await {
            Ok(list) => Ok(list.into()),
            Err(e) => {
                logger!(error, "Failed to get namespace list: {:?}", e);

                Ok(ScopeList {
                    items: Vec::new(),
                    errors: vec![e.to_string()],
                })
            }
        }
    }
}
