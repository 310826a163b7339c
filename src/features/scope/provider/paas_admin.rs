use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::ScopeError, features::scope::connection::ClusterRegistry, logger};

use super::{ScopeList, ScopeListProvider};

pub const CLUSTER_LIST_PATH: &str = "/icbc/paas/api/cluster/getAllCluster";

/// Port served over plain http by the cluster load balancers.
const INSECURE_API_PORT: &str = "8080";

/// Cluster registered in the PaaS admin service.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    #[serde(default)]
    pub area: String,
    pub cluster_id: String,
    #[serde(rename = "clusterLBIP", default)]
    pub cluster_lb_ip: String,
    #[serde(rename = "clusterLBPort", default)]
    pub cluster_lb_port: String,
}

impl ClusterInfo {
    pub fn api_server_url(&self) -> String {
        let scheme = if self.cluster_lb_port == INSECURE_API_PORT {
            "http"
        } else {
            "https"
        };

        format!("{}://{}:{}", scheme, self.cluster_lb_ip, self.cluster_lb_port)
    }
}

/// Request url for the admin host. A missing host is reported and the
/// request is still built.
pub fn cluster_list_url(host: Option<&str>) -> String {
    let host = host.unwrap_or_default();

    if host.is_empty() {
        logger!(error, "PAAS_ADMIN_URL should not be empty");
    }

    format!("http://{}{}", host, CLUSTER_LIST_PATH)
}

/// Cluster ids containing `marker`, in response order.
pub fn filter_clusters(clusters: &[ClusterInfo], marker: &str) -> Vec<String> {
    clusters
        .iter()
        .filter(|c| c.cluster_id.contains(marker))
        .map(|c| c.cluster_id.clone())
        .collect()
}

#[derive(Debug, Clone)]
pub struct PaasAdminProvider {
    client: reqwest::Client,
    url: String,
    marker: String,
    registry: ClusterRegistry,
}

impl PaasAdminProvider {
    pub fn new(host: Option<&str>, marker: &str, registry: ClusterRegistry) -> Self {
        let url = cluster_list_url(host);

        logger!(info, "PaaS admin url: {}", url);

        Self {
            client: reqwest::Client::new(),
            url,
            marker: marker.to_string(),
            registry,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ScopeListProvider for PaasAdminProvider {
    async fn fetch(&self) -> Result<ScopeList> {
        let res = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = res.status();
        if status != reqwest::StatusCode::OK {
            return Err(ScopeError::Status {
                url: self.url.clone(),
                status,
            }
            .into());
        }

        let clusters: Vec<ClusterInfo> = res.json().await?;

        logger!(debug, "clusters: {:?}", clusters);

        let items = filter_clusters(&clusters, &self.marker);

        self.registry.replace(clusters).await;

        Ok(ScopeList::new(items))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn keeps_only_marked_clusters() {
        let clusters: Vec<ClusterInfo> =
            serde_json::from_str(r#"[{"clusterId":"prodV4-1"},{"clusterId":"devX"}]"#).unwrap();

        assert_eq!(filter_clusters(&clusters, "V4"), vec!["prodV4-1"]);
    }

    #[test]
    fn deserializes_load_balancer_fields() {
        let cluster: ClusterInfo = serde_json::from_str(
            r#"{"area":"sh","clusterId":"prodV4-1","clusterLBIP":"10.0.0.1","clusterLBPort":"6443"}"#,
        )
        .unwrap();

        assert_eq!(
            cluster,
            ClusterInfo {
                area: "sh".into(),
                cluster_id: "prodV4-1".into(),
                cluster_lb_ip: "10.0.0.1".into(),
                cluster_lb_port: "6443".into(),
            }
        );
    }

    #[rstest]
    #[case("8080", "http://10.0.0.1:8080")]
    #[case("6443", "https://10.0.0.1:6443")]
    fn api_server_scheme_depends_on_port(#[case] port: &str, #[case] expected: &str) {
        let cluster = ClusterInfo {
            cluster_id: "prodV4-1".into(),
            cluster_lb_ip: "10.0.0.1".into(),
            cluster_lb_port: port.into(),
            ..Default::default()
        };

        assert_eq!(cluster.api_server_url(), expected);
    }

    #[test]
    fn builds_url_from_host() {
        assert_eq!(
            cluster_list_url(Some("admin:8888")),
            "http://admin:8888/icbc/paas/api/cluster/getAllCluster"
        );
    }

    #[test]
    fn missing_host_still_builds_url() {
        assert_eq!(
            cluster_list_url(None),
            "http:///icbc/paas/api/cluster/getAllCluster"
        );
    }

    #[tokio::test]
    async fn unreachable_admin_returns_err() {
        let provider = PaasAdminProvider::new(None, "V4", ClusterRegistry::default());

        assert!(provider.fetch().await.is_err());
    }
}
