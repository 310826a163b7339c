use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{
    notification::Notifications,
    scope::{ScopeKind, DEFAULT_NAMESPACE},
};

#[derive(Debug, Default)]
pub enum ConfigLoadOption {
    #[default]
    Default,

    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScopeConfig {
    #[serde(default)]
    pub kind: ScopeKind,

    #[serde(default = "default_cluster")]
    pub default_cluster: String,

    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Url opened on startup
    #[serde(default = "default_initial_url")]
    pub initial_url: String,

    /// Delay before the selector input gets focus after opening
    #[serde(default = "default_focus_delay_ms")]
    pub focus_delay_ms: u64,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            kind: ScopeKind::default(),
            default_cluster: default_cluster(),
            default_namespace: default_namespace(),
            initial_url: default_initial_url(),
            focus_delay_ms: default_focus_delay_ms(),
        }
    }
}

impl ScopeConfig {
    pub fn default_scope(&self) -> &str {
        match self.kind {
            ScopeKind::Cluster => &self.default_cluster,
            ScopeKind::Namespace => &self.default_namespace,
        }
    }
}

fn default_cluster() -> String {
    "cluster".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_initial_url() -> String {
    "overview".to_string()
}

fn default_focus_delay_ms() -> u64 {
    150
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Generic list endpoint of the dashboard backend
    Dashboard,
    /// Cluster registry of the PaaS admin service
    PaasAdmin,
    /// Namespaces of the kubeconfig context
    #[default]
    Kube,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,

    /// Host (and port) of the PaaS admin service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paas_admin_url: Option<String>,

    /// Only clusters whose id contains this marker are listed
    #[serde(default = "default_cluster_marker")]
    pub cluster_marker: String,

    /// Directory holding one kubeconfig per cluster id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_config_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            dashboard_url: default_dashboard_url(),
            paas_admin_url: None,
            cluster_marker: default_cluster_marker(),
            kube_config_dir: None,
            kubeconfig: None,
            context: None,
        }
    }
}

fn default_dashboard_url() -> String {
    "http://localhost:9090".to_string()
}

fn default_cluster_marker() -> String {
    "V4".to_string()
}

const DEFAULT_MAX_NOTIFICATIONS: usize = 32;

#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub max_notifications: Option<usize>,
    pub notification_ttl_secs: Option<u64>,
}

impl LoggingConfig {
    pub fn notifications(&self) -> Notifications {
        let notifications =
            Notifications::new(self.max_notifications.unwrap_or(DEFAULT_MAX_NOTIFICATIONS));

        match self.notification_ttl_secs {
            Some(secs) => notifications.with_ttl(Duration::from_secs(secs)),
            None => notifications,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(option: ConfigLoadOption) -> Result<Self> {
        let figment = Figment::new();

        let config = match option {
            ConfigLoadOption::Default => figment.merge(Serialized::defaults(Self::default())),
            ConfigLoadOption::Path(path) => figment
                .merge(Serialized::defaults(Self::default()))
                .merge(Yaml::file(path)),
        }
        .merge(Env::prefixed("KUBESCOPE_").split("__"))
        .extract_lossy()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_| {
            let config = Config::load(ConfigLoadOption::Default).unwrap();

            assert_eq!(config, Config::default());
            assert_eq!(config.scope.default_scope(), "cluster");
            assert_eq!(config.provider.cluster_marker, "V4");

            Ok(())
        });
    }

    #[test]
    fn file_and_env_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                indoc! {r#"
                    scope:
                      kind: namespace
                      default_namespace: kube-public
                    provider:
                      kind: paas-admin
                      paas_admin_url: admin.local:8888
                "#},
            )?;
            jail.set_env("KUBESCOPE_PROVIDER__CLUSTER_MARKER", "V5");

            let config = Config::load(ConfigLoadOption::Path("config.yaml".into())).unwrap();

            assert_eq!(config.scope.kind, ScopeKind::Namespace);
            assert_eq!(config.scope.default_scope(), "kube-public");
            assert_eq!(config.provider.kind, ProviderKind::PaasAdmin);
            assert_eq!(
                config.provider.paas_admin_url.as_deref(),
                Some("admin.local:8888")
            );
            assert_eq!(config.provider.cluster_marker, "V5");

            Ok(())
        });
    }

    #[test]
    fn notification_ttl_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                indoc! {r#"
                    logging:
                      notification_ttl_secs: 10
                "#},
            )?;

            let config = Config::load(ConfigLoadOption::Path("config.yaml".into())).unwrap();

            assert_eq!(config.logging.notifications().ttl(), Duration::from_secs(10));
            assert_eq!(
                Config::default().logging.notifications().ttl(),
                crate::notification::DEFAULT_NOTIFICATION_TTL
            );

            Ok(())
        });
    }
}
