use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use kube::{
    config::{KubeConfigOptions, Kubeconfig, KubeconfigError, NamedContext},
    Client, Config,
};

pub fn read_kubeconfig(path: Option<&Path>) -> Result<Kubeconfig, KubeconfigError> {
    if let Some(path) = path {
        Kubeconfig::read_from(path)
    } else {
        Kubeconfig::read()
    }
}

/// Explicit context, else the current context, else the first one.
pub fn read_context(kubeconfig: &Kubeconfig, context: Option<&str>) -> Result<NamedContext> {
    let context = if let Some(context) = context {
        kubeconfig
            .contexts
            .iter()
            .find(|ctx| ctx.name == context)
            .cloned()
            .ok_or_else(|| anyhow!(format!("Cannot find context {}", context)))?
    } else if let Some(current_context) = &kubeconfig.current_context {
        kubeconfig
            .contexts
            .iter()
            .find(|ctx| ctx.name == *current_context)
            .cloned()
            .ok_or_else(|| anyhow!(format!("Cannot find context {}", current_context)))?
    } else {
        kubeconfig
            .contexts
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Empty contexts"))?
    };

    Ok(context)
}

pub async fn client_config(
    kubeconfig: &Kubeconfig,
    context: &NamedContext,
    server_url: Option<&str>,
) -> Result<Config> {
    let options = KubeConfigOptions {
        context: Some(context.name.to_string()),
        ..Default::default()
    };

    let mut config = Config::from_custom_kubeconfig(kubeconfig.clone(), &options).await?;

    if let Some(url) = server_url {
        config.cluster_url = url.parse()?;
    }

    Ok(config)
}

pub async fn kube_client(
    kubeconfig_path: Option<&PathBuf>,
    context: Option<&str>,
) -> Result<Client> {
    let kubeconfig = read_kubeconfig(kubeconfig_path.map(PathBuf::as_path))?;

    let context = read_context(&kubeconfig, context)?;

    let config = client_config(&kubeconfig, &context, None).await?;

    Ok(Client::try_from(config)?)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    const CONFIG: &str = indoc! {
        r#"
            apiVersion: v1
            clusters:
              - cluster:
                  certificate-authority-data: ""
                  server: https://192.168.0.1
                name: cluster-1
              - cluster:
                  certificate-authority-data: ""
                  server: https://192.168.0.2
                name: cluster-2
            contexts:
              - context:
                  cluster: cluster-1
                  namespace: ns-1
                  user: user-1
                name: cluster-1
              - context:
                  cluster: cluster-2
                  user: user-2
                name: cluster-2
            current-context: cluster-2
            kind: Config
            preferences: {}
            users:
              - name: user-1
                user:
                  token: user-1
              - name: user-2
                user:
                  token: user-2
            "#
    };

    #[test]
    fn explicit_context_is_found() {
        let kubeconfig = Kubeconfig::from_yaml(CONFIG).unwrap();

        let context = read_context(&kubeconfig, Some("cluster-1")).unwrap();

        assert_eq!(context.name, "cluster-1");
    }

    #[test]
    fn unknown_context_returns_err() {
        let kubeconfig = Kubeconfig::from_yaml(CONFIG).unwrap();

        assert!(read_context(&kubeconfig, Some("nothing")).is_err());
    }

    #[test]
    fn current_context_is_used_by_default() {
        let kubeconfig = Kubeconfig::from_yaml(CONFIG).unwrap();

        let context = read_context(&kubeconfig, None).unwrap();

        assert_eq!(context.name, "cluster-2");
    }

    #[tokio::test]
    async fn server_url_overrides_the_kubeconfig_cluster() {
        let kubeconfig = Kubeconfig::from_yaml(CONFIG).unwrap();
        let context = read_context(&kubeconfig, Some("cluster-1")).unwrap();

        let config = client_config(&kubeconfig, &context, Some("http://10.0.0.1:8080"))
            .await
            .unwrap();

        assert_eq!(config.cluster_url.to_string(), "http://10.0.0.1:8080/");
        assert_eq!(config.default_namespace, "ns-1");
    }
}
