use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, ConfigLoadOption};

use super::{
    args::{ProviderArg, ScopeKindArg},
    SubCommand,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, disable_help_subcommand = true)]
pub struct Command {
    /// Scope switched by the selector
    #[arg(short, long, value_enum, display_order = 1000)]
    pub kind: Option<ScopeKindArg>,

    /// Source of the selectable scopes
    #[arg(short, long, value_enum, display_order = 1000)]
    pub provider: Option<ProviderArg>,

    /// Url opened on startup (e.g. "overview?cluster=dev")
    #[arg(short, long, display_order = 1000)]
    pub url: Option<String>,

    /// Base url of the dashboard backend
    #[arg(long, display_order = 1000)]
    pub dashboard_url: Option<String>,

    /// Host of the PaaS admin service
    #[arg(long, env = "PAAS_ADMIN_URL", display_order = 1000)]
    pub paas_admin_url: Option<String>,

    /// Directory holding one kubeconfig per cluster id
    #[arg(long, env = "KUBE_CONFIG_DIR", display_order = 1000)]
    pub kube_config_dir: Option<PathBuf>,

    /// Context
    #[arg(short, long, display_order = 1000)]
    pub context: Option<String>,

    /// kubeconfig path
    #[arg(short = 'C', long, display_order = 1000)]
    pub kubeconfig: Option<PathBuf>,

    /// Logging
    #[arg(short = 'l', long, display_order = 1000)]
    pub logging: bool,

    /// Config file path
    #[arg(long, display_order = 1000)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Option<SubCommand>,
}

impl Command {
    pub fn init() -> Self {
        Self::parse()
    }

    /// Command line arguments take precedence over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(kind) = self.kind {
            config.scope.kind = kind.into();
        }

        if let Some(provider) = self.provider {
            config.provider.kind = provider.into();
        }

        if let Some(url) = &self.url {
            config.scope.initial_url = url.clone();
        }

        if let Some(url) = &self.dashboard_url {
            config.provider.dashboard_url = url.clone();
        }

        if let Some(url) = &self.paas_admin_url {
            config.provider.paas_admin_url = Some(url.clone());
        }

        if let Some(dir) = &self.kube_config_dir {
            config.provider.kube_config_dir = Some(dir.clone());
        }

        if let Some(path) = &self.kubeconfig {
            config.provider.kubeconfig = Some(path.clone());
        }

        if let Some(context) = &self.context {
            config.provider.context = Some(context.clone());
        }
    }

    pub fn config_load_option(&self) -> Result<ConfigLoadOption> {
        let option = if let Some(path) = &self.config_file {
            match path.try_exists() {
                Ok(true) => ConfigLoadOption::Path(path.clone()),
                Ok(false) => {
                    eprintln!("Config file not found: {:?}", path);

                    ConfigLoadOption::Default
                }
                Err(err) => {
                    eprintln!("Failed to check config file exists: {}", err);

                    ConfigLoadOption::Default
                }
            }
        } else {
            let Some(path) = xdg_config_home().map(|dir| dir.join("config.yaml")) else {
                return Ok(ConfigLoadOption::Default);
            };

            match path.try_exists() {
                Ok(true) => ConfigLoadOption::Path(path.clone()),
                Ok(false) => ConfigLoadOption::Default,
                Err(err) => {
                    eprintln!("Failed to check config file exists: {}", err);

                    ConfigLoadOption::Default
                }
            }
        };

        Ok(option)
    }
}

fn xdg_config_home() -> Option<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME").map(|s| PathBuf::from(s).join("kubescope")) {
        Some(path) => Some(path),
        None => dirs::home_dir().map(|home| home.join(".config").join("kubescope")),
    }
}
