use clap::ValueEnum;

use crate::config::ProviderKind;

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum ProviderArg {
    Dashboard,
    PaasAdmin,
    Kube,
}

impl From<ProviderArg> for ProviderKind {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Dashboard => ProviderKind::Dashboard,
            ProviderArg::PaasAdmin => ProviderKind::PaasAdmin,
            ProviderArg::Kube => ProviderKind::Kube,
        }
    }
}
