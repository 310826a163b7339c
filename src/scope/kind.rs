use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::NAMESPACE_QUERY_KEY;

/// Which kind of scope the selector switches between.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Deserialize, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    #[default]
    Cluster,
    Namespace,
}

impl ScopeKind {
    /// Query parameter carrying the current scope.
    pub fn query_key(&self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Namespace => NAMESPACE_QUERY_KEY,
        }
    }

    /// Path parameter of a resource-detail route bound to one scope.
    pub fn resource_param(&self) -> &'static str {
        match self {
            Self::Cluster => "resourceCluster",
            Self::Namespace => "resourceNamespace",
        }
    }

    pub fn all_label(&self) -> &'static str {
        match self {
            Self::Cluster => "All clusters",
            Self::Namespace => "All namespaces",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Cluster => "Cluster",
            Self::Namespace => "Namespace",
        }
    }

    /// Switching clusters also resets the namespace to `default`.
    pub fn resets_namespace(&self) -> bool {
        matches!(self, Self::Cluster)
    }
}
