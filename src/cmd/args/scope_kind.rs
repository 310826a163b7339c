use clap::ValueEnum;

use crate::scope::ScopeKind;

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKindArg {
    Cluster,
    Namespace,
}

impl From<ScopeKindArg> for ScopeKind {
    fn from(value: ScopeKindArg) -> Self {
        match value {
            ScopeKindArg::Cluster => ScopeKind::Cluster,
            ScopeKindArg::Namespace => ScopeKind::Namespace,
        }
    }
}

impl std::fmt::Display for ScopeKindArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}
