use super::ALL_SCOPES;

/// Scopes a list request is restricted to.
///
/// * no scope: every scope matches
/// * one scope: the request can be sent to that scope only
/// * several scopes: every scope is requested and the result is filtered
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScopeQuery {
    scopes: Vec<String>,
}

/// Request parameter meaning "all scopes" on the Kubernetes API.
pub const ALL_SCOPES_REQUEST_PARAM: &str = "";

impl ScopeQuery {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    /// Query for the selection held by the scope service; the sentinel and the
    /// empty selection both mean "every scope".
    pub fn from_selection(scope: &str) -> Self {
        if scope.is_empty() || scope == ALL_SCOPES {
            Self::default()
        } else {
            Self::new([scope])
        }
    }

    pub fn to_request_param(&self) -> &str {
        match self.scopes.as_slice() {
            [scope] => scope,
            _ => ALL_SCOPES_REQUEST_PARAM,
        }
    }

    pub fn matches(&self, scope: &str) -> bool {
        self.scopes.is_empty() || self.scopes.iter().any(|s| s == scope)
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}
