use std::collections::BTreeMap;

use super::Url;

pub type RouteParams = BTreeMap<String, String>;

pub const OVERVIEW_STATE: &str = "overview";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Static(String),
    Param(String),
}

/// Route pattern such as `cluster/:resourceCluster`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    pattern: String,
    segments: Vec<PatternSegment>,
}

impl RoutePattern {
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => PatternSegment::Param(name.to_string()),
                None => PatternSegment::Static(s.to_string()),
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    fn matches(&self, segments: &[String]) -> Option<RouteParams> {
        if self.segments.len() != segments.len() {
            return None;
        }

        let mut params = RouteParams::new();

        for (pattern, segment) in self.segments.iter().zip(segments) {
            match pattern {
                PatternSegment::Static(s) if s == segment => {}
                PatternSegment::Static(_) => return None,
                PatternSegment::Param(name) => {
                    params.insert(name.clone(), segment.clone());
                }
            }
        }

        Some(params)
    }
}

/// Deepest route activated by a url.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActivatedRoute {
    pub pattern: Option<String>,
    pub params: RouteParams,
}

impl ActivatedRoute {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RoutePattern>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new([
            OVERVIEW_STATE,
            "cluster/:resourceCluster",
            "namespace/:resourceNamespace",
            "pod/:resourceNamespace/:pod",
        ])
    }
}

impl RouteTable {
    pub fn new<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            routes: patterns.into_iter().map(RoutePattern::new).collect(),
        }
    }

    /// First matching pattern wins. Unknown urls activate no route.
    pub fn resolve(&self, url: &Url) -> ActivatedRoute {
        self.routes
            .iter()
            .find_map(|route| {
                route.matches(&url.segments).map(|params| ActivatedRoute {
                    pattern: Some(route.pattern.clone()),
                    params,
                })
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn resolves_path_params() {
        let table = RouteTable::default();

        let route = table.resolve(&Url::parse("pod/kube-system/coredns?cluster=dev"));

        assert_eq!(route.pattern.as_deref(), Some("pod/:resourceNamespace/:pod"));
        assert_eq!(route.param("resourceNamespace"), Some("kube-system"));
        assert_eq!(route.param("pod"), Some("coredns"));
    }

    #[test]
    fn static_routes_have_no_params() {
        let route = RouteTable::default().resolve(&Url::parse("overview"));

        assert_eq!(route.pattern.as_deref(), Some(OVERVIEW_STATE));
        assert!(route.params.is_empty());
    }

    #[test]
    fn unknown_url_activates_nothing() {
        let route = RouteTable::default().resolve(&Url::parse("cluster/dev/extra"));
        assert_eq!(route, ActivatedRoute::default());
    }
}
