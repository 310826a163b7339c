use std::{collections::BTreeMap, fmt};

pub type QueryParams = BTreeMap<String, String>;

/// Application location: path segments plus query parameters.
///
/// `overview?cluster=dev&namespace=default` ⇔ `Url { segments: ["overview"], query: {..} }`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Url {
    pub segments: Vec<String>,
    pub query: QueryParams,
}

impl Url {
    pub fn parse(url: &str) -> Self {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();

        let query = query
            .split('&')
            .filter(|kv| !kv.is_empty())
            .map(|kv| match kv.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (kv.to_string(), String::new()),
            })
            .collect();

        Self { segments, query }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())?;

        if !self.query.is_empty() {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();

            write!(f, "?{}", query.join("&"))?;
        }

        Ok(())
    }
}

impl From<&str> for Url {
    fn from(url: &str) -> Self {
        Self::parse(url)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_path_and_query() {
        let url = Url::parse("/cluster/dev?cluster=dev&namespace=default");

        assert_eq!(url.segments, vec!["cluster", "dev"]);
        assert_eq!(url.query_param("cluster"), Some("dev"));
        assert_eq!(url.query_param("namespace"), Some("default"));
    }

    #[test]
    fn parses_key_without_value() {
        let url = Url::parse("overview?flag");
        assert_eq!(url.query_param("flag"), Some(""));
    }

    #[test]
    fn formats_with_sorted_query() {
        let url = Url::parse("overview?namespace=default&cluster=cluster");
        assert_eq!(url.to_string(), "/overview?cluster=cluster&namespace=default");
    }

    #[test]
    fn formats_root_without_query() {
        assert_eq!(Url::default().to_string(), "/");
    }
}
