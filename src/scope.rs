mod kind;
mod query;
mod service;

pub use kind::*;
pub use query::*;
pub use service::*;

/// Internal key for "every scope is selected". Kept distinct from the empty string,
/// which means "nothing selected yet".
pub const ALL_SCOPES: &str = "_all";

/// Secondary query parameter reset on every scope change.
pub const NAMESPACE_QUERY_KEY: &str = "namespace";

pub const DEFAULT_NAMESPACE: &str = "default";
