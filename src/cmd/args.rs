mod provider;
mod scope_kind;

pub use provider::*;
pub use scope_kind::*;
