pub mod connection;
mod context;
pub mod dialog;
pub mod message;
pub mod provider;
pub mod selector;

pub use context::ScopeContext;
