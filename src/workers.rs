mod render;
pub mod scope;
mod tick;
mod user_input;

pub use render::*;
pub use scope::ScopeWorker;
pub use tick::*;
pub use user_input::*;
