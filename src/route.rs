mod router;
mod table;
mod url;

pub use router::*;
pub use table::*;
pub use url::*;
