//! Compiling and running quarry query chains.
//!
//! A query is a chain of parts joined by whitespace-bounded operators:
//!
//! ```text
//! json:a?save=x&keep ++ template:value-${x}
//! h1@text || h2@text
//! json:rows >>> json:name?transform=upper
//! ```
//!
//! Each part is `[scheme:]path[?key=value&...]`. Compiling validates the
//! whole chain; running never fails.

pub mod chain;
pub mod config;
pub mod execution;
mod params;
pub mod part;
pub mod query;
pub mod result;
pub mod scheme;

// --- Public API ---
pub use chain::Chain;
pub use config::ExecutionConfig;
pub use execution::Execution;
pub use part::QueryPart;
pub use query::{Link, Query};
pub use result::QueryResult;
pub use scheme::Scheme;
