use quarry_grammar::FormatError;
use thiserror::Error;

/// Errors surfaced by the `quarry` crate and its command line.
///
/// Query execution itself never fails; these cover compiling the query and
/// loading its input.
#[derive(Error, Debug)]
pub enum QuarryError {
    #[error("Invalid query: {0}")]
    Format(#[from] FormatError),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid variable '{0}': expected name=value")]
    Variable(String),
}
