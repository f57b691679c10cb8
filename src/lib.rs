//! quarry: a compact query language for HTML and JSON.
//!
//! ```ignore
//! let root = quarry::load_document("<div>hello</div>", false, "")?;
//! let query = quarry::Query::compile("div/@text?transform=upper")?;
//! assert_eq!(query.execute(&root), quarry::Value::from("HELLO"));
//! ```
//!
//! The workspace crates are re-exported here so embedders depend on one
//! crate.

pub mod error;

pub use error::QuarryError;

// --- Public API ---
pub use quarry_grammar::{FormatError, Suggestion};
pub use quarry_query::{
    Chain, Execution, ExecutionConfig, Link, Query, QueryPart, QueryResult, Scheme,
};
pub use quarry_selector::{Flavor, Selector, parse_selector};
pub use quarry_source::{HtmlDocument, HtmlFragmentParser, JsonDocument};
pub use quarry_traits::{MarkupParser, ScriptEngine, ScriptError, StaticScriptEngine};
pub use quarry_transform::{Directive, Phase, Pipeline};
pub use quarry_types::{Bindings, DocumentNode, Move, NodeRef, Value};

/// Turns input text into a query root: a JSON node when `json` is set,
/// otherwise a parsed HTML document.
pub fn load_document(text: &str, json: bool, url: &str) -> Result<Value, QuarryError> {
    if json {
        Ok(quarry_source::json(text, url)?)
    } else {
        Ok(quarry_source::html(text, url))
    }
}

/// Compiles `query` and returns its simplified result against `root`.
pub fn query(query: &str, root: &Value) -> Result<Value, QuarryError> {
    Ok(Query::compile(query)?.execute(root))
}

/// Parses a `name=value` pair. Values that parse as JSON keep their type;
/// anything else is a string.
pub fn parse_variable(pair: &str) -> Result<(String, Value), QuarryError> {
    let (name, raw) = pair
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| QuarryError::Variable(pair.to_string()))?;
    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw));
    Ok((name.trim().to_string(), value))
}
