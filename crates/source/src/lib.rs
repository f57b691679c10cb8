//! Concrete document providers for the query engine.
//!
//! - [`HtmlDocument`]: HTML parsed with `scraper`, exposing [`HtmlNode`] handles
//! - [`JsonDocument`]: a parsed JSON value
//! - [`HtmlFragmentParser`]: the markup parser used when a selector meets a string

pub mod html;
pub mod json;

pub use html::{HtmlDocument, HtmlFragmentParser, HtmlNode};
pub use json::JsonDocument;

use quarry_types::Value;
use std::rc::Rc;

/// Parses an HTML page and wraps its root element as a query input.
pub fn html(markup: &str, url: &str) -> Value {
    let doc = HtmlDocument::parse(markup, url);
    Value::Node(Rc::new(doc.root()))
}

/// Parses a JSON document and wraps it as a query input.
pub fn json(text: &str, url: &str) -> Result<Value, serde_json::Error> {
    let doc = JsonDocument::parse(text, url)?;
    Ok(Value::Node(Rc::new(doc)))
}
