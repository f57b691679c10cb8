//! A JSON document provider.
use quarry_types::{DocumentNode, Move, NodeRef};
use serde_json::Value as JsonValue;
use std::rc::Rc;

/// A parsed JSON document. Only `json_at` and the text accessors are
/// meaningful; HTML navigation finds nothing.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    value: JsonValue,
    url: String,
}

impl JsonDocument {
    pub fn new(value: JsonValue, url: impl Into<String>) -> Self {
        Self {
            value,
            url: url.into(),
        }
    }

    pub fn parse(text: &str, url: impl Into<String>) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(text)?, url))
    }

    pub fn value(&self) -> &JsonValue {
        &self.value
    }
}

impl DocumentNode for JsonDocument {
    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }

    fn text(&self) -> String {
        match &self.value {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn inner_html(&self) -> String {
        self.text()
    }

    fn outer_html(&self) -> String {
        self.value.to_string()
    }

    fn class_names(&self) -> Vec<String> {
        vec![]
    }

    fn navigate(&self, step: Move) -> Option<NodeRef> {
        match step {
            Move::Root => Some(Rc::new(self.clone())),
            _ => None,
        }
    }

    fn query_all(&self, css: &str) -> Vec<NodeRef> {
        log::debug!("CSS query '{}' against a JSON document matches nothing", css);
        vec![]
    }

    fn json_at(&self) -> Option<JsonValue> {
        Some(self.value.clone())
    }

    fn source_url(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_document_exposes_value() {
        let doc = JsonDocument::parse(r#"{"a": [1, 2]}"#, "https://api.example.com/v1").unwrap();
        assert_eq!(doc.json_at(), Some(json!({"a": [1, 2]})));
        assert_eq!(doc.source_url(), "https://api.example.com/v1");
        assert!(doc.query_all("div").is_empty());
        assert!(doc.navigate(Move::Parent).is_none());
    }

    #[test]
    fn test_text_of_string_is_unquoted() {
        let doc = JsonDocument::new(json!("plain"), "");
        assert_eq!(doc.text(), "plain");
        assert_eq!(doc.outer_html(), "\"plain\"");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(JsonDocument::parse("{nope", "").is_err());
    }
}
