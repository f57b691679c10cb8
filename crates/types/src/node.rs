//! Defines the capability a queried document exposes to the selector engine.
use std::fmt;
use std::rc::Rc;

/// A shared handle to a position inside a document.
pub type NodeRef = Rc<dyn DocumentNode>;

/// A single navigation move of the HTML selector grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// The previous element sibling.
    Prev,
    /// The next element sibling.
    Next,
    /// The parent element.
    Parent,
    /// The document's root element.
    Root,
}

impl Move {
    /// Parses a move keyword (`prev`, `next`, `parent`, `root`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "prev" => Some(Move::Prev),
            "next" => Some(Move::Next),
            "parent" => Some(Move::Parent),
            "root" => Some(Move::Root),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Move::Prev => "prev",
            Move::Next => "next",
            Move::Parent => "parent",
            Move::Root => "root",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The contract for a position in an element tree or JSON container.
///
/// Selectors are evaluated exclusively against this trait, so the query
/// engine never depends on a concrete markup parser. Every method is
/// infallible: "not found" is expressed as `None`, an empty string or an
/// empty vector.
pub trait DocumentNode: fmt::Debug {
    /// The value of a named attribute, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    /// The whitespace-normalized, trimmed text content.
    fn text(&self) -> String;

    /// The serialized markup of the node's children.
    fn inner_html(&self) -> String;

    /// The serialized markup of the node itself.
    fn outer_html(&self) -> String;

    /// The class names carried by the node.
    fn class_names(&self) -> Vec<String>;

    /// Moves one step from this node. Returns `None` when the move leaves the tree.
    fn navigate(&self, step: Move) -> Option<NodeRef>;

    /// All descendants matching a CSS selector, in document order.
    /// An invalid selector yields no matches.
    fn query_all(&self, css: &str) -> Vec<NodeRef>;

    /// The JSON value held by (or embedded in) this node.
    fn json_at(&self) -> Option<serde_json::Value>;

    /// The URL of the document this node belongs to.
    fn source_url(&self) -> String;

    /// Resolves an accessor name to a string.
    ///
    /// - empty or `text`: trimmed text
    /// - `innerHtml` / `outerHtml`: serialized markup
    /// - anything else: attribute lookup, empty when absent
    fn resolve_attribute(&self, accessor: &str) -> String {
        match accessor {
            "" | "text" => self.text(),
            "innerHtml" => self.inner_html(),
            "outerHtml" => self.outer_html(),
            name => self.attribute(name).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Leaf;

    impl DocumentNode for Leaf {
        fn attribute(&self, name: &str) -> Option<String> {
            (name == "href").then(|| "/a".to_string())
        }
        fn text(&self) -> String {
            "leaf".to_string()
        }
        fn inner_html(&self) -> String {
            "leaf".to_string()
        }
        fn outer_html(&self) -> String {
            "<b>leaf</b>".to_string()
        }
        fn class_names(&self) -> Vec<String> {
            vec![]
        }
        fn navigate(&self, _step: Move) -> Option<NodeRef> {
            None
        }
        fn query_all(&self, _css: &str) -> Vec<NodeRef> {
            vec![]
        }
        fn json_at(&self) -> Option<serde_json::Value> {
            None
        }
        fn source_url(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn test_resolve_attribute_dispatch() {
        let leaf = Leaf;
        assert_eq!(leaf.resolve_attribute(""), "leaf");
        assert_eq!(leaf.resolve_attribute("text"), "leaf");
        assert_eq!(leaf.resolve_attribute("outerHtml"), "<b>leaf</b>");
        assert_eq!(leaf.resolve_attribute("href"), "/a");
        assert_eq!(leaf.resolve_attribute("title"), "");
    }

    #[test]
    fn test_move_keywords() {
        for step in [Move::Prev, Move::Next, Move::Parent, Move::Root] {
            assert_eq!(Move::from_keyword(step.keyword()), Some(step));
        }
        assert_eq!(Move::from_keyword("sibling"), None);
    }
}
