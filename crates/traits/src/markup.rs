//! MarkupParser trait for turning intermediate strings back into documents.
//!
//! A piped segment may hand an HTML fragment (e.g. the output of a `regexp`
//! directive) to an HTML selector. The selector engine asks the configured
//! parser to turn that string into a navigable node.

use quarry_types::NodeRef;
use std::fmt::Debug;

pub trait MarkupParser: Debug {
    /// Parses a markup fragment into a node rooted at the fragment.
    ///
    /// Returns `None` when the text cannot be represented as a document.
    fn parse_fragment(&self, markup: &str, url: &str) -> Option<NodeRef>;
}
