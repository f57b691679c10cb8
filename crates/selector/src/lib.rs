//! Selector expressions over HTML element trees and JSON values.
//!
//! A selector is one or more atoms joined by `||`:
//!
//! ```text
//! [any#|every#]atom(||atom)*
//! html atom:  [navPath/]css[@accessor(|accessor)*[::pattern[/replacement]]]
//! json atom:  [#elementId/]key(/key)*[::pattern[/replacement]]
//! ```
//!
//! Parsing produces an immutable [`Selector`]; evaluation walks a
//! [`quarry_types::DocumentNode`] or a JSON value and never fails on missing
//! data.

pub mod ast;
pub mod engine;
mod html;
mod json;
mod parser;
pub mod rewrite;

// --- Public API ---
pub use ast::{
    Accessor, AccessorSpec, Atom, Flavor, HtmlAtom, HtmlStep, JsonAtom, JsonKey, JsonStep, Selector,
};
pub use engine::{SelectorContext, is_empty_result, select};
pub use parser::parse_selector;
pub use rewrite::{MATCH_ALL, RewriteSpec};

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_source::html;
    use quarry_types::Value;

    #[test]
    fn test_parse_once_evaluate_many() {
        let selector = parse_selector("div/@text", Flavor::Html).unwrap();
        let ctx = SelectorContext::new("");
        for (markup, expected) in [("<div>hello</div>", "hello"), ("<div> a  b </div>", "a b")] {
            let doc = html(markup, "");
            assert_eq!(selector.evaluate(&doc, &ctx), vec![Value::from(expected)]);
        }
    }
}
