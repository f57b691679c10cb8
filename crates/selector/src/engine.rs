//! Evaluates parsed selectors against document nodes and values.
use crate::ast::{Atom, Flavor, Selector};
use crate::parser::parse_selector;
use crate::{html, json};
use quarry_grammar::FormatError;
use quarry_traits::MarkupParser;
use quarry_types::Value;

/// What a selector needs from the executing query besides its input.
#[derive(Clone, Copy)]
pub struct SelectorContext<'a> {
    /// URL of the executing document, used by `${pageUrl}`/`${rootUrl}`.
    pub page_url: &'a str,
    /// Parser for string inputs that must be navigated as HTML.
    pub markup: Option<&'a dyn MarkupParser>,
}

impl<'a> SelectorContext<'a> {
    pub fn new(page_url: &'a str) -> Self {
        Self {
            page_url,
            markup: None,
        }
    }

    pub fn with_markup(mut self, markup: &'a dyn MarkupParser) -> Self {
        self.markup = Some(markup);
        self
    }
}

impl std::fmt::Debug for SelectorContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorContext")
            .field("page_url", &self.page_url)
            .field("markup", &self.markup.is_some())
            .finish()
    }
}

/// The emptiness test used by quantifier combinations: nothing, or only
/// `Null`/blank values.
pub fn is_empty_result(values: &[Value]) -> bool {
    values.iter().all(Value::is_blank)
}

impl Selector {
    /// Evaluates every atom under the selector's quantifier. "Not found" is
    /// an empty vector, never an error.
    pub fn evaluate(&self, input: &Value, ctx: &SelectorContext<'_>) -> Vec<Value> {
        self.quantifier
            .combine(&self.atoms, |atom| atom.evaluate(input, ctx), is_empty_result)
    }
}

impl Atom {
    pub fn evaluate(&self, input: &Value, ctx: &SelectorContext<'_>) -> Vec<Value> {
        let matches = match self {
            Atom::Html(atom) => html::evaluate(atom, input, ctx),
            Atom::Json(atom) => json::evaluate(atom, input, ctx),
        };
        log::trace!("{} atom produced {} match(es)", self.flavor(), matches.len());
        matches
    }
}

/// Parses and evaluates a selector in one call.
pub fn select(
    selector: &str,
    flavor: Flavor,
    input: &Value,
    ctx: &SelectorContext<'_>,
) -> Result<Vec<Value>, FormatError> {
    Ok(parse_selector(selector, flavor)?.evaluate(input, ctx))
}
