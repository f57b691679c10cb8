//! Defines the immutable syntax tree of a selector expression.
use crate::rewrite::RewriteSpec;
use quarry_grammar::Quantifier;
use quarry_types::Move;
use std::fmt;

/// Which grammar an atom is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    #[default]
    Html,
    Json,
}

impl Flavor {
    pub fn prefix(&self) -> &'static str {
        match self {
            Flavor::Html => "html:",
            Flavor::Json => "json:",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Html => f.write_str("html"),
            Flavor::Json => f.write_str("json"),
        }
    }
}

/// A complete selector: `||`-joined atoms under one quantifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub quantifier: Quantifier,
    pub atoms: Vec<Atom>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Html(HtmlAtom),
    Json(JsonAtom),
}

impl Atom {
    pub fn flavor(&self) -> Flavor {
        match self {
            Atom::Html(_) => Flavor::Html,
            Atom::Json(_) => Flavor::Json,
        }
    }
}

/// `[navPath/]css[@accessor[::rewrite]]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HtmlAtom {
    pub steps: Vec<HtmlStep>,
    /// Without an accessor the atom yields nodes.
    pub accessor: Option<AccessorSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlStep {
    /// A navigation move, repeated until an element carries a class
    /// matching `until_class` when one is given.
    Move {
        step: Move,
        until_class: Option<String>,
    },
    /// A CSS query below the current element.
    Query { css: String, all: bool },
}

/// The part after `@`: ordered accessor fallbacks plus an optional rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorSpec {
    pub quantifier: Quantifier,
    pub accessors: Vec<Accessor>,
    pub rewrite: Option<RewriteSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    Text,
    InnerHtml,
    OuterHtml,
    /// Class membership; `"true"` when a class matches the glob.
    Class(String),
    Attribute(String),
}

/// `[#elementId/]path[::rewrite]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonAtom {
    pub element_id: Option<String>,
    pub steps: Vec<JsonStep>,
    pub rewrite: Option<RewriteSpec>,
}

/// One `/`-separated step: a combination of keys.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonStep {
    pub quantifier: Quantifier,
    pub keys: Vec<JsonKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonKey {
    Key(String),
    /// A list position; negative counts from the end.
    Index(i64),
    /// A key glob containing `*` or `?`. A backslash keeps the next
    /// character literal.
    Wildcard(String),
    /// `..key`: search at any depth. The key may be a glob.
    Deep(String),
}
