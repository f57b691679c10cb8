//! Quantifier-tagged combinations of sub-expressions.
use crate::separator::Separator;
use std::fmt;

/// How the branches of a combination are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quantifier {
    /// Stop at the first branch that yields something.
    #[default]
    Any,
    /// Concatenate the results of every branch.
    Every,
}

impl Quantifier {
    const ANY_TAG: &'static str = "any#";
    const EVERY_TAG: &'static str = "every#";

    /// Strips a leading `any#`/`every#` tag, returning the tag's quantifier
    /// (if present) and the remaining text.
    pub fn strip_tag(expr: &str) -> (Option<Quantifier>, &str) {
        if let Some(rest) = expr.strip_prefix(Self::ANY_TAG) {
            (Some(Quantifier::Any), rest)
        } else if let Some(rest) = expr.strip_prefix(Self::EVERY_TAG) {
            (Some(Quantifier::Every), rest)
        } else {
            (None, expr)
        }
    }

    /// Combines per-branch results lazily: `Any` stops at the first branch
    /// whose results are not `empty`, `Every` concatenates all branches.
    pub fn combine<T, I, F, E>(self, branches: I, mut eval: F, is_empty: E) -> Vec<T>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Vec<T>,
        E: Fn(&[T]) -> bool,
    {
        let mut combined = Vec::new();
        for branch in branches {
            let results = eval(branch);
            match self {
                Quantifier::Any => {
                    if !is_empty(&results) {
                        return results;
                    }
                }
                Quantifier::Every => combined.extend(results),
            }
        }
        combined
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Any => f.write_str("any"),
            Quantifier::Every => f.write_str("every"),
        }
    }
}

/// An expression split into ordered children under one quantifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub quantifier: Quantifier,
    /// Raw child texts; escapes are left for the child grammar to resolve.
    pub children: Vec<String>,
    /// True when the expression carried its own quantifier tag.
    pub tagged: bool,
}

impl Combination {
    /// Strips an optional quantifier tag (defaulting to `parent`) and splits
    /// the remainder on `separator`. Without a separator the remainder is
    /// the only child. Empty children are dropped.
    pub fn parse(parent: Quantifier, expr: &str, separator: Option<&Separator>) -> Self {
        let (tag, rest) = Quantifier::strip_tag(expr);
        let children = match separator {
            Some(sep) => sep
                .split_all(rest)
                .into_iter()
                .map(|(_, piece)| piece)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect(),
            None if rest.is_empty() => vec![],
            None => vec![rest.to_string()],
        };
        Self {
            quantifier: tag.unwrap_or(parent),
            children,
            tagged: tag.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
