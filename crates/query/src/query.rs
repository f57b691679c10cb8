use crate::chain::{Chain, split_chain};
use crate::execution::Execution;
use crate::part::QueryPart;
use quarry_grammar::FormatError;
use quarry_types::{Bindings, Value};
use std::fmt;
use std::str::FromStr;

/// A part together with the operator that joins it to the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// `None` for the first part.
    pub operator: Option<Chain>,
    pub part: QueryPart,
}

/// A compiled query chain.
///
/// Compilation validates every part up front, so a `Query` never raises a
/// [`FormatError`] while executing.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    text: String,
    links: Vec<Link>,
}

impl Query {
    pub fn compile(text: &str) -> Result<Self, FormatError> {
        let links = split_chain(text)?
            .into_iter()
            .map(|(operator, segment)| {
                let mut part = QueryPart::parse(segment)?;
                part.set_pipe(operator.is_some_and(|op| op.is_pipe()));
                Ok(Link { operator, part })
            })
            .collect::<Result<Vec<_>, FormatError>>()?;
        log::debug!("compiled '{}' into {} parts", text, links.len());
        Ok(Self {
            text: text.to_string(),
            links,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn parts(&self) -> impl Iterator<Item = &QueryPart> {
        self.links.iter().map(|link| &link.part)
    }

    /// Runs with default settings and returns the simplified view.
    pub fn execute(&self, root: &Value) -> Value {
        Execution::new(self).run(root).simplified()
    }

    /// Like [`Query::execute`], starting from the given variables.
    pub fn execute_with(&self, root: &Value, variables: Bindings) -> Value {
        Execution::new(self)
            .with_bindings(variables)
            .run(root)
            .simplified()
    }

    /// The kept view: every entry, discarded ones included.
    pub fn collection_value(&self, root: &Value) -> Vec<Value> {
        Execution::new(self).run(root).kept()
    }

    /// The joined string view.
    pub fn value(&self, root: &Value) -> String {
        Execution::new(self).run(root).joined()
    }
}

impl FromStr for Query {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
