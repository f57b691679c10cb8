//! The closed value union flowing through selectors, transforms and results.
use crate::node::NodeRef;
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A dynamically-shaped value with explicit coercions at each phase boundary.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A position inside a document, produced by selectors without an accessor.
    Node(NodeRef),
    /// A value excluded from the simplified view but retained in the kept view.
    Discarded(Box<Value>),
}

impl Value {
    /// Builds a number from a float, falling back to `Null` for NaN and infinities.
    pub fn from_f64(n: f64) -> Value {
        if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            return Value::Number(Number::from(n as i64));
        }
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }

    /// Collapses raw selector matches into a single pipeline input:
    /// none ⇒ `Null`, one ⇒ that value, several ⇒ a list.
    pub fn from_matches(mut matches: Vec<Value>) -> Value {
        match matches.len() {
            0 => Value::Null,
            1 => matches.remove(0),
            _ => Value::List(matches),
        }
    }

    /// Flattens a pipeline output into result entries.
    ///
    /// `Null` contributes nothing, a list contributes its elements, and a
    /// discarded list contributes each element wrapped as discarded.
    pub fn into_results(self) -> Vec<Value> {
        match self {
            Value::Null => vec![],
            Value::List(items) => items,
            Value::Discarded(inner) => match *inner {
                Value::Null => vec![],
                Value::List(items) => items
                    .into_iter()
                    .map(|item| Value::Discarded(Box::new(item)))
                    .collect(),
                other => vec![Value::Discarded(Box::new(other))],
            },
            other => vec![other],
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Value::Discarded(_))
    }

    /// True for values that count as "nothing found": `Null`, blank strings,
    /// empty lists and lists of blank values.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::List(items) => items.iter().all(Value::is_blank),
            Value::Discarded(inner) => inner.is_blank(),
            _ => false,
        }
    }

    /// Removes a `Discarded` wrapper, if any.
    pub fn unwrap_discarded(self) -> Value {
        match self {
            Value::Discarded(inner) => inner.unwrap_discarded(),
            other => other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Numeric coercion: numbers as-is, booleans as 0/1, strings when they parse.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse().ok(),
            Value::Discarded(inner) => inner.as_f64(),
            _ => None,
        }
    }

    /// Converts into a plain JSON value. Nodes become their text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Node(node) => serde_json::Value::String(node.text()),
            Value::Discarded(inner) => inner.to_json(),
        }
    }
}

impl fmt::Display for Value {
    /// The string coercion used by text directives, filters and `${}` substitution.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::List(_) | Value::Map(_) => write!(f, "{}", self.to_json()),
            Value::Node(node) => f.write_str(&node.text()),
            Value::Discarded(inner) => write!(f, "{}", inner),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => Rc::ptr_eq(a, b) || a.outer_html() == b.outer_html(),
            (Value::Discarded(a), Value::Discarded(b)) => a == b,
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::from_f64(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Value::Node(node)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}
