//! The execution-scoped variable table.
use crate::value::Value;
use std::collections::HashMap;

/// Name → value bindings for one top-level execution.
///
/// Written only by the `save` phase (last write wins) and read by `${...}`
/// resolution. A table is owned by exactly one execution.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    vars: HashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Binds `name`, replacing any previous value. Discarded wrappers are
    /// stripped so a bound value is always the plain value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value.unwrap_discarded());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        bindings.extend(iter);
        bindings
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Bindings {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value.into());
        }
    }
}
