use quarry_types::{Bindings, Value};

/// The flat output of one execution, with its three views.
#[derive(Debug, Clone)]
pub struct QueryResult {
    entries: Vec<Value>,
    separator: String,
    bindings: Bindings,
}

impl QueryResult {
    pub fn new(entries: Vec<Value>, separator: impl Into<String>, bindings: Bindings) -> Self {
        Self {
            entries,
            separator: separator.into(),
            bindings,
        }
    }

    /// Raw entries, discarded ones still wrapped.
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// The variable table as the chain left it.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Drops discarded entries; one entry collapses to a scalar, none to `Null`.
    pub fn simplified(&self) -> Value {
        Value::from_matches(self.visible().cloned().collect())
    }

    /// Every entry, discarded ones unwrapped.
    pub fn kept(&self) -> Vec<Value> {
        self.entries
            .iter()
            .cloned()
            .map(Value::unwrap_discarded)
            .collect()
    }

    /// The simplified entries' strings joined with the configured separator.
    pub fn joined(&self) -> String {
        self.visible()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn visible(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().filter(|entry| !entry.is_discarded())
    }
}
