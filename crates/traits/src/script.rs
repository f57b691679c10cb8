//! ScriptEngine trait for the `jseval` transform directive.
//!
//! The query engine never evaluates scripts itself. An embedder injects an
//! engine into the execution context; sandboxing and time limits are the
//! provider's concern.

use quarry_types::Value;
use std::collections::BTreeMap;
use std::fmt::Debug;
use thiserror::Error;

/// Error type for script execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("Script produced no usable value: {0}")]
    NoValue(String),

    #[error("Script engine unavailable: {0}")]
    Unavailable(String),
}

/// A synchronous script execution capability.
///
/// Called at most once at a time within one execution and reset once per
/// top-level execution so no state leaks between runs.
pub trait ScriptEngine: Debug {
    /// Evaluates a script and returns its completion value.
    fn execute(&mut self, script: &str) -> Result<Value, ScriptError>;

    /// Runs a script and extracts top-level bindings.
    ///
    /// With `names == None` the engine auto-detects the bindings the script
    /// declares. Requested names may contain `*`/`?` wildcards; engines may
    /// return a superset and let the caller filter.
    fn extract_variables(
        &mut self,
        script: &str,
        names: Option<&[String]>,
    ) -> Result<BTreeMap<String, Value>, ScriptError>;

    /// Drops any state accumulated by earlier calls.
    fn reset(&mut self);
}

/// An in-memory script engine answering from pre-registered bindings.
///
/// Useful for embedders that pre-compute script state and for tests. Every
/// script "declares" all registered bindings.
#[derive(Debug, Default, Clone)]
pub struct StaticScriptEngine {
    bindings: BTreeMap<String, Value>,
    completion: Option<Value>,
    resets: usize,
    calls: usize,
}

impl StaticScriptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a top-level binding every script will report.
    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// Sets the value `execute` returns.
    pub fn with_completion(mut self, value: impl Into<Value>) -> Self {
        self.completion = Some(value.into());
        self
    }

    /// How many times `reset` has been called.
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// How many scripts have been run since creation.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ScriptEngine for StaticScriptEngine {
    fn execute(&mut self, script: &str) -> Result<Value, ScriptError> {
        self.calls += 1;
        self.completion
            .clone()
            .ok_or_else(|| ScriptError::NoValue(format!("{} bytes of script", script.len())))
    }

    fn extract_variables(
        &mut self,
        _script: &str,
        names: Option<&[String]>,
    ) -> Result<BTreeMap<String, Value>, ScriptError> {
        self.calls += 1;
        let exact = names.map(|names| {
            names
                .iter()
                .all(|n| !n.contains('*') && !n.contains('?'))
        });
        match (names, exact) {
            (Some(names), Some(true)) => Ok(self
                .bindings
                .iter()
                .filter(|(k, _)| names.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()),
            _ => Ok(self.bindings.clone()),
        }
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}
