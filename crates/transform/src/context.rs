use quarry_traits::ScriptEngine;
use quarry_types::Bindings;
use std::fmt;

/// Mutable state threaded through one pipeline run.
pub struct TransformContext<'a, 's> {
    /// The execution-wide variable table written by `save`.
    pub bindings: &'a mut Bindings,
    /// The script capability used by `jseval`, if configured.
    pub script: Option<&'a mut (dyn ScriptEngine + 's)>,
    /// URL of the executing document.
    pub page_url: &'a str,
}

impl<'a, 's> TransformContext<'a, 's> {
    pub fn new(bindings: &'a mut Bindings, page_url: &'a str) -> Self {
        Self {
            bindings,
            script: None,
            page_url,
        }
    }

    pub fn with_script(mut self, engine: &'a mut (dyn ScriptEngine + 's)) -> Self {
        self.script = Some(engine);
        self
    }
}

impl fmt::Debug for TransformContext<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformContext")
            .field("bindings", &self.bindings.len())
            .field("script", &self.script.is_some())
            .field("page_url", &self.page_url)
            .finish()
    }
}
