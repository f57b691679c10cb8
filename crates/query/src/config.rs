/// Settings for one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Placed between entries by [`crate::QueryResult::joined`].
    pub join_separator: String,
    /// Used for `${pageUrl}`, `${rootUrl}` and `url:` parts instead of the
    /// root document's own URL.
    pub source_url: Option<String>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            join_separator: "\n".to_string(),
            source_url: None,
        }
    }
}

impl ExecutionConfig {
    pub fn with_join_separator(mut self, separator: impl Into<String>) -> Self {
        self.join_separator = separator.into();
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}
