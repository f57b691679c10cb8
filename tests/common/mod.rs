pub mod fixtures;

use quarry::{Query, QuarryError, Value, load_document};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses markup as an HTML root located at [`fixtures::PAGE_URL`].
pub fn html(markup: &str) -> Result<Value, QuarryError> {
    load_document(markup, false, fixtures::PAGE_URL)
}

/// Parses text as a JSON root located at [`fixtures::PAGE_URL`].
pub fn json(text: &str) -> Result<Value, QuarryError> {
    load_document(text, true, fixtures::PAGE_URL)
}

/// Compiles and runs a query, returning the simplified view.
pub fn run(query: &str, root: &Value) -> Result<Value, QuarryError> {
    init_logging();
    Ok(Query::compile(query)?.execute(root))
}

/// Compiles and runs a query, returning the kept view.
pub fn kept(query: &str, root: &Value) -> Result<Vec<Value>, QuarryError> {
    init_logging();
    Ok(Query::compile(query)?.collection_value(root))
}

pub fn strings(items: &[&str]) -> Value {
    Value::from(items.iter().map(|s| Value::from(*s)).collect::<Vec<_>>())
}
