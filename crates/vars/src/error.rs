use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VarsError {
    #[error("Placeholder parse error in '{0}': {1}")]
    Parse(String, String),
}
