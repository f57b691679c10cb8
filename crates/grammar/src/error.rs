use std::fmt;
use thiserror::Error;

/// An optional "did you mean" hint appended to format errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Suggestion(pub Option<String>);

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(alternative) => write!(f, "; did you mean '{}'?", alternative),
            None => Ok(()),
        }
    }
}

/// The only error the query grammar raises. Always produced while compiling,
/// never while executing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid separator: {0}")]
    Separator(String),

    #[error("Unknown parameter '{key}'{suggestion}")]
    UnknownKey { key: String, suggestion: Suggestion },

    #[error("Unknown transform directive '{directive}'{suggestion}")]
    UnknownDirective {
        directive: String,
        suggestion: Suggestion,
    },

    #[error("Empty regular expression in '{0}'")]
    EmptyPattern(String),

    #[error("Missing variable name for 'save'")]
    EmptySaveName,

    #[error("Invalid argument for '{directive}': {message}")]
    InvalidArgument { directive: String, message: String },

    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("Empty query segment at position {0}")]
    EmptySegment(usize),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Cannot decode '{0}'")]
    Decode(String),
}
