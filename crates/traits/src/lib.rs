pub mod markup;
pub mod script;

pub use markup::MarkupParser;
pub use script::{ScriptEngine, ScriptError, StaticScriptEngine};
