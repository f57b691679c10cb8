//! Foundation types shared by every quarry crate.
//!
//! - **`Value`**: the closed tagged union flowing through selectors and transforms
//! - **`DocumentNode`**: the capability a navigable HTML/JSON document exposes
//! - **`Bindings`**: the execution-scoped variable table written by `save`

pub mod bindings;
pub mod node;
pub mod value;

pub use bindings::Bindings;
pub use node::{DocumentNode, Move, NodeRef};
pub use value::Value;
