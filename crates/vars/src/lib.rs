//! Resolution of `${...}` placeholders against the bindings table.
//!
//! Placeholders hold a bare identifier or a small arithmetic expression:
//! `${page}`, `${page + 1}`, `${(a + b) * 2}`, `${prefix + '-' + id}`.
//! Resolution never fails: unknown names become the empty string.

pub mod ast;
pub mod engine;
pub mod error;
mod parser;
pub mod template;

pub use ast::{Expr, Operator};
pub use engine::{Operand, evaluate};
pub use error::VarsError;
pub use parser::parse_expression;
pub use template::{RESERVED_NAMES, has_placeholder, resolve};
