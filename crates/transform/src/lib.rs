//! The transform pipeline.
//!
//! Selector matches are refined in a fixed phase order:
//! transform → update → filter → index → save → discard.
//! A `Null` value skips every phase except `save` (which stores nothing)
//! and `discard` (which still wraps it).

pub mod context;
pub mod directive;
mod literal;
pub mod phase;
pub mod phases;
pub mod pipeline;
pub mod text;

// --- Public API ---
pub use context::TransformContext;
pub use directive::{Directive, FilterToken, TRANSFORM_KEYWORDS};
pub use literal::extract_assignment;
pub use phase::Phase;
pub use pipeline::Pipeline;
