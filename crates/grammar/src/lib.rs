//! The lowest layer of the quarry query grammar.
//!
//! Every higher grammar (chain operators, selectors, query parameters,
//! directive arguments) is built from two primitives: splitting at the
//! first *unescaped* delimiter, and stripping an `any#`/`every#` quantifier
//! tag before splitting into ordered children.

pub mod combination;
pub mod error;
pub mod separator;
pub mod suggest;
pub mod wildcard;

pub use combination::{Combination, Quantifier};
pub use error::{FormatError, Suggestion};
pub use separator::{ESCAPE, Separator, Split, find_unescaped, split_unescaped, unescape};
pub use suggest::closest;
pub use wildcard::{has_wildcard, wildcard_match};
