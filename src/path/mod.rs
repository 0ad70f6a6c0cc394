//! Lexical path primitives shared by the canonicalizer, translator and
//! detranslator. These operate on raw bytes: guest and host paths are not
//! assumed to be valid UTF-8.

mod comparator;
mod joiner;
mod lexer;

pub use self::comparator::{compare_paths, Comparison};
pub use self::joiner::join_paths;
pub use self::lexer::{next_component, Finality};
