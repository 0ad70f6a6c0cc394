mod canonicalization;
mod fs;
mod initialization;
mod substitution;
mod translation;

pub mod binding;
pub mod validation;

pub use self::canonicalization::Canonicalizer;
pub use self::fs::FileSystem;
pub use self::initialization::Initialiser;
pub use self::substitution::{SubstitutionOutcome, Substitutor};
pub use self::translation::{detranslate, translate, Translator};
