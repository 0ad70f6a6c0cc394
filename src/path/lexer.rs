use crate::constants::NAME_MAX;
use crate::errors::{Error, Result};

/// Whether a component returned by [`next_component`] is the last one in
/// the input, and if so whether the caller wrote a trailing slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finality {
    /// More components follow.
    NotFinal,
    /// Last component, no trailing slash.
    FinalNormal,
    /// Last component, trailing slash present: caller expects a directory.
    FinalSlash,
}

/// Splits the next path component off `input`.
///
/// Leading `/` runs are skipped before the component is read, and any `/`
/// run following the component is consumed to decide [`Finality`]. Returns
/// `(component, finality, rest)`; `component` is empty once `input` is
/// exhausted (including the degenerate case where `input` was only `/`).
///
/// Fails with a `NAME_TOO_LONG` error if the component would be `>=
/// NAME_MAX` bytes.
pub fn next_component(input: &[u8]) -> Result<(&[u8], Finality, &[u8])> {
    let mut cursor = input;
    let mut had_leading_slash = false;
    while cursor.first() == Some(&b'/') {
        had_leading_slash = true;
        cursor = &cursor[1..];
    }

    let end = cursor.iter().position(|&b| b == b'/').unwrap_or(cursor.len());
    if end >= NAME_MAX {
        return Err(Error::name_too_long(format!(
            "path component of {} bytes exceeds NAME_MAX ({})",
            end, NAME_MAX
        )));
    }

    let component = &cursor[..end];
    let mut rest = &cursor[end..];
    let mut trailing_slash = false;
    while rest.first() == Some(&b'/') {
        trailing_slash = true;
        rest = &rest[1..];
    }

    let finality = if !rest.is_empty() {
        Finality::NotFinal
    } else if trailing_slash || (component.is_empty() && had_leading_slash) {
        // root alone ("/") is a degenerate component that still counts as
        // ending in a slash, matching how the rest of the engine treats it
        Finality::FinalSlash
    } else {
        Finality::FinalNormal
    };

    Ok((component, finality, rest))
}
