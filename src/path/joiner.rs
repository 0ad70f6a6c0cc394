use crate::constants::PATH_MAX;
use crate::errors::{Error, Result};

/// Concatenates `frags` into a single path, inserting exactly one `/`
/// between consecutive non-empty fragments so the result never contains
/// `//`.
pub fn join_paths(frags: &[&[u8]]) -> Result<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();

    for frag in frags.iter().filter(|f| !f.is_empty()) {
        let needs_separator = !out.is_empty()
            && out.last() != Some(&b'/')
            && frag.first() != Some(&b'/');
        let drop_separator =
            !out.is_empty() && out.last() == Some(&b'/') && frag.first() == Some(&b'/');

        if drop_separator {
            out.pop();
        } else if needs_separator {
            out.push(b'/');
        }
        out.extend_from_slice(frag);

        if out.len() >= PATH_MAX {
            return Err(Error::name_too_long(format!(
                "joined path of {} bytes exceeds PATH_MAX ({})",
                out.len(),
                PATH_MAX
            )));
        }
    }

    Ok(out)
}
