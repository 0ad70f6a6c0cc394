use crate::errors::*;
use crate::filesystem::binding::Side;
use crate::filesystem::FileSystem;
use std::fs::FileType;
use std::path::{Path, PathBuf};

/// Outcome of a single binding lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum SubstitutionOutcome {
    /// No binding applies to this path.
    NoMatch,
    /// A binding applies but its two sides are byte-identical, so the path
    /// is unchanged.
    Unchanged,
    /// A binding applied and rewrote the path.
    Substituted(PathBuf),
}

pub trait Substitutor {
    fn substitute(&self, path: &Path, from_side: Side) -> Result<PathBuf>;
    fn substitute_binding(&self, path: &Path, from_side: Side) -> SubstitutionOutcome;
    fn substitute_intermediary(&self, path: &Path) -> Result<(PathBuf, FileType)>;
}

impl Substitutor for FileSystem {
    /// Finds a suitable binding for the given path, and changes its prefix
    /// from one side to another, if it can.
    ///
    /// * `path` is the path that will be modified. Must be canonicalized.
    /// * `from_side` is the side `path` is currently expressed in.
    #[inline]
    fn substitute(&self, path: &Path, from_side: Side) -> Result<PathBuf> {
        match self.substitute_binding(path, from_side) {
            SubstitutionOutcome::NoMatch => Err(Error::errno_with_msg(
                ENOENT,
                format!(
                    "No binding found, when substituting binding for path: {:?}",
                    path
                ),
            )),
            SubstitutionOutcome::Unchanged => Ok(path.to_path_buf()),
            SubstitutionOutcome::Substituted(new_path) => Ok(new_path),
        }
    }

    /// Looks up the longest-prefix binding applying to `path` and reports
    /// whether it changes the path.
    fn substitute_binding(&self, path: &Path, from_side: Side) -> SubstitutionOutcome {
        let binding = match self.get_first_appropriate_binding(path, from_side) {
            Some(binding) => binding,
            None => return SubstitutionOutcome::NoMatch,
        };

        if !binding.needs_substitution() {
            return SubstitutionOutcome::Unchanged;
        }

        match binding.substitute_path_prefix(path, from_side) {
            Ok(new_path) => SubstitutionOutcome::Substituted(new_path),
            Err(_) => SubstitutionOutcome::NoMatch,
        }
    }

    /// Substitutes a binding for a canonicalized guest path, and reports
    /// the resulting host path's file type without following a trailing
    /// symlink.
    #[inline]
    fn substitute_intermediary(&self, guest_path: &Path) -> Result<(PathBuf, FileType)> {
        let host_path = self.substitute(guest_path, Side::Guest)?;

        let metadata = host_path.symlink_metadata().map_err(Error::from)?;
        Ok((host_path, metadata.file_type()))
    }
}
