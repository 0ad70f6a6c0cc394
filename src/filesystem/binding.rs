use crate::errors::*;
use libc::PATH_MAX;
use nix::NixPath;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Side {
    Host,  // in the real filesystem
    Guest, // in the sandbox
}

impl Side {
    pub fn reverse(&self) -> Side {
        match self {
            Side::Host => Side::Guest,
            Side::Guest => Side::Host,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    /// Host side path of this binding in canonical form.
    host: PathBuf,
    /// Guest side path of this binding in canonical form.
    guest: PathBuf,
    /// A binding is called `symetric binding` if `host` is equals to `guest`,
    /// which means that the paths under this binding do not require path
    /// substitution.
    need_substitution: bool,
    _must_exist: bool,
}

impl Binding {
    //TODO: return Option<Binding> and make checks (test existence if must_exist,
    // sanitize, canon..)
    pub fn new<P1, P2>(host: P1, guest: P2, must_exist: bool) -> Binding
    where
        P1: Into<PathBuf>,
        P2: Into<PathBuf>,
    {
        let host = host.into();
        let guest = guest.into();
        let need_substitution = !host.eq(&guest);
        Binding {
            host: host,
            guest: guest,
            need_substitution: need_substitution,
            _must_exist: must_exist,
        }
    }

    #[inline]
    pub fn get_path(&self, side: Side) -> &PathBuf {
        match side {
            Side::Guest => &self.guest,
            Side::Host => &self.host,
        }
    }

    #[inline]
    pub fn needs_substitution(&self) -> bool {
        self.need_substitution
    }

    #[inline]
    pub fn substitute_path_prefix(&self, path: &Path, from_side: Side) -> Result<PathBuf> {
        let current_prefix = self.get_path(from_side);

        // we start with the new prefix
        let mut new_path: PathBuf = PathBuf::from(self.get_path(from_side.reverse()));
        let stripped_path = path.strip_prefix(current_prefix).with_context(|| {
            format!(
                "Failed to strip_prefix {:?} from {:?}",
                current_prefix, path
            )
        })?;

        // and then add what remains of the path when removing the old prefix
        if !stripped_path.is_empty() {
            // If the `stripped_path` is empty, we will not call `.push("")`, to avoid
            // adding the extra "/" at the end of the path.
            //
            // Note: As mentioned in the document of `std::path::PathBuf::components()`, "A
            // trailing slash is normalized away" in a path. And it means `foo/bar` is the
            // same as `foo/bar/` . However, many Linux system call are sensitive to
            // trailing slash, and they assume a path with a trailing slash as a directory.
            new_path.push(stripped_path);
        }

        if new_path.len() >= PATH_MAX as usize {
            return Err(Error::errno_with_msg(
                Errno::ENAMETOOLONG,
                format!(
                    "Path length {} exceed PATH_MAX {}: {:?}",
                    new_path.len(),
                    PATH_MAX,
                    new_path
                ),
            ));
        }
        Ok(new_path)
    }
}

/// Ordered collection of bindings with longest-prefix lookup from either
/// side.
#[derive(Debug, Default)]
pub struct BindingTable {
    /// Insertion order, oldest first: later entries win ties in `find`.
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn new() -> BindingTable {
        BindingTable {
            bindings: Vec::new(),
        }
    }

    /// Inserts `binding`, replacing any existing entry with the same guest
    /// prefix (invariant 4: no two entries share a guest prefix).
    pub fn insert(&mut self, binding: Binding) {
        self.bindings
            .retain(|existing| existing.get_path(Side::Guest) != binding.get_path(Side::Guest));
        self.bindings.push(binding);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Finds the binding whose `from_side` path is the longest prefix of
    /// `path`. On a tie the most recently inserted binding wins.
    pub fn find(&self, path: &Path, from_side: Side) -> Option<&Binding> {
        let mut best: Option<&Binding> = None;
        let mut best_len = 0usize;

        for binding in &self.bindings {
            let prefix = binding.get_path(from_side);
            if !path.starts_with(prefix) {
                continue;
            }
            let len = prefix.as_os_str().len();
            if best.is_none() || len >= best_len {
                best = Some(binding);
                best_len = len;
            }
        }

        best
    }
}
