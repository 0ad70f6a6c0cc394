use std::path::{Path, PathBuf};

use nix::sys::{self};
use nix::unistd::{self, AccessFlags};

use crate::errors::Result;
use crate::filesystem::binding::Side::Host;
use crate::filesystem::binding::{Binding, BindingTable, Side};

/// Information related to a file-system name-space.
#[derive(Debug)]
pub struct FileSystem {
    /// Bindings used to replicate `mount` and `bind`, including the root
    /// binding (set up by `set_root`, replicates `chroot`).
    bindings: BindingTable,
    /// Working directory in guestfs, à la `/proc/self/pwd`.
    cwd: PathBuf,
    /// Guest root (the binding associated to `/`)
    root: PathBuf,
}

impl FileSystem {
    pub fn new() -> FileSystem {
        FileSystem {
            bindings: BindingTable::new(),
            cwd: PathBuf::from("."),
            root: PathBuf::from("/"),
        }
    }

    #[cfg(test)]
    pub fn with_root<P: AsRef<Path>>(root: P) -> FileSystem {
        let mut file_system = FileSystem::new();

        file_system.set_root(root);
        file_system
    }

    /// Registers `binding`, replacing any existing binding with an
    /// identical guest prefix.
    #[inline]
    pub fn add_binding(&mut self, binding: Binding) {
        self.bindings.insert(binding);
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    #[inline]
    /// Checks if the translated `host_path` belongs to the guest rootfs,
    /// that is, if it isn't from a binding.
    pub fn belongs_to_guestfs(&self, host_path: &Path) -> bool {
        host_path.starts_with(&self.root)
    }

    /// Retrieves the most specific binding for a path translation.
    ///
    /// * `path` is the path which content will be tested on each binding
    /// * `from_side` indicates the starting side of the translation (ie. guest
    ///   for guest -> host)
    pub fn get_first_appropriate_binding(&self, path: &Path, from_side: Side) -> Option<&Binding> {
        let binding = self.bindings.find(path, from_side)?;

        if from_side == Host && !self.root.eq(&PathBuf::from("/")) && self.belongs_to_guestfs(path)
        {
            // Avoid false positive when a prefix of the rootfs is
            // used as an asymmetric binding, ex.:
            //
            //     -r /usr/local/slackware -b /usr:/location
            //
            return None;
        }

        Some(binding)
    }

    #[inline]
    /// Checks is `path` is a file, does exist and is executable.
    pub fn is_path_executable(&self, path: &Path) -> Result<()> {
        unistd::access(path, AccessFlags::F_OK)?;
        unistd::access(path, AccessFlags::X_OK)?;
        sys::stat::lstat(path)?;
        Ok(())
    }

    #[inline]
    pub fn set_cwd(&mut self, cwd: PathBuf) {
        self.cwd = cwd;
    }

    #[inline]
    pub fn get_cwd(&self) -> &Path {
        &self.cwd
    }

    #[inline]
    pub fn set_root<P: AsRef<Path>>(&mut self, root: P) {
        self.root = root.as_ref().into();
        self.add_binding(Binding::new(root, "/", true));
    }

    #[inline]
    pub fn get_root(&self) -> &Path {
        &self.root
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        FileSystem::new()
    }
}
