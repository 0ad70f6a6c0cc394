use crate::constants::MAX_SYMLINK_DEREFERENCES;
use crate::errors::*;
use crate::filesystem::substitution::Substitutor;
use crate::filesystem::FileSystem;
use crate::path::{next_component, Finality};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

pub trait Canonicalizer {
    fn canonicalize(&self, path: &Path, deref_final: bool) -> Result<PathBuf>;
}

impl Canonicalizer for FileSystem {
    /// Canonicalizes `user_path` relative to the guest root (see `man 3
    /// realpath`).
    ///
    /// It removes ".." and "." from the paths and recursively dereferences
    /// symlinks, bind-substituting intermediate components as it goes so
    /// that symlinks crossing a binding boundary resolve consistently with
    /// how the guest would see the filesystem. The result is a canonicalized
    /// path on the `Guest` side.
    ///
    /// The final component is only dereferenced if `deref_final` is true.
    fn canonicalize(&self, user_path: &Path, deref_final: bool) -> Result<PathBuf> {
        self.canonicalize_with_depth(user_path, deref_final, 0)
    }
}

impl FileSystem {
    fn canonicalize_with_depth(
        &self,
        user_path: &Path,
        deref_final: bool,
        depth: u32,
    ) -> Result<PathBuf> {
        if depth > MAX_SYMLINK_DEREFERENCES {
            return Err(Error::too_many_links(format!(
                "while canonicalizing {:?}",
                user_path
            )));
        }

        // The `user_path` must be absolute path
        if user_path.is_relative() {
            return Err(Error::errno_with_msg(
                Errno::EINVAL,
                format!("Cannot canonicalize a relative path: {:?}", user_path),
            ));
        }

        // build guest_path from user_path, pulling one component at a time
        // off the byte-level lexer so "." / ".." / trailing-slash handling
        // all go through the same path-splitting logic as the rest of the
        // engine, instead of `std::path::Components`'s own opinions.
        let mut guest_path = PathBuf::from("/");
        let mut rest: &[u8] = user_path.as_os_str().as_bytes();
        let mut last_finality = Finality::FinalNormal;
        let mut first = true;

        loop {
            let (component, finality, next_rest) = next_component(rest)?;

            if component.is_empty() {
                if first {
                    last_finality = finality;
                }
                break;
            }
            first = false;
            last_finality = finality;
            let is_last_component = matches!(finality, Finality::FinalNormal | Finality::FinalSlash);

            if component == b"." {
                rest = next_rest;
                continue;
            }
            if component == b".." {
                guest_path.pop();
                rest = next_rest;
                continue;
            }

            guest_path.push(OsStr::from_bytes(component));

            let (host_path, file_type) = self.substitute_intermediary(&guest_path)?;

            // directory can always push
            if file_type.is_dir() {
                rest = next_rest;
                continue;
            }
            if file_type.is_symlink() {
                // we can continue if current path is symlink and is last component and
                // if we explicitly ask to not dereference 'user_path', as required by
                // kernel like `lstat(2)`
                if is_last_component && !deref_final {
                    rest = next_rest;
                    continue;
                }
                let link_value = host_path.read_link()?;
                let mut new_user_path = if link_value.is_absolute() {
                    // link_value is an absolute path, so the accumulator is reset and
                    // the symlink target replaces what's been consumed so far.
                    link_value
                } else {
                    // link_value is relative: pop the symlink itself and splice the
                    // target in its place.
                    guest_path.pop();
                    guest_path.push(&link_value);
                    guest_path
                };
                // append the unparsed remainder of the original path
                if !next_rest.is_empty() {
                    new_user_path.push(OsStr::from_bytes(next_rest));
                }
                return self.canonicalize_with_depth(&new_user_path, deref_final, depth + 1);
            }
            // we cannot go through a path which is neither a directory nor a symlink
            if !is_last_component {
                return Err(Error::not_a_directory(
                    "when canonicalizing an intermediate path",
                ));
            }
            rest = next_rest;
        }

        if last_finality == Finality::FinalSlash {
            let (_, file_type) = self.substitute_intermediary(&guest_path)?;
            if !file_type.is_dir() {
                return Err(Error::not_a_directory(format!(
                    "{:?} has a trailing slash but is not a directory",
                    guest_path
                )));
            }
        }

        Ok(guest_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::binding::Binding;
    use crate::filesystem::FileSystem;
    use crate::utils::tests::get_test_rootfs;
    use std::path::PathBuf;

    #[test]
    fn test_canonicalize_invalid_path() {
        let fs = FileSystem::with_root(get_test_rootfs());
        let path = PathBuf::from("/impossible_path");

        assert_eq!(
            fs.canonicalize(&path, false).unwrap_err().get_errno(),
            Errno::ENOENT
        );
    }

    #[test]
    fn test_canonicalize_path_traversal() {
        let fs = FileSystem::with_root(get_test_rootfs());

        let path = PathBuf::from("/../impossible_path");
        // should fail, because ${rootfs}/impossible_path does not exist on host
        assert_eq!(
            fs.canonicalize(&path, false).unwrap_err().get_errno(),
            Errno::ENOENT
        );
        // should be ok, because ${rootfs}/bin exists on host
        let path = PathBuf::from("/../bin");
        assert_eq!(fs.canonicalize(&path, false), Ok(PathBuf::from("/bin")));
    }

    #[test]
    fn test_canonicalize_normal_path() {
        let rootfs_path = get_test_rootfs();
        let mut fs = FileSystem::with_root(rootfs_path.as_path());

        assert_eq!(
            fs.canonicalize(&PathBuf::from("/bin/./../bin//sleep"), false)
                .unwrap(),
            PathBuf::from("/bin/sleep")
        );

        assert_eq!(
            fs.canonicalize(&PathBuf::from("/./../../.././../."), false)
                .unwrap(),
            PathBuf::from("/")
        );

        // add binding from ${rootfs}/bin to /usr-bin
        fs.add_binding(Binding::new(rootfs_path.join("bin"), "/usr-bin", true));

        assert_eq!(
            fs.canonicalize(&PathBuf::from("/usr-bin/../usr-bin"), false)
                .unwrap(),
            PathBuf::from("/usr-bin")
        );
    }

    #[test]
    fn test_canonicalize_no_root_normal_path() {
        let fs = FileSystem::with_root(get_test_rootfs());

        // should be ok, because ${rootfs}/home, ${rootfs}/, ${rootfs}/etc,
        // ${rootfs}/etc/passwd all exist on host
        assert_eq!(
            fs.canonicalize(&PathBuf::from("/home/../etc/./../etc/passwd"), false)
                .unwrap(),
            PathBuf::from("/etc/passwd")
        );
    }

    #[test]
    fn test_canonicalize_symlink_not_deref() {
        let fs = FileSystem::with_root(get_test_rootfs());

        // "${rootfs}/lib64" is a symlink to "lib"
        assert_eq!(
            fs.canonicalize(&PathBuf::from("/lib64"), false).unwrap(),
            PathBuf::from("/lib64")
        );
        assert_eq!(
            fs.canonicalize(&PathBuf::from("/lib64"), true).unwrap(),
            PathBuf::from("/lib")
        );
    }

    #[test]
    fn test_canonicalize_trailing_slash_requires_directory() {
        let fs = FileSystem::with_root(get_test_rootfs());

        assert!(fs.canonicalize(&PathBuf::from("/bin/"), false).is_ok());
        assert_eq!(
            fs.canonicalize(&PathBuf::from("/bin/sleep/"), false)
                .unwrap_err()
                .get_errno(),
            Errno::ENOTDIR
        );
    }

    #[test]
    fn test_canonicalize_too_many_symlinks() {
        let fs = FileSystem::with_root(get_test_rootfs());

        // "${rootfs}/loop" -> "${rootfs}/loop" (self-referential symlink)
        assert_eq!(
            fs.canonicalize(&PathBuf::from("/loop"), true)
                .unwrap_err()
                .get_errno(),
            Errno::ELOOP
        );
    }
}
