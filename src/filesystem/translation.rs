use crate::constants::AT_FDCWD;
use crate::errors::*;
use crate::proc_emulator;

use crate::filesystem::binding::Side::{Guest, Host};
use crate::filesystem::canonicalization::Canonicalizer;
use crate::filesystem::substitution::Substitutor;
use crate::filesystem::FileSystem;
use crate::tracee::Tracee;
use nix::sys::stat;
use std::path::{Path, PathBuf};

pub trait Translator {
    fn translate_path<P: AsRef<Path>>(&self, guest_path: P, deref_final: bool) -> Result<PathBuf>;
    fn translate_absolute_path<P: AsRef<Path>>(
        &self,
        guest_path: P,
        deref_final: bool,
    ) -> Result<PathBuf>;
    fn detranslate_path<P: AsRef<Path>>(
        &self,
        host_path: P,
        referrer: Option<&Path>,
    ) -> Result<Option<PathBuf>>;
}

impl Translator for FileSystem {
    /// Translates a path from `guest` to `host`. Relative guest path is also
    /// accepted, resolved against `self`'s own cwd (a convenience for
    /// callers that already have a canonical anchor; `dir_fd`-relative
    /// anchors go through [`translate`] instead).
    fn translate_path<P: AsRef<Path>>(&self, guest_path: P, deref_final: bool) -> Result<PathBuf> {
        if guest_path.as_ref().is_relative() {
            let mut absolute_guest_path = PathBuf::from(self.get_cwd());
            absolute_guest_path.push(guest_path);
            self.translate_absolute_path(&absolute_guest_path, deref_final)
        } else {
            self.translate_absolute_path(guest_path, deref_final)
        }
    }

    /// Translates a path from `guest` to `host`. Only absolute guest path is
    /// accepted.
    fn translate_absolute_path<P: AsRef<Path>>(
        &self,
        guest_path: P,
        deref_final: bool,
    ) -> Result<PathBuf> {
        let canonical_guest_path = self.canonicalize(&guest_path, deref_final)?;
        let host_path = self.substitute(&canonical_guest_path, Guest)?;
        Ok(host_path)
    }

    /// Translates a path from `host` to `guest`.
    ///
    /// `path` must be canonicalized. Removes/substitutes the leading part
    /// of a "translated" `path`.
    ///
    /// Returns
    /// * `Ok(None)` if no translation is required (ie. symmetric binding).
    /// * `Ok(Some(path))` if the path was translated.
    /// * An error otherwise.
    fn detranslate_path<P: AsRef<Path>>(
        &self,
        host_path: P,
        referrer: Option<&Path>,
    ) -> Result<Option<PathBuf>> {
        let host_path = host_path.as_ref();
        // Don't try to detranslate relative paths (typically
        // the target of a relative symbolic link).
        if host_path.is_relative() {
            return Ok(None);
        }

        let mut follow_binding = true;

        if let Some(referrer_path) = referrer {
            follow_binding = false;

            if referrer_path.starts_with("/proc") {
                // Some links in "/proc" are generated dynamically by the
                // kernel and conceptually point into the guest namespace,
                // so binding follow-through is always enabled for them.
                if proc_emulator::recognize(referrer_path).is_some() {
                    follow_binding = true;
                }
            } else if !self.belongs_to_guestfs(referrer_path) {
                // Resolve bindings for symlinks that belong
                // to a binding and point to the same binding.
                // For example, if "-b /lib:/foo" is specified
                // and the symlink "/lib/a -> /lib/b" exists
                // in the host rootfs namespace, then it
                // should appear as "/foo/a -> /foo/b" in the
                // guest rootfs namespace for consistency
                // reasons.
                //
                // If the referrer itself doesn't belong to any binding,
                // there's nothing to compare against, so `follow_binding`
                // stays false.
                if let Some(binding_referrer) = self.get_first_appropriate_binding(referrer_path, Host) {
                    if let Some(binding_referree) = self.get_first_appropriate_binding(host_path, Host) {
                        follow_binding =
                            binding_referree.get_path(Host) == binding_referrer.get_path(Host);
                    }
                }
            }
        }

        if follow_binding {
            if let Ok(maybe_path) = self.substitute(host_path, Host) {
                // if a suitable binding was found, we stop here
                return Ok(Some(maybe_path));
            }
        }

        // otherwise, we simply try to strip the (guest) root
        if let Ok(stripped_path) = host_path.strip_prefix(&self.get_root()) {
            return Ok(Some(PathBuf::from("/").join(stripped_path)));
        }

        // With no referrer, this is a top-level, sanity-checked call: a
        // host path that matches neither a binding nor the guest rootfs
        // must not be handed back unchanged, or the tracee could observe a
        // host path it has no business seeing. A referrer-carrying call
        // (following a symlink target) is allowed to pass the path through
        // unchanged instead.
        if referrer.is_none() {
            return Err(Error::permission_denied(format!(
                "{:?} is outside the guest filesystem and not reachable through any binding",
                host_path
            )));
        }

        Ok(None)
    }
}

/// Guest → host entry point.
///
/// Resolves the anchor (root for an absolute `fake_path`, otherwise
/// `dir_fd`'s target detranslated to guest form), fires the `GUEST_PATH`
/// extension hook, then canonicalizes and bind-substitutes.
pub fn translate(tracee: &Tracee, dir_fd: i32, fake_path: &Path, deref_final: bool) -> Result<PathBuf> {
    let mut result = resolve_anchor(tracee, dir_fd, fake_path)?;

    if tracee.extensions.guest_path(&mut result, fake_path)? {
        // The hook already produced a host path: skip canonicalization and
        // binding substitution entirely.
        return Ok(result);
    }

    let joined = result.join(fake_path);
    let canonical_guest_path = tracee.fs.canonicalize(&joined, deref_final)?;
    tracee.fs.substitute(&canonical_guest_path, Guest)
}

/// Host → guest entry point.
pub fn detranslate(tracee: &Tracee, host_path: &Path, referrer: Option<&Path>) -> Result<Option<PathBuf>> {
    tracee.fs.detranslate_path(host_path, referrer)
}

/// Computes the guest-form anchor a relative `fake_path` is resolved
/// against.
fn resolve_anchor(tracee: &Tracee, dir_fd: i32, fake_path: &Path) -> Result<PathBuf> {
    if fake_path.is_absolute() {
        return Ok(PathBuf::from("/"));
    }

    let pid = tracee.anchor_pid();

    let host_anchor = if dir_fd == AT_FDCWD {
        let cwd_link = PathBuf::from(format!("/proc/{}/cwd", pid));
        cwd_link
            .read_link()
            .map_err(|e| Error::operation_failed(format!("reading {:?}: {}", cwd_link, e)))?
    } else {
        let fd_link = PathBuf::from(format!("/proc/{}/fd/{}", pid, dir_fd));
        let target = fd_link
            .read_link()
            .map_err(|e| Error::operation_failed(format!("reading {:?}: {}", fd_link, e)))?;

        // A failed `stat` here must be treated as `NOT_A_DIRECTORY` rather
        // than trusting whatever is left on the stack: we never inspect an
        // uninitialized mode field.
        match stat::stat(&target) {
            Ok(attr) if (attr.st_mode & libc::S_IFMT) == libc::S_IFDIR => {}
            _ => {
                return Err(Error::not_a_directory(format!(
                    "dir_fd {} does not refer to a directory",
                    dir_fd
                )))
            }
        }
        target
    };

    match tracee.fs.detranslate_path(&host_anchor, None)? {
        Some(guest_anchor) => Ok(guest_anchor),
        None => Ok(host_anchor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::filesystem::binding::Binding;
    use crate::filesystem::FileSystem;
    use crate::utils::tests::get_test_rootfs;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_translate_path_without_root() {
        let mut fs = FileSystem::with_root("/");

        assert_eq!(
            fs.translate_path("/home/../etc/./../etc", false),
            Ok("/etc".into())
        ); // simple canonicalization here

        fs.add_binding(Binding::new("/etc", "/home", true));

        assert_eq!(
            fs.translate_path(&Path::new("/home/passwd"), false),
            Ok(PathBuf::from("/etc/passwd"))
        );
    }

    #[test]
    fn test_translate_path_with_root() {
        let rootfs_path = get_test_rootfs();

        let mut fs = FileSystem::with_root(&rootfs_path);

        assert_eq!(
            fs.translate_path("/bin/sleep", false),
            Ok(rootfs_path.clone().join("bin/sleep"))
        );

        fs.add_binding(Binding::new(rootfs_path.join("usr-bin"), "/bin", true));

        // "/bin/true" -> "${rootfs}/usr-bin/true"
        assert_eq!(
            fs.translate_path(&Path::new("/bin/true"), false),
            Ok(rootfs_path.join("usr-bin/true"))
        );
    }

    #[test]
    fn test_detranslate_path_root() {
        let rootfs_path = get_test_rootfs();

        // "${rootfs}" on the host, "/" on the guest
        let fs = FileSystem::with_root(rootfs_path.as_path());

        // "${rootfs}/bin/sleep" -> "/bin/sleep"
        assert_eq!(
            fs.detranslate_path(&PathBuf::from(&rootfs_path).join("bin/sleep"), None),
            Ok(Some(PathBuf::from("/bin/sleep")))
        );

        // "${rootfs}" -> "/"
        assert_eq!(
            fs.detranslate_path(&Path::new(rootfs_path.as_path()), None),
            Ok(Some(PathBuf::from("/")))
        );
    }

    #[test]
    fn test_detranslate_path_asymmetric() {
        let rootfs_path = get_test_rootfs();

        // "${rootfs}" on the host, "/" on the guest
        let mut fs = FileSystem::with_root(rootfs_path);

        fs.add_binding(Binding::new("/etc", "/tmp", true));

        assert_eq!(
            fs.detranslate_path(&Path::new("/etc/passwd"), None),
            Ok(Some(PathBuf::from("/tmp/passwd")))
        );
    }

    #[test]
    fn test_detranslate_path_symmetric() {
        let mut fs = FileSystem::with_root(get_test_rootfs());

        fs.add_binding(Binding::new("/etc", "/etc", true));

        assert_eq!(
            fs.detranslate_path("/etc/guest/something", None),
            Ok(Some(PathBuf::from("/etc/guest/something")))
        ); // no change in path, because it's a symmetric binding
    }

    #[test]
    fn test_detranslate_path_resolves_via_referrer_binding() {
        let rootfs_path = get_test_rootfs();
        let mut fs = FileSystem::with_root(&rootfs_path);

        // "-b /lib:/foo": a symlink "/lib/a -> /lib/b" in the host
        // namespace should detranslate "/lib/b" as "/foo/b" when the
        // referrer ("/lib/a") belongs to the same binding.
        fs.add_binding(Binding::new("/lib", "/foo", true));

        assert_eq!(
            fs.detranslate_path(Path::new("/lib/b"), Some(Path::new("/lib/a"))),
            Ok(Some(PathBuf::from("/foo/b")))
        );
    }

    #[test]
    fn test_detranslate_path_proc_referrer_always_follows_binding() {
        let rootfs_path = get_test_rootfs();
        let mut fs = FileSystem::with_root(&rootfs_path);

        fs.add_binding(Binding::new(rootfs_path.join("usr-bin"), "/bin", true));

        // A dynamically-generated "/proc/<pid>/cwd" referrer always
        // follows the binding, regardless of what it points at.
        assert_eq!(
            fs.detranslate_path(
                rootfs_path.join("usr-bin/true"),
                Some(Path::new("/proc/123/cwd"))
            ),
            Ok(Some(PathBuf::from("/bin/true")))
        );
    }

    #[test]
    fn test_detranslate_path_without_referrer_rejects_unreachable_path() {
        let rootfs_path = get_test_rootfs();
        let fs = FileSystem::with_root(&rootfs_path);

        // No referrer and no binding/rootfs covers this path: a top-level
        // detranslation must not hand back a host path the guest has no
        // business seeing.
        assert_eq!(
            fs.detranslate_path(Path::new("/etc/shadow"), None),
            Err(Error::permission_denied(""))
        );
    }

    #[test]
    fn test_translate_dispatches_through_tracee() {
        let rootfs_path = get_test_rootfs();
        let fs = FileSystem::with_root(&rootfs_path);
        let tracee = Tracee::new(nix::unistd::Pid::from_raw(0), fs);

        // absolute fake_path: anchor is always "/", regardless of dir_fd
        let host_path = translate(&tracee, AT_FDCWD, Path::new("/bin/sleep"), false).unwrap();
        assert_eq!(host_path, rootfs_path.join("bin/sleep"));
    }
}
