//! Length and traversal limits the engine never relaxes.

/// Maximum length, in bytes, of a path (including the NUL sentinel).
pub const PATH_MAX: usize = libc::PATH_MAX as usize;

/// Maximum length, in bytes, of a single path component.
pub const NAME_MAX: usize = libc::NAME_MAX as usize;

/// Upper bound on the number of symlinks dereferenced while canonicalizing
/// a single path, mirroring the kernel's own `MAXSYMLINKS`.
pub const MAX_SYMLINK_DEREFERENCES: u32 = 40;

/// Sentinel `dir_fd` value meaning "relative to the current working
/// directory", mirroring `fcntl.h`'s `AT_FDCWD`.
pub const AT_FDCWD: i32 = libc::AT_FDCWD;
