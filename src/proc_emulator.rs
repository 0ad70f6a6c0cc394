//! Recognizes the dynamic `/proc/<pid>/*` magic-links the kernel
//! generates, whose targets are host paths that must be rewritten to guest
//! form before a tracee observes them.

use std::path::Path;

/// A `/proc/<pid>/*` entry the kernel rewrites dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcLink {
    /// `/proc/<pid>/cwd`
    Cwd,
    /// `/proc/<pid>/root`
    Root,
    /// `/proc/<pid>/exe`
    Exe,
    /// `/proc/<pid>/fd/<n>`
    Fd(i32),
}

/// Recognizes `path` as one of the dynamic `/proc/<pid>/*` links, if it is
/// one. Any other path under `/proc`, or a path not under `/proc` at all,
/// yields `None`.
pub fn recognize(path: &Path) -> Option<ProcLink> {
    let mut components = path.components();
    if components.next()?.as_os_str() != "/" {
        return None;
    }
    if components.next()?.as_os_str() != "proc" {
        return None;
    }
    // The pid component itself isn't validated here: the caller already
    // knows which pid this referrer belongs to (it read the link itself).
    components.next()?.as_os_str().to_str()?.parse::<i32>().ok()?;

    match components.next()?.as_os_str().to_str()? {
        "cwd" => {
            if components.next().is_none() {
                Some(ProcLink::Cwd)
            } else {
                None
            }
        }
        "root" => {
            if components.next().is_none() {
                Some(ProcLink::Root)
            } else {
                None
            }
        }
        "exe" => {
            if components.next().is_none() {
                Some(ProcLink::Exe)
            } else {
                None
            }
        }
        "fd" => {
            let n = components.next()?.as_os_str().to_str()?.parse::<i32>().ok()?;
            if components.next().is_none() {
                Some(ProcLink::Fd(n))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn recognizes_cwd_root_exe() {
        assert_eq!(recognize(&PathBuf::from("/proc/123/cwd")), Some(ProcLink::Cwd));
        assert_eq!(recognize(&PathBuf::from("/proc/123/root")), Some(ProcLink::Root));
        assert_eq!(recognize(&PathBuf::from("/proc/123/exe")), Some(ProcLink::Exe));
    }

    #[test]
    fn recognizes_fd_entries() {
        assert_eq!(recognize(&PathBuf::from("/proc/123/fd/7")), Some(ProcLink::Fd(7)));
    }

    #[test]
    fn rejects_unrelated_or_malformed_paths() {
        assert_eq!(recognize(&PathBuf::from("/proc/123/status")), None);
        assert_eq!(recognize(&PathBuf::from("/proc/123/fd")), None);
        assert_eq!(recognize(&PathBuf::from("/etc/passwd")), None);
        assert_eq!(recognize(&PathBuf::from("/proc/self/cwd")), None);
    }
}
