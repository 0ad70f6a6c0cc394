//! A user-space path translation engine: translates guest paths (as a
//! traced process would see them, rooted at a synthetic `/`) into host
//! paths the kernel understands, and the inverse, honoring a table of
//! overlay bindings and emulating the dynamic `/proc/<pid>/*` magic-links
//! along the way. The ptrace/seccomp supervisor that would drive a real
//! tracee is not part of this crate; see `main.rs` for a thin CLI
//! demonstration of the public API below.

pub mod cli;
pub mod constants;
pub mod errors;
pub mod extension;
pub mod filesystem;
pub mod path;
pub mod proc_emulator;
pub mod tracee;
mod utils;

use errors::{Error, Result};
use nix::unistd::Pid;
use std::path::Path;

pub use path::{compare_paths, join_paths, Comparison, Finality};
pub use tracee::Tracee;

/// Guest → host entry point.
pub fn translate(tracee: &Tracee, dir_fd: i32, fake_path: &Path, deref_final: bool) -> Result<std::path::PathBuf> {
    filesystem::translate(tracee, dir_fd, fake_path, deref_final)
}

/// Host → guest entry point.
pub fn detranslate(
    tracee: &Tracee,
    io_path: &Path,
    referrer: Option<&Path>,
) -> Result<Option<std::path::PathBuf>> {
    filesystem::detranslate(tracee, io_path, referrer)
}

/// Is `host_path` under the guest rootfs directly, as opposed to reachable
/// only through a binding?
pub fn belongs_to_guestfs(tracee: &Tracee, host_path: &Path) -> bool {
    tracee.fs.belongs_to_guestfs(host_path)
}

/// Enumerates `/proc/<pid>/fd/*` and emits an advisory log notice for each
/// entry. Per-entry failures (a fd closed mid-scan, a dangling `readlink`)
/// are swallowed and scanning continues; only a failure to open the
/// directory itself is fatal.
pub fn list_open_fd(pid: Pid) -> Result<()> {
    let fd_dir = format!("/proc/{}/fd", pid);
    let entries = std::fs::read_dir(&fd_dir)
        .map_err(|e| Error::operation_failed(format!("opening {}: {}", fd_dir, e)))?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        match std::fs::read_link(entry.path()) {
            Ok(target) => log::info!("pid {} fd {:?} -> {:?}", pid, entry.file_name(), target),
            Err(_) => continue,
        }
    }

    Ok(())
}
