//! Per-tracee context. Only the fields the translation engine's public API
//! needs are kept here: the numeric pid used to resolve `dir_fd`-relative
//! anchors through `/proc`, the guest filesystem (rootfs + binding table +
//! cwd), and the extension hooks. Everything ptrace-specific (registers,
//! restart method, seccomp state) belongs to the supervisor, which is out
//! of scope here.

use std::sync::Arc;

use nix::unistd::Pid;

use crate::extension::ExtensionRegistry;
use crate::filesystem::FileSystem;

pub struct Tracee {
    /// Host pid of the tracee; `Pid::from_raw(0)` before it has run, in
    /// which case anchor resolution falls back to the tracer's own pid.
    pub pid: Pid,
    pub fs: FileSystem,
    pub extensions: Arc<ExtensionRegistry>,
}

impl Tracee {
    pub fn new(pid: Pid, fs: FileSystem) -> Tracee {
        Tracee {
            pid,
            fs,
            extensions: Arc::new(ExtensionRegistry::new()),
        }
    }

    pub fn with_extensions(pid: Pid, fs: FileSystem, extensions: Arc<ExtensionRegistry>) -> Tracee {
        Tracee {
            pid,
            fs,
            extensions,
        }
    }

    /// The pid to resolve `/proc/<pid>/...` anchors against: the tracee's
    /// own pid once it has started, or the tracer's pid beforehand.
    pub fn anchor_pid(&self) -> Pid {
        if self.pid.as_raw() == 0 {
            nix::unistd::getpid()
        } else {
            self.pid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_pid_falls_back_to_tracer() {
        let tracee = Tracee::new(Pid::from_raw(0), FileSystem::new());
        assert_eq!(tracee.anchor_pid(), nix::unistd::getpid());
    }

    #[test]
    fn anchor_pid_uses_own_pid_once_started() {
        let tracee = Tracee::new(Pid::from_raw(42), FileSystem::new());
        assert_eq!(tracee.anchor_pid(), Pid::from_raw(42));
    }
}
