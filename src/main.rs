use std::path::Path;

use nix::unistd::getpid;
use vrootfs::constants::AT_FDCWD;
use vrootfs::filesystem::{FileSystem, Initialiser};
use vrootfs::{cli, translate, Tracee};

fn main() {
    env_logger::init();

    let mut fs = FileSystem::new();
    cli::parse_config(&mut fs);

    if let Err(err) = fs.initialize() {
        log::warn!("failed to initialize guest filesystem: {}", err);
    }

    let tracee = Tracee::new(getpid(), fs);

    // Demonstrate the public translation API on a couple of guest paths.
    // A real supervisor would instead call `translate`/`detranslate` once
    // per path-carrying syscall it traces.
    for fake_path in &["/bin/sh", "/etc/passwd"] {
        match translate(&tracee, AT_FDCWD, Path::new(fake_path), true) {
            Ok(host_path) => println!("{} -> {}", fake_path, host_path.display()),
            Err(err) => eprintln!("{} -> error: {}", fake_path, err),
        }
    }
}
