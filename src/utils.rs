#[cfg(test)]
pub mod tests {
    use std::fs;
    use std::os::unix::fs::symlink;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// Builds a disposable rootfs fixture on disk and returns its path.
    ///
    /// The underlying `TempDir` is intentionally leaked (`into_path`)
    /// rather than cleaned up: each test process is short-lived and the
    /// fixture only needs to outlive the single test that built it.
    /// Layout, mirrored by the canonicalizer/translator/detranslator
    /// tests:
    ///
    /// - `bin/sleep`, `bin/true`: executable regular files.
    /// - `bin/sh`: a symlink to `true`.
    /// - `lib/`: a directory; `lib64` is a symlink to it.
    /// - `loop`: a symlink to itself, for exercising the dereference bound.
    /// - `etc/passwd`: a regular file.
    /// - `usr-bin/true`: a second executable, used as an alternate binding
    ///   target distinct from `bin/`.
    pub fn get_test_rootfs() -> PathBuf {
        let dir = tempfile::tempdir()
            .expect("create temp rootfs")
            .into_path();

        fs::create_dir_all(dir.join("bin")).unwrap();
        fs::create_dir_all(dir.join("etc")).unwrap();
        fs::create_dir_all(dir.join("home")).unwrap();
        fs::create_dir_all(dir.join("lib")).unwrap();
        fs::create_dir_all(dir.join("usr-bin")).unwrap();

        fs::write(dir.join("bin/sleep"), b"#!/bin/sh\n").unwrap();
        fs::write(dir.join("bin/true"), b"#!/bin/sh\n").unwrap();
        fs::write(dir.join("usr-bin/true"), b"#!/bin/sh\n").unwrap();
        fs::write(dir.join("etc/passwd"), b"root:x:0:0:root:/root:/bin/sh\n").unwrap();

        for exe in &["bin/sleep", "bin/true", "usr-bin/true"] {
            let path = dir.join(exe);
            let mut perms = fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).unwrap();
        }

        symlink("true", dir.join("bin/sh")).unwrap();
        symlink("lib", dir.join("lib64")).unwrap();
        symlink("loop", dir.join("loop")).unwrap();

        dir
    }
}
