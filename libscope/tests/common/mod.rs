//! Synthetic process roots for integration tests
//!
//! Processes sharing a mount namespace get hard links to the same `ns/mnt`
//! handle, so they share device and inode exactly like the real thing.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Host mount table: one ext4 root filesystem, plus /proc
pub const HOST_MOUNTINFO: &str = "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw
23 22 0:21 / /proc rw,nosuid,nodev,noexec,relatime shared:12 - proc proc rw
24 22 0:22 / /tmp rw,nosuid,nodev shared:13 - tmpfs tmpfs rw
";

/// Container whose root is a directory of the host's root filesystem
pub const CONTAINER_MOUNTINFO: &str = "\
599 553 8:1 /var/lib/containers/X/diff / rw,relatime master:1 - ext4 /dev/sda1 rw
600 599 0:55 / /proc rw,nosuid,nodev,noexec,relatime - proc proc rw
601 599 0:56 / /dev rw,nosuid - tmpfs tmpfs rw,size=65536k,mode=755
";

pub struct ProcFs {
    dir: TempDir,
}

impl ProcFs {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("handles")).expect("Failed to create handles dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn pid_path(&self, pid: u32) -> PathBuf {
        self.root().join(pid.to_string())
    }

    /// Add process `pid` in mount namespace `namespace` (any name; equal names share it)
    pub fn add_process(&self, pid: u32, namespace: &str, mountinfo: Option<&str>, libraries: &[&str]) -> PathBuf {
        let pid_path = self.pid_path(pid);
        fs::create_dir_all(pid_path.join("ns")).expect("Failed to create process dir");

        let handle = self.root().join("handles").join(namespace);
        if !handle.exists() {
            fs::write(&handle, namespace).expect("Failed to create namespace handle");
        }
        fs::hard_link(&handle, pid_path.join("ns/mnt")).expect("Failed to link namespace handle");

        if let Some(mountinfo) = mountinfo {
            fs::write(pid_path.join("mountinfo"), mountinfo).expect("Failed to write mountinfo");
        }
        fs::write(pid_path.join("maps"), maps_for(libraries)).expect("Failed to write maps");

        // Threads look like processes but must never be reported as such
        fs::create_dir_all(pid_path.join("task").join(pid.to_string())).expect("Failed to create task dir");

        pid_path
    }
}

/// A maps file mapping each library three times, with anonymous regions around
pub fn maps_for(libraries: &[&str]) -> String {
    let mut maps = String::new();
    let mut addr: u64 = 0x7f17_8d0a_6000;
    for (inode, lib) in libraries.iter().enumerate() {
        for (perms, offset) in [("r--p", 0x0), ("r-xp", 0x25000), ("rw-p", 0x1ea000)] {
            maps.push_str(&format!(
                "{:x}-{:x} {perms} {offset:08x} fd:00 {}                     {lib}\n",
                addr,
                addr + 0x1000,
                268_741 + inode
            ));
            addr += 0x1000;
        }
        maps.push_str(&format!("{:x}-{:x} rw-p 00000000 00:00 0\n", addr, addr + 0x1000));
        addr += 0x1000;
    }
    maps.push_str("7ffe712a4000-7ffe712c5000 rw-p 00000000 00:00 0                          [stack]\n");
    maps.push_str("7ffe7131a000-7ffe7131b000 r-xp 00000000 00:00 0                          [vdso]\n");
    maps
}
