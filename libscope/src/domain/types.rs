//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep process ids, namespace identities and library
//! keys apart in function signatures.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Process ID
///
/// Represents a process ID as found in a `/proc/<pid>` directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pid(pub u32);

impl Pid {
    /// Parse a process directory name. Only plain non-negative decimals qualify.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        name.parse().ok().map(Pid)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID:{}", self.0)
    }
}

/// Mount namespace identity
///
/// Device and inode of the `ns/mnt` handle of a process. Two processes with
/// equal identities share a mount namespace, and therefore a mount table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NamespaceId {
    pub dev: u64,
    pub ino: u64,
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dev, self.ino)
    }
}

/// A library pathname as seen from one mount namespace
///
/// The same pathname in two namespaces is two keys, since each may resolve to
/// a different file on the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LibraryKey {
    pub pathname: String,
    pub namespace: NamespaceId,
}

/// A shared library in use somewhere on the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Library {
    #[serde(flatten)]
    pub key: LibraryKey,
    /// Path of the library as seen from the host root mount namespace
    pub host_path: PathBuf,
    /// Process directories (`<proc>/<pid>`) mapping this library, first seen first
    pub pids_path: Vec<PathBuf>,
}

impl Library {
    pub(crate) fn new(key: LibraryKey, host_path: PathBuf, pid_path: &Path) -> Self {
        Self { key, host_path, pids_path: vec![pid_path.to_path_buf()] }
    }

    /// Path of the library as seen by the processes mapping it
    pub fn pathname(&self) -> &str {
        &self.key.pathname
    }

    pub fn namespace(&self) -> NamespaceId {
        self.key.namespace
    }

    /// Record another process mapping this library. Returns false if it was already known.
    pub(crate) fn add_process(&mut self, pid_path: &Path) -> bool {
        if self.pids_path.iter().any(|p| p == pid_path) {
            return false;
        }
        self.pids_path.push(pid_path.to_path_buf());
        true
    }
}
