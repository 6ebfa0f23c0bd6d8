//! Translation of namespaced paths into host paths
//!
//! A path seen by a process lives on some mount of that process's namespace.
//! The same filesystem instance (same `major:minor`) is usually mounted
//! somewhere in the host namespace too, possibly exposing a shallower root.
//! Resolution finds that host mount and re-applies the root offset:
//!
//! ```text
//! container:  253:0  root=/var/lib/containers/X/diff  at /
//! host:       253:0  root=/                           at /
//!
//! /etc/lib.so  ->  / + var/lib/containers/X/diff + etc/lib.so
//! ```
//!
//! Only host mounts whose root is a prefix of the namespace mount's root are
//! considered. A namespace mount exposing a shallower root than every host
//! mount of the same device does not resolve.

use std::path::{Path, PathBuf};

use crate::domain::DiscoveryError;

use super::mounts::{Mount, MountTable};

/// Resolves paths against the host view, the mount table of process 1
#[derive(Debug, Clone)]
pub struct PathResolver {
    host: MountTable,
}

impl PathResolver {
    pub fn new(host: MountTable) -> Self {
        Self { host }
    }

    /// Build the host view from `<proc_root>/1/mountinfo`
    ///
    /// # Errors
    /// Returns an error if the mount table of process 1 cannot be read
    pub fn from_proc_root(proc_root: &Path) -> Result<Self, DiscoveryError> {
        MountTable::read(&proc_root.join("1")).map(Self::new)
    }

    pub fn host_table(&self) -> &MountTable {
        &self.host
    }

    /// Resolve `path`, as seen through `ns_mounts`, to the host path
    pub fn resolve(&self, path: &Path, ns_mounts: &MountTable) -> Option<PathBuf> {
        resolve(path, ns_mounts, &self.host)
    }
}

/// Resolve `path`, as seen through `ns_mounts`, against `host_mounts`
///
/// Returns `None` when no mount of `ns_mounts` governs `path`, or when the
/// filesystem holding it is not reachable from `host_mounts`.
pub fn resolve(path: &Path, ns_mounts: &MountTable, host_mounts: &MountTable) -> Option<PathBuf> {
    let ns_mount = ns_mounts.get_mount(path)?;
    let rel = path.strip_prefix(&ns_mount.mount_point).ok()?;

    let host_mount = find_host_mount(ns_mount, host_mounts)?;
    let root_rel = ns_mount.root.strip_prefix(&host_mount.root).ok()?;

    let mut host_path = host_mount.mount_point.clone();
    for component in root_rel.components().chain(rel.components()) {
        host_path.push(component);
    }
    Some(host_path)
}

/// Host mount of the same filesystem exposing `ns_mount.root` or an ancestor of it.
/// The identical mount wins, otherwise the first in table order.
fn find_host_mount<'a>(ns_mount: &Mount, host_mounts: &'a MountTable) -> Option<&'a Mount> {
    let mut candidates = host_mounts
        .mounts()
        .iter()
        .filter(|m| m.dev == ns_mount.dev && ns_mount.root.starts_with(&m.root));

    let first = candidates.next()?;
    if first == ns_mount {
        return Some(first);
    }
    Some(candidates.find(|m| *m == ns_mount).unwrap_or(first))
}
