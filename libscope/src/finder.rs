//! Host-wide shared library discovery
//!
//! Walks every process, collects the pathnames it maps, resolves each one to
//! the host filesystem and aggregates the results per (pathname, mount
//! namespace).

use log::{debug, info, warn};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::discovery::{
    read_shared_libraries, MountTableCache, PathFilter, PathResolver, ProcessView, ProcessWalker,
};
use crate::domain::{Library, LibraryKey, Pid};

/// Environment variable overriding the location of the host's `/proc`
pub const HOST_PROC_ENV: &str = "HOST_PROC";

const DEFAULT_PROC_ROOT: &str = "/proc";

/// The host's process root: `$HOST_PROC`, or `/proc`
pub fn host_proc() -> PathBuf {
    env::var_os(HOST_PROC_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT), PathBuf::from)
}

/// Find the host paths of all shared libraries mapped on the host, per mount namespace
///
/// Scans every `<host proc>/<pid>/maps`. With no filter every mapped pathname is reported.
pub fn find(filter: Option<&dyn PathFilter>) -> Vec<Library> {
    find_proc(host_proc(), filter)
}

/// Like [`find`], scanning `proc_root` instead of the host's `/proc`
pub fn find_proc(proc_root: impl Into<PathBuf>, filter: Option<&dyn PathFilter>) -> Vec<Library> {
    Finder::new(proc_root).find(filter)
}

/// Shared libraries mapped by a single process
pub fn from_pid(pid: Pid, filter: Option<&dyn PathFilter>) -> Vec<Library> {
    find_proc(host_proc().join(pid.0.to_string()), filter)
}

/// Reusable library finder
///
/// The host view (the mount table of process 1) is read once, when the finder
/// is built. `proc_root` may also name a single process directory such as
/// `/proc/1234`; the host view then comes from its parent.
#[derive(Debug)]
pub struct Finder {
    walker: ProcessWalker,
    resolver: Option<PathResolver>,
}

impl Finder {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        let proc_root = proc_root.into();
        let host_root = host_proc_root(&proc_root);

        let resolver = match PathResolver::from_proc_root(host_root) {
            Ok(resolver) if !resolver.host_table().is_empty() => Some(resolver),
            Ok(_) => {
                warn!("Host mount table under {} is empty, no library can be resolved", host_root.display());
                None
            }
            Err(e) => {
                warn!("{e}, no library can be resolved");
                None
            }
        };

        Self { walker: ProcessWalker::new(proc_root), resolver }
    }

    pub fn proc_root(&self) -> &Path {
        self.walker.proc_root()
    }

    /// Scan all processes for mapped pathnames accepted by `filter`
    ///
    /// Pathnames that cannot be resolved to a host path are left out. Order of
    /// the returned libraries is unspecified.
    pub fn find(&self, filter: Option<&dyn PathFilter>) -> Vec<Library> {
        let Some(resolver) = &self.resolver else {
            return Vec::new();
        };

        let mut cache = MountTableCache::new();
        let mut libraries: HashMap<LibraryKey, Library> = HashMap::new();
        let mut processes = 0usize;

        for process in &self.walker {
            processes += 1;
            scan_process(&process, filter, resolver, &mut cache, &mut libraries);
        }

        info!(
            "Found {} libraries in {} processes across {} mount namespaces",
            libraries.len(),
            processes,
            cache.len()
        );

        libraries.into_values().collect()
    }
}

fn scan_process(
    process: &ProcessView,
    filter: Option<&dyn PathFilter>,
    resolver: &PathResolver,
    cache: &mut MountTableCache,
    libraries: &mut HashMap<LibraryKey, Library>,
) {
    let pathnames = match read_shared_libraries(&process.path, filter) {
        Ok(pathnames) => pathnames,
        Err(e) => {
            debug!("Skipping {}: {e}", process.pid);
            return;
        }
    };

    for pathname in pathnames {
        let key = LibraryKey { pathname, namespace: process.namespace };

        if let Some(library) = libraries.get_mut(&key) {
            library.add_process(&process.path);
            continue;
        }

        let Some(ns_mounts) = cache.get_or_load(process.namespace, &process.path) else {
            // Nothing else mapped by this process can resolve either
            debug!("No mount table for {}, skipping its libraries", process.pid);
            return;
        };

        let Some(host_path) = resolver.resolve(Path::new(&key.pathname), ns_mounts) else {
            debug!("Cannot resolve {} of {} to a host path", key.pathname, process.pid);
            continue;
        };

        let library = Library::new(key.clone(), host_path, &process.path);
        libraries.insert(key, library);
    }
}

/// Directory holding process 1 for `proc_root`
fn host_proc_root(proc_root: &Path) -> &Path {
    let is_pid_dir =
        proc_root.file_name().and_then(|n| n.to_str()).and_then(Pid::from_dir_name).is_some();

    match proc_root.parent() {
        Some(parent) if is_pid_dir => parent,
        _ => proc_root,
    }
}
