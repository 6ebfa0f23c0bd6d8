//! Process discovery under a `/proc`-like root
//!
//! Every numeric directory is a process. The walk never descends into a
//! process directory (its `task/<tid>` entries are threads, not processes)
//! nor into non-numeric directories below the root.

use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::{DiscoveryError, NamespaceId, Pid};

use super::namespace::mount_namespace;

/// A process found during one walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessView {
    /// `<proc_root>/<pid>`
    pub path: PathBuf,
    pub pid: Pid,
    pub namespace: NamespaceId,
}

/// Walks a process root, yielding one [`ProcessView`] per live process
///
/// Each call to [`ProcessWalker::iter`] starts a fresh walk.
#[derive(Debug, Clone)]
pub struct ProcessWalker {
    proc_root: PathBuf,
}

impl ProcessWalker {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self { proc_root: proc_root.into() }
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    pub fn iter(&self) -> Processes {
        Processes {
            inner: WalkDir::new(&self.proc_root).follow_links(false).sort_by_file_name().into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a ProcessWalker {
    type Item = ProcessView;
    type IntoIter = Processes;

    fn into_iter(self) -> Processes {
        self.iter()
    }
}

/// Iterator returned by [`ProcessWalker::iter`]
pub struct Processes {
    inner: walkdir::IntoIter,
}

impl Iterator for Processes {
    type Item = ProcessView;

    fn next(&mut self) -> Option<ProcessView> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    // Vanished or unreadable entry, its subtree is skipped
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    debug!("{}", DiscoveryError::ProcRootUnreadable { path, source: e });
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let Some(pid) = entry.file_name().to_str().and_then(Pid::from_dir_name) else {
                // Keep walking from the root only
                if entry.depth() > 0 {
                    self.inner.skip_current_dir();
                }
                continue;
            };

            self.inner.skip_current_dir();

            let path = entry.into_path();
            match mount_namespace(&path) {
                Ok(namespace) => return Some(ProcessView { path, pid, namespace }),
                Err(e) => debug!("Skipping {pid}: {e}"),
            }
        }
    }
}
