//! Mount namespace identity of a process
//!
//! `/proc/<pid>/ns/mnt` is a handle on the process's mount namespace. Its
//! device and inode numbers are equal for every process sharing that
//! namespace.

use std::fs::File;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::domain::{DiscoveryError, NamespaceId};

const MNT_NS_PATH: &str = "ns/mnt";

/// Identify the mount namespace of the process at `pid_path`
///
/// The handle is opened read-only, stat'ed through the open descriptor and
/// closed before returning.
///
/// # Errors
/// Returns an error if the namespace handle cannot be opened or stat'ed
pub fn mount_namespace(pid_path: &Path) -> Result<NamespaceId, DiscoveryError> {
    let path = pid_path.join(MNT_NS_PATH);
    let metadata = File::open(&path)
        .and_then(|file| file.metadata())
        .map_err(|source| DiscoveryError::NamespaceUnavailable { path, source })?;

    Ok(NamespaceId { dev: metadata.dev(), ino: metadata.ino() })
}
