//! Structured error types for libscope
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! None of these reach callers of the `find*` functions: the finder logs them
//! and drops the process or pathname concerned.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to read mount table {}: {source}", .path.display())]
    MountInfoUnavailable { path: PathBuf, source: std::io::Error },

    #[error("Failed to read memory maps {}: {source}", .path.display())]
    MapsUnavailable { path: PathBuf, source: std::io::Error },

    #[error("Failed to stat mount namespace {}: {source}", .path.display())]
    NamespaceUnavailable { path: PathBuf, source: std::io::Error },

    #[error("Failed to walk process root {}: {source}", .path.display())]
    ProcRootUnreadable { path: PathBuf, source: walkdir::Error },
}
