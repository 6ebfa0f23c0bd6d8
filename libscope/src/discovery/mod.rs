//! # Shared Library Discovery Across Mount Namespaces
//!
//! Building blocks for finding every shared library mapped by processes on
//! the host, and for locating each one on the host filesystem.
//!
//! ## The Problem
//!
//! `/proc/<pid>/maps` reports pathnames as the process sees them. A process
//! in a container sees its own root filesystem, so `/usr/lib/libc.so.6` in
//! the container is usually a different file from `/usr/lib/libc.so.6` on the
//! host. To open the file the process actually mapped, the path must be
//! translated through the process's mount table into the host's.
//!
//! ## Pipeline
//!
//! ```text
//! walker     /proc/<pid> directories + mount namespace identity
//!    │
//!    ▼
//! maps       distinct pathnames mapped by the process
//!    │
//!    ▼
//! cache      mount table of the process's namespace (parsed once)
//!    │
//!    ▼
//! resolver   namespace path -> host path, against process 1's mounts
//! ```
//!
//! The [`crate::finder`] module drives the pipeline and aggregates results.
//!
//! ## Modules
//!
//! - **`mounts`**: `/proc/<pid>/mountinfo` parsing and longest-prefix lookup
//! - **`maps`**: `/proc/<pid>/maps` parsing and pathname filters
//! - **`namespace`**: mount namespace identity from `/proc/<pid>/ns/mnt`
//! - **`resolver`**: path translation between two mount tables
//! - **`walker`**: process enumeration
//! - **`cache`**: per-namespace mount table cache

pub mod cache;
pub mod maps;
pub mod mounts;
pub mod namespace;
pub mod resolver;
pub mod walker;

pub use cache::MountTableCache;
pub use maps::{all_libraries, parse_maps, read_shared_libraries, PathFilter};
pub use mounts::{Mount, MountTable};
pub use namespace::mount_namespace;
pub use resolver::{resolve, PathResolver};
pub use walker::{ProcessView, ProcessWalker, Processes};
