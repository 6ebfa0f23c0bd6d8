//! # libscope - Shared Library Discovery Across Mount Namespaces
//!
//! libscope finds every file mapped into memory by the processes of a Linux
//! host, typically shared libraries, and tells where each one lives on the
//! host filesystem, even when the process runs in a container with its own
//! mount namespace.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      /proc (or $HOST_PROC)                      │
//! │   <pid>/maps        <pid>/mountinfo        <pid>/ns/mnt         │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         libscope                                │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │    Walker    │──▶│     Maps     │──▶│   Resolver   │         │
//! │  │ (processes)  │   │ (pathnames)  │   │ (host paths) │         │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘         │
//! │                                               │                 │
//! │                      ┌──────────────┐         │                 │
//! │                      │ Mount table  │◀────────┘                 │
//! │                      │ cache (ns)   │                           │
//! │                      └──────────────┘                           │
//! │                                                                 │
//! │  Finder: aggregates per (pathname, mount namespace)             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`discovery`]: `/proc` parsing, namespace identity and path resolution
//! - [`finder`]: the scan driver and the [`find`], [`find_proc`] and
//!   [`from_pid`] entry points
//! - [`domain`]: core domain types (`Pid`, `NamespaceId`, `Library`) and errors
//! - [`output`]: plain text and JSON rendering
//! - [`preflight`]: checks run by the CLI before scanning
//! - [`cli`]: command-line argument parsing
//!
//! ## Typical Usage
//!
//! ```rust,no_run
//! use libscope::{all_libraries, find};
//!
//! for lib in find(Some(all_libraries())) {
//!     println!("{} -> {}", lib.pathname(), lib.host_path.display());
//! }
//! ```
//!
//! Scanning is best-effort: processes exiting mid-scan, unreadable files and
//! paths unreachable from the host are skipped. The worst outcome is an empty
//! list, never an error.

pub mod cli;
pub mod discovery;
pub mod domain;
pub mod finder;
pub mod output;
pub mod preflight;

pub use discovery::{all_libraries, PathFilter};
pub use domain::{Library, LibraryKey, NamespaceId, Pid};
pub use finder::{find, find_proc, from_pid, Finder};
