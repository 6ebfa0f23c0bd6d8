//! Shared library extraction from `/proc/<pid>/maps`
//!
//! A shared library is typically mapped several times (code, rodata, data,
//! bss), so the parser reduces the mappings of a process to the set of
//! distinct pathnames:
//!
//! ```text
//! 7f135146b000-7f135147a000 r--p 00000000 fd:00 268743 /usr/lib/x86_64-linux-gnu/libm-2.31.so
//! 7f135147a000-7f1351521000 r-xp 0000f000 fd:00 268743 /usr/lib/x86_64-linux-gnu/libm-2.31.so
//! 7f1351521000-7f13515b8000 r--p 000b6000 fd:00 268743 /usr/lib/x86_64-linux-gnu/libm-2.31.so
//! 7ffe712a4000-7ffe712c5000 rw-p 00000000 00:00 0      [stack]
//! ```
//!
//! yields `["/usr/lib/x86_64-linux-gnu/libm-2.31.so"]`.

use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use crate::domain::DiscoveryError;

/// `start-end perms offset dev inode pathname`
const MIN_MAPS_FIELDS: usize = 6;
const PATHNAME_FIELD: usize = 5;

/// A predicate over library pathnames
pub trait PathFilter {
    fn matches(&self, pathname: &str) -> bool;
}

impl PathFilter for Regex {
    fn matches(&self, pathname: &str) -> bool {
        self.is_match(pathname)
    }
}

impl<T: PathFilter + ?Sized> PathFilter for &T {
    fn matches(&self, pathname: &str) -> bool {
        (**self).matches(pathname)
    }
}

/// Filter matching shared objects: `libfoo.so`, `libfoo.so.1.2`, ...
pub fn all_libraries() -> &'static Regex {
    static ALL_LIBRARIES: OnceLock<Regex> = OnceLock::new();
    ALL_LIBRARIES.get_or_init(|| Regex::new(r"\.so($|\.)").expect("valid shared object pattern"))
}

/// Read the distinct pathnames mapped by the process at `pid_path`
///
/// # Errors
/// Returns an error if `<pid_path>/maps` cannot be opened
pub fn read_shared_libraries(
    pid_path: &Path,
    filter: Option<&dyn PathFilter>,
) -> Result<Vec<String>, DiscoveryError> {
    let path = pid_path.join("maps");
    let file =
        File::open(&path).map_err(|source| DiscoveryError::MapsUnavailable { path, source })?;
    Ok(parse_maps(BufReader::new(file), filter))
}

/// Extract distinct pathnames from a maps stream, keeping those accepted by
/// `filter` (all of them when `None`). Anonymous mappings and pseudo-paths
/// such as `[heap]` are never returned. Order is unspecified.
pub fn parse_maps<R: BufRead>(reader: R, filter: Option<&dyn PathFilter>) -> Vec<String> {
    let mut seen = HashSet::new();

    for line in reader.split(b'\n') {
        let Ok(line) = line else { break };
        let line = String::from_utf8_lossy(&line);

        let Some(pathname) = line.split_whitespace().nth(PATHNAME_FIELD) else {
            continue;
        };
        if pathname.starts_with('[') || seen.contains(pathname) {
            continue;
        }
        seen.insert(pathname.to_string());
    }

    seen.into_iter().filter(|lib| filter.map_or(true, |f| f.matches(lib))).collect()
}
