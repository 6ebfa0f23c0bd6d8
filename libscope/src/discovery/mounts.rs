//! Mount table parsing for `/proc/<pid>/mountinfo`
//!
//! Each line of mountinfo describes one mount visible from the reading
//! process's mount namespace:
//!
//! ```text
//! 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
//! (1)(2)(3)   (4)   (5)      (6)      (7)   (8) (9)   (10)         (11)
//! ```
//!
//! Only (3) `major:minor`, (4) the root of the mount within its filesystem
//! and (5) the mount point are kept. See proc(5) for the remaining fields.

use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::domain::DiscoveryError;

/// Lines with fewer fields are not mountinfo entries
const MIN_MOUNTINFO_FIELDS: usize = 10;

const DEV_FIELD: usize = 2;
const ROOT_FIELD: usize = 3;
const MOUNT_POINT_FIELD: usize = 4;

/// One mountinfo entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    /// `major:minor` of the filesystem instance, kept as text
    pub dev: String,
    /// Path within the filesystem grafted at `mount_point`
    pub root: PathBuf,
    pub mount_point: PathBuf,
}

impl Mount {
    pub fn new(dev: impl Into<String>, root: impl Into<PathBuf>, mount_point: impl Into<PathBuf>) -> Self {
        Self { dev: dev.into(), root: root.into(), mount_point: mount_point.into() }
    }
}

/// Mounts visible from one mount namespace, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountTable {
    mounts: Vec<Mount>,
}

impl MountTable {
    pub fn new(mounts: Vec<Mount>) -> Self {
        Self { mounts }
    }

    /// Read `<pid_path>/mountinfo`
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened (process exited, permission denied)
    pub fn read(pid_path: &Path) -> Result<Self, DiscoveryError> {
        let path = pid_path.join("mountinfo");
        let file = File::open(&path)
            .map_err(|source| DiscoveryError::MountInfoUnavailable { path, source })?;
        Ok(Self::parse(BufReader::new(file)))
    }

    /// Parse a mountinfo stream, skipping malformed lines
    pub fn parse<R: BufRead>(reader: R) -> Self {
        let mut mounts: Vec<Mount> = Vec::with_capacity(32);

        for line in reader.split(b'\n') {
            // A read error mid-stream (process exited) ends the table
            let Ok(line) = line else { break };
            let line = String::from_utf8_lossy(&line);

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < MIN_MOUNTINFO_FIELDS {
                continue;
            }

            let mount = Mount {
                dev: fields[DEV_FIELD].to_string(),
                root: PathBuf::from(unescape(fields[ROOT_FIELD])),
                mount_point: PathBuf::from(unescape(fields[MOUNT_POINT_FIELD])),
            };

            if mounts.contains(&mount) {
                debug!("Duplicate mountinfo entry for {}", mount.mount_point.display());
                continue;
            }
            mounts.push(mount);
        }

        Self { mounts }
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    /// Find the mount governing `path`: the one whose mount point is the
    /// longest component-wise prefix of it
    pub fn get_mount(&self, path: &Path) -> Option<&Mount> {
        let mut best: Option<&Mount> = None;
        for mount in &self.mounts {
            if !path.starts_with(&mount.mount_point) {
                continue;
            }
            let longer = best.map_or(true, |b| {
                mount.mount_point.as_os_str().len() > b.mount_point.as_os_str().len()
            });
            if longer {
                best = Some(mount);
            }
        }
        best
    }
}

/// Decode the octal escapes the kernel applies to mountinfo paths
/// (`\040` space, `\011` tab, `\012` newline, `\134` backslash)
fn unescape(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal_escape(&bytes[i + 1..i + 4]) {
            let value = (bytes[i + 1] - b'0') * 64 + (bytes[i + 2] - b'0') * 8 + (bytes[i + 3] - b'0');
            out.push(value);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal_escape(digits: &[u8]) -> bool {
    // Largest single-byte value is \377
    matches!(digits, [b'0'..=b'3', b'0'..=b'7', b'0'..=b'7'])
}
