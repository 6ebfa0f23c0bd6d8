//! Rendering of discovered libraries
//!
//! Plain text for terminals, JSON for other tools. Both sort libraries by
//! host path, then pathname, so repeated scans diff cleanly.

use anyhow::Result;
use std::io::Write;

use crate::domain::Library;

/// Sort libraries into display order
pub fn sort_libraries(libraries: &mut [Library]) {
    libraries.sort_by(|a, b| a.host_path.cmp(&b.host_path).then_with(|| a.key.cmp(&b.key)));
}

/// Write one block per library
///
/// ```text
/// /var/lib/containers/X/diff/usr/lib/libc.so
///     pathname:  /usr/lib/libc.so
///     namespace: 4:4026532561
///     process:   /proc/138039
/// ```
///
/// # Errors
/// Returns an error if writing to `out` fails
pub fn write_plain<W: Write>(out: &mut W, libraries: &[Library]) -> Result<()> {
    for library in libraries {
        writeln!(out, "{}", library.host_path.display())?;
        writeln!(out, "    pathname:  {}", library.pathname())?;
        writeln!(out, "    namespace: {}", library.namespace())?;
        for pid_path in &library.pids_path {
            writeln!(out, "    process:   {}", pid_path.display())?;
        }
    }
    Ok(())
}

/// Write libraries as a pretty-printed JSON array
///
/// # Errors
/// Returns an error if serialization or writing to `out` fails
pub fn write_json<W: Write>(out: &mut W, libraries: &[Library]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, libraries)?;
    writeln!(out)?;
    Ok(())
}
