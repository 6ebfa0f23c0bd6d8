//! Pre-flight checks for libscope
//!
//! Validates the process root before scanning it. Provides clear, actionable
//! error messages when requirements aren't met.

#![allow(unsafe_code)] // geteuid() requires unsafe

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Run all pre-flight checks before scanning `proc_root`
///
/// `proc_root` may be a process root such as `/proc` or a single process
/// directory such as `/proc/1234`; `host_root` is where process 1 lives.
pub fn run_preflight_checks(proc_root: &Path, host_root: &Path, quiet: bool) -> Result<()> {
    check_proc_root(proc_root)?;
    check_host_view(host_root)?;
    if !quiet {
        warn_if_unprivileged();
    }
    Ok(())
}

/// Check that the process root exists and is a directory
fn check_proc_root(proc_root: &Path) -> Result<()> {
    if !proc_root.exists() {
        bail!(
            "Process root not found: {}\n\n\
             Set --proc-root (or HOST_PROC) to the host's /proc mount.",
            proc_root.display()
        );
    }
    if !proc_root.is_dir() {
        bail!("Not a directory: {}", proc_root.display());
    }
    Ok(())
}

/// Check that the host mount table (process 1) is readable
fn check_host_view(host_root: &Path) -> Result<()> {
    let mountinfo = host_root.join("1").join("mountinfo");
    std::fs::read_to_string(&mountinfo).with_context(|| {
        format!(
            "Cannot read {}\n\n\
             The mount table of process 1 is the host view every library path is\n\
             resolved against. This usually means:\n\
             - Permission denied (run with sudo)\n\
             - The process root is not a /proc mount",
            mountinfo.display()
        )
    })?;
    Ok(())
}

/// Other users' memory maps are only readable by root
fn warn_if_unprivileged() {
    if unsafe { libc::geteuid() } != 0 {
        eprintln!("warning: not running as root, processes of other users will be skipped");
    }
}
