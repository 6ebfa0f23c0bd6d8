//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "libscope",
    about = "List shared libraries in use on the host, per mount namespace",
    after_help = "\
EXAMPLES:
    sudo libscope                            All mapped files of all processes
    sudo libscope --all-libraries            Shared objects only
    sudo libscope --pid 1234 -f 'libssl'     Libraries of one process matching a regex
    libscope --proc-root /host/proc --json   Scan a host /proc mounted in a container"
)]
pub struct Args {
    /// Process root to scan
    #[arg(long, value_name = "DIR", env = "HOST_PROC", default_value = "/proc")]
    pub proc_root: PathBuf,

    /// Only scan this process
    #[arg(short, long)]
    pub pid: Option<u32>,

    /// Only report pathnames matching this regular expression
    #[arg(short, long, value_name = "REGEX", conflicts_with = "all_libraries")]
    pub filter: Option<String>,

    /// Only report shared objects (*.so, *.so.*)
    #[arg(long)]
    pub all_libraries: bool,

    /// Emit JSON instead of the plain listing
    #[arg(long)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Directory to walk: the process root, or one process directory under it
    pub fn scan_root(&self) -> PathBuf {
        match self.pid {
            Some(pid) => self.proc_root.join(pid.to_string()),
            None => self.proc_root.clone(),
        }
    }
}
