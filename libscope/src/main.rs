//! # libscope - Main Entry Point
//!
//! Scans a process root and prints the shared libraries in use, with the
//! host path of each and the processes mapping it.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use regex::Regex;
use std::io::{self, BufWriter, Write};

use libscope::cli::Args;
use libscope::discovery::{all_libraries, PathFilter};
use libscope::finder::Finder;
use libscope::output::{sort_libraries, write_json, write_plain};
use libscope::preflight::run_preflight_checks;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.is::<regex::Error>()) {
        return EXIT_USAGE;
    }
    let denied = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::PermissionDenied);
    if denied {
        EXIT_NOPERM
    } else {
        EXIT_ERROR
    }
}


fn run() -> Result<()> {
    let args = Args::parse();

    let filter: Option<Regex> = match args.filter.as_deref() {
        Some(pattern) => Some(Regex::new(pattern)?),
        None => None,
    };
    let filter: Option<&dyn PathFilter> = if args.all_libraries {
        Some(all_libraries())
    } else {
        filter.as_ref().map(|f| f as &dyn PathFilter)
    };

    let scan_root = args.scan_root();
    run_preflight_checks(&scan_root, &args.proc_root, args.quiet)?;

    info!("Scanning {}", scan_root.display());
    let finder = Finder::new(&scan_root);
    let mut libraries = finder.find(filter);
    sort_libraries(&mut libraries);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        write_json(&mut out, &libraries)?;
    } else {
        write_plain(&mut out, &libraries)?;
    }
    out.flush().context("Failed to write output")?;

    if !args.quiet && !args.json {
        let processes: usize = libraries.iter().map(|l| l.pids_path.len()).sum();
        eprintln!("{} libraries, {} process references", libraries.len(), processes);
    }

    Ok(())
}
