mod common;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use common::{ProcFs, CONTAINER_MOUNTINFO, HOST_MOUNTINFO};
use libscope::{all_libraries, find_proc, Finder, Library, LibraryKey};
use regex::Regex;

const LIBC: &str = "/usr/lib/libc.so";

/// Library keys mapped to (host path, referencing processes)
fn index(libraries: &[Library]) -> BTreeMap<LibraryKey, (PathBuf, BTreeSet<PathBuf>)> {
    libraries
        .iter()
        .map(|l| (l.key.clone(), (l.host_path.clone(), l.pids_path.iter().cloned().collect())))
        .collect()
}

fn host_paths(libraries: &[Library]) -> BTreeSet<String> {
    libraries.iter().map(|l| l.host_path.to_string_lossy().into_owned()).collect()
}

#[test]
fn test_host_and_container_process() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    procfs.add_process(138_039, "container", Some(CONTAINER_MOUNTINFO), &[LIBC]);

    let libraries = find_proc(procfs.root(), None);

    assert_eq!(libraries.len(), 2);
    assert!(libraries.iter().all(|l| l.pathname() == LIBC));
    assert_ne!(libraries[0].namespace(), libraries[1].namespace());
    assert_eq!(
        host_paths(&libraries),
        BTreeSet::from([
            "/usr/lib/libc.so".to_string(),
            "/var/lib/containers/X/diff/usr/lib/libc.so".to_string(),
        ])
    );

    let container = libraries.iter().find(|l| l.host_path.starts_with("/var")).unwrap();
    assert_eq!(container.pids_path, vec![procfs.pid_path(138_039)]);
}

#[test]
fn test_same_namespace_is_one_record() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    procfs.add_process(2211, "host", Some(HOST_MOUNTINFO), &[LIBC, "/usr/bin/bash"]);

    let libraries = find_proc(procfs.root(), None);
    let libc: Vec<&Library> = libraries.iter().filter(|l| l.pathname() == LIBC).collect();

    assert_eq!(libc.len(), 1);
    assert_eq!(
        libc[0].pids_path.iter().collect::<BTreeSet<_>>(),
        BTreeSet::from([&procfs.pid_path(1), &procfs.pid_path(2211)])
    );
}

#[test]
fn test_container_siblings_share_record() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    procfs.add_process(138_039, "container", Some(CONTAINER_MOUNTINFO), &[LIBC]);
    procfs.add_process(138_112, "container", Some(CONTAINER_MOUNTINFO), &[LIBC]);

    let libraries = find_proc(procfs.root(), None);
    assert_eq!(libraries.len(), 2);

    let container = libraries.iter().find(|l| l.host_path.starts_with("/var")).unwrap();
    assert_eq!(container.pids_path.len(), 2);
}

#[test]
fn test_all_libraries_filter() {
    let procfs = ProcFs::new();
    procfs.add_process(
        1,
        "host",
        Some(HOST_MOUNTINFO),
        &["/usr/lib/systemd/systemd", "/usr/lib/libz.so.1.2.11", "/usr/lib/locale/locale-archive"],
    );

    let pathnames: BTreeSet<String> = find_proc(procfs.root(), Some(all_libraries()))
        .into_iter()
        .map(|l| l.key.pathname)
        .collect();
    assert_eq!(pathnames, BTreeSet::from(["/usr/lib/libz.so.1.2.11".to_string()]));
}

#[test]
fn test_regex_filter() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC, "/usr/lib/libssl.so.1.1"]);

    let filter = Regex::new("libssl").unwrap();
    let libraries = find_proc(procfs.root(), Some(&filter));
    assert_eq!(libraries.len(), 1);
    assert_eq!(libraries[0].pathname(), "/usr/lib/libssl.so.1.1");
}

#[test]
fn test_unresolvable_paths_dropped() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    // /scratch is a tmpfs private to the container, invisible from the host
    let mountinfo = format!("{CONTAINER_MOUNTINFO}602 599 0:77 / /scratch rw - tmpfs tmpfs rw\n");
    procfs.add_process(500, "container", Some(&mountinfo), &["/scratch/libjit.so", LIBC]);

    let libraries = find_proc(procfs.root(), None);
    assert!(libraries.iter().all(|l| l.pathname() != "/scratch/libjit.so"));
    assert_eq!(libraries.len(), 2);
}

#[test]
fn test_process_without_maps_skipped() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    let gone = procfs.add_process(77, "host", Some(HOST_MOUNTINFO), &["/usr/lib/libgone.so"]);
    std::fs::remove_file(gone.join("maps")).unwrap();

    let libraries = find_proc(procfs.root(), None);
    assert_eq!(libraries.len(), 1);
    assert_eq!(libraries[0].pids_path, vec![procfs.pid_path(1)]);
}

#[test]
fn test_namespace_table_from_any_sibling() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    // First container process lost its mountinfo; its sibling still provides the table
    procfs.add_process(300, "container", None, &[LIBC]);
    procfs.add_process(301, "container", Some(CONTAINER_MOUNTINFO), &[LIBC]);

    let libraries = find_proc(procfs.root(), None);
    let container = libraries.iter().find(|l| l.host_path.starts_with("/var")).unwrap();
    assert_eq!(container.pids_path, vec![procfs.pid_path(301)]);
}

#[test]
fn test_find_is_deterministic() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC, "/usr/lib/libm.so.6"]);
    procfs.add_process(2211, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    procfs.add_process(138_039, "container", Some(CONTAINER_MOUNTINFO), &[LIBC, "/usr/lib/ld.so"]);

    let finder = Finder::new(procfs.root());
    assert_eq!(index(&finder.find(None)), index(&finder.find(None)));
    assert_eq!(finder.find(None).len(), 4);
}

#[test]
fn test_single_process_root() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    procfs.add_process(138_039, "container", Some(CONTAINER_MOUNTINFO), &[LIBC, "/usr/lib/ld.so"]);

    let libraries = find_proc(procfs.pid_path(138_039), None);
    assert_eq!(
        host_paths(&libraries),
        BTreeSet::from([
            "/var/lib/containers/X/diff/usr/lib/ld.so".to_string(),
            "/var/lib/containers/X/diff/usr/lib/libc.so".to_string(),
        ])
    );
    assert!(libraries.iter().all(|l| l.pids_path == vec![procfs.pid_path(138_039)]));
}

#[test]
fn test_no_host_view() {
    let procfs = ProcFs::new();
    procfs.add_process(1, "host", None, &[LIBC]);
    procfs.add_process(2, "host", Some(HOST_MOUNTINFO), &[LIBC]);

    assert!(find_proc(procfs.root(), None).is_empty());
}

#[test]
fn test_threads_are_not_processes() {
    let procfs = ProcFs::new();
    let init = procfs.add_process(1, "host", Some(HOST_MOUNTINFO), &[LIBC]);
    // A thread directory with its own maps would be reported if walked into
    let thread = init.join("task").join("2");
    std::fs::create_dir_all(thread.join("ns")).unwrap();
    std::fs::write(thread.join("ns/mnt"), b"").unwrap();
    std::fs::write(thread.join("maps"), common::maps_for(&["/usr/lib/libthread.so"])).unwrap();

    let libraries = find_proc(procfs.root(), None);
    assert_eq!(libraries.len(), 1);
    assert_eq!(libraries[0].pathname(), LIBC);
}
