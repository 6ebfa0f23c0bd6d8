//! Per-namespace mount table cache
//!
//! Processes sharing a mount namespace share a mount table, so each table is
//! parsed once per namespace and reused for every process in it. The cache
//! lives for one scan and is owned by the caller driving it.

use log::debug;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::NamespaceId;

use super::mounts::MountTable;

#[derive(Debug, Default)]
pub struct MountTableCache {
    tables: HashMap<NamespaceId, MountTable>,
}

impl MountTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount table of `namespace`, read from `pid_path` on first use
    ///
    /// Failed or empty reads are not cached: the next process of the same
    /// namespace gets another chance.
    pub fn get_or_load(&mut self, namespace: NamespaceId, pid_path: &Path) -> Option<&MountTable> {
        if !self.tables.contains_key(&namespace) {
            let table = match MountTable::read(pid_path) {
                Ok(table) if !table.is_empty() => table,
                Ok(_) => {
                    debug!("Empty mount table in {}", pid_path.display());
                    return None;
                }
                Err(e) => {
                    debug!("{e}");
                    return None;
                }
            };
            debug!("Loaded {} mounts for namespace {namespace}", table.len());
            self.tables.insert(namespace, table);
        }
        self.tables.get(&namespace)
    }

    /// Number of namespaces with a loaded table
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
