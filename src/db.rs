//! Top-level database handle: opens a database's directory and wires the
//! record store, index manager, and catalog manager together in the
//! dependency order spec.md §5 lays out (disk → record store → index
//! manager → catalog manager → table manager → query executor).
//!
//! spec.md §9 flags that the original prototype kept a single global
//! "current database" and swapped managers out from under it on `USE`;
//! this crate instead gives every open database its own [`Database`]
//! value and leaves picking which one is "current" to the caller (the
//! REPL in `src/bin/limbodb.rs`).

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogManager;
use crate::config::EngineConfig;
use crate::index::IndexManager;
use crate::query::{self, Outcome};
use crate::store::RecordStore;
use crate::{err_at, Result};

const HEAP_FILE_NAME: &str = "pages.db";
const INDEX_DIR_NAME: &str = "indexes";

/// One open database: its record heap, secondary indexes, and schema
/// cache, all rooted at `<data_dir>/<name>/`.
pub struct Database {
    name: String,
    store: RecordStore,
    index: IndexManager,
    catalog: CatalogManager,
}

impl Database {
    /// Open (creating on first use) the database named `name` under
    /// `config.data_dir`.
    pub fn open(config: &EngineConfig, name: &str) -> Result<Database> {
        let dir = config.db_dir(name);
        err_at!(IOError, fs::create_dir_all(&dir))?;

        let store = RecordStore::open(&dir.join(HEAP_FILE_NAME))?;
        let mut index = IndexManager::with_order(dir.join(INDEX_DIR_NAME), config.tree_order);
        index.load()?;
        let mut catalog = CatalogManager::new();
        catalog.load(&store)?;

        Ok(Database { name: name.to_string(), store, index, catalog })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse and run one statement against this database.
    pub fn execute(&mut self, statement: &str) -> Result<Outcome> {
        query::execute(&mut self.catalog, &mut self.index, &mut self.store, statement)
    }

    /// Write every in-memory change back to disk. Called before the
    /// process exits; `pages.db` is also flushed on `Drop`, but indexes
    /// are written incrementally so this is mostly a safety net.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }
}

/// Names of every database directory under `config.data_dir`, used by
/// `SHOW DATABASES` in the REPL.
pub fn list_databases(config: &EngineConfig) -> Result<Vec<String>> {
    let dir: &Path = &config.data_dir;
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in err_at!(IOError, fs::read_dir(dir))? {
        let entry = err_at!(IOError, entry)?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

pub fn database_exists(config: &EngineConfig, name: &str) -> bool {
    let dir: PathBuf = config.db_dir(name);
    dir.is_dir()
}

#[cfg(test)]
#[path = "db_test.rs"]
mod db_test;
