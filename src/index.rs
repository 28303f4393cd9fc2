//! Index Manager: one B+ tree per indexed `(table, column)` pair, mapping
//! a key to the set of record ids that hold it.
//!
//! Grounded on `src/index_manager.cpp`: `create_index`/`drop_index` over a
//! `map<string, map<string, BPlusTree>>` keyed first by table then by
//! column, and persistence as `<table>_<column>.idx` with one line per key
//! (`key|id1,id2,...`). The range-search sentinels `""`/`"~"`/`val + '\x01'`
//! described in spec.md §4.2 are translated here, at the boundary, into
//! [`std::ops::Bound`] so [`crate::bplus::BPlusTree`] itself never has to
//! know about them.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use crate::bplus::BPlusTree;
use crate::store::RecordId;
use crate::{err_at, ident, Result};

type ColumnIndex = BPlusTree<String, BTreeSet<RecordId>>;

/// One in-memory B+ tree per `(table, column)`, lazily persisted to
/// `<dir>/<table>_<column>.idx`.
pub struct IndexManager {
    dir: PathBuf,
    order: usize,
    trees: HashMap<(String, String), ColumnIndex>,
}

impl IndexManager {
    /// `order` is the B+ tree fan-out every index created by this manager
    /// uses — normally [`crate::config::EngineConfig::tree_order`].
    pub fn new(dir: PathBuf) -> IndexManager {
        IndexManager::with_order(dir, crate::config::DEFAULT_TREE_ORDER)
    }

    pub fn with_order(dir: PathBuf, order: usize) -> IndexManager {
        IndexManager { dir, order, trees: HashMap::new() }
    }

    fn file_path(&self, table: &str, column: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.idx", table, column))
    }

    /// Load every `<table>_<column>.idx` file already present in the
    /// index directory. Per spec.md §9, the filename is split at the
    /// *first* underscore to recover `table`/`column`; this crate forbids
    /// underscores in identifiers (see [`crate::ident::validate`]) so the
    /// split is always unambiguous for indexes this crate created.
    pub fn load(&mut self) -> Result<()> {
        self.trees.clear();
        if !self.dir.exists() {
            return Ok(());
        }
        let entries = err_at!(IOError, fs::read_dir(&self.dir))?;
        for entry in entries {
            let entry = err_at!(IOError, entry)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("idx") {
                continue;
            }
            let stem = match path.file_stem().and_then(|s| s.to_str()) {
                Some(s) => s.to_string(),
                None => continue,
            };
            let (table, column) = match stem.split_once('_') {
                Some((t, c)) => (t.to_string(), c.to_string()),
                None => {
                    log::warn!(target: "index", "skipping index file with no underscore: {:?}", path);
                    continue;
                }
            };
            let tree = self.load_tree(&path)?;
            self.trees.insert((table, column), tree);
        }
        Ok(())
    }

    fn load_tree(&self, path: &Path) -> Result<ColumnIndex> {
        let text = err_at!(IOError, fs::read_to_string(path))?;
        let mut tree = ColumnIndex::with_order(self.order);
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let (key, ids) = match line.split_once('|') {
                Some(pair) => pair,
                None => continue,
            };
            let mut set = BTreeSet::new();
            for part in ids.split(',') {
                if part.is_empty() {
                    continue;
                }
                if let Ok(id) = part.parse::<RecordId>() {
                    set.insert(id);
                }
            }
            if !set.is_empty() {
                tree.insert(key.to_string(), set);
            }
        }
        Ok(tree)
    }

    fn persist(&self, table: &str, column: &str) -> Result<()> {
        if let Some(tree) = self.trees.get(&(table.to_string(), column.to_string())) {
            if !self.dir.exists() {
                err_at!(IOError, fs::create_dir_all(&self.dir))?;
            }
            let mut out = String::new();
            for (key, ids) in tree.iter() {
                let ids_str = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
                out.push_str(&format!("{}|{}\n", key, ids_str));
            }
            err_at!(IOError, fs::write(self.file_path(table, column), out))?;
        }
        Ok(())
    }

    pub fn column_exists(&self, table: &str, column: &str) -> bool {
        self.trees.contains_key(&(ident::normalize(table), ident::normalize(column)))
    }

    /// Create an (initially empty) index on `table.column`.
    pub fn create_index(&mut self, table: &str, column: &str) -> Result<()> {
        let table = ident::normalize(table);
        let column = ident::normalize(column);
        ident::validate(&table)?;
        ident::validate(&column)?;
        let key = (table.clone(), column.clone());
        if self.trees.contains_key(&key) {
            return err_at!(Duplicate, msg: "index already exists on {}.{}", table, column);
        }
        self.trees.insert(key, ColumnIndex::with_order(self.order));
        self.persist(&table, &column)?;
        Ok(())
    }

    /// Drop an index and remove its persisted file.
    pub fn drop_index(&mut self, table: &str, column: &str) -> Result<()> {
        let table = ident::normalize(table);
        let column = ident::normalize(column);
        if self.trees.remove(&(table.clone(), column.clone())).is_none() {
            return err_at!(NotFound, msg: "no index on {}.{}", table, column);
        }
        let path = self.file_path(&table, &column);
        if path.exists() {
            err_at!(IOError, fs::remove_file(&path))?;
        }
        Ok(())
    }

    /// Record that `value` in `table.column` now maps to `id`. No-op if
    /// the column is not indexed.
    pub fn insert_entry(&mut self, table: &str, column: &str, value: &str, id: RecordId) -> Result<()> {
        let table = ident::normalize(table);
        let column = ident::normalize(column);
        if let Some(tree) = self.trees.get_mut(&(table.clone(), column.clone())) {
            let mut set = tree.search(&value.to_string()).into_iter().next().unwrap_or_default();
            set.insert(id);
            tree.insert(value.to_string(), set);
            self.persist(&table, &column)?;
        }
        Ok(())
    }

    /// Remove `id` from `value`'s entry in `table.column`. No-op if the
    /// column is not indexed.
    pub fn delete_entry(&mut self, table: &str, column: &str, value: &str, id: RecordId) -> Result<()> {
        let table = ident::normalize(table);
        let column = ident::normalize(column);
        if let Some(tree) = self.trees.get_mut(&(table.clone(), column.clone())) {
            if let Some(mut set) = tree.search(&value.to_string()).into_iter().next() {
                set.remove(&id);
                if set.is_empty() {
                    tree.remove(&value.to_string(), &set);
                } else {
                    tree.insert(value.to_string(), set);
                }
            }
            self.persist(&table, &column)?;
        }
        Ok(())
    }

    /// Record ids equal to `value` in `table.column`.
    pub fn search(&self, table: &str, column: &str, value: &str) -> BTreeSet<RecordId> {
        let table = ident::normalize(table);
        let column = ident::normalize(column);
        self.trees
            .get(&(table, column))
            .and_then(|tree| tree.search(&value.to_string()).into_iter().next())
            .unwrap_or_default()
    }

    /// Record ids for keys within `(lower, upper)`, translating spec.md
    /// §4.2's sentinel convention (`""` = unbounded below, `"~"` = unbounded
    /// above, an excluded bound is requested by appending `'\x01'` to the
    /// value) into [`Bound`]s before delegating to the tree.
    pub fn range_search(&self, table: &str, column: &str, lower: &str, upper: &str) -> BTreeSet<RecordId> {
        let table = ident::normalize(table);
        let column = ident::normalize(column);
        let tree = match self.trees.get(&(table, column)) {
            Some(t) => t,
            None => return BTreeSet::new(),
        };

        let lower_bound = sentinel_to_lower_bound(lower);
        let upper_bound = sentinel_to_upper_bound(upper);

        let mut out = BTreeSet::new();
        for ids in tree.range_search(lower_bound.as_ref(), upper_bound.as_ref()) {
            out.extend(ids.iter().copied());
        }
        out
    }

    /// Every record id currently indexed under `table.column`, in key
    /// order. Used to drive a full table scan and "delete all records of
    /// this table" off the guaranteed primary-key index — see
    /// [`crate::table::TableManager`] and DESIGN.md.
    pub fn all_ids(&self, table: &str, column: &str) -> Vec<RecordId> {
        let table = ident::normalize(table);
        let column = ident::normalize(column);
        match self.trees.get(&(table, column)) {
            Some(tree) => tree.iter().flat_map(|(_, ids)| ids.iter().copied()).collect(),
            None => Vec::new(),
        }
    }
}

fn sentinel_to_lower_bound(raw: &str) -> Bound<String> {
    if raw.is_empty() {
        Bound::Unbounded
    } else if let Some(stripped) = raw.strip_suffix('\u{1}') {
        Bound::Excluded(stripped.to_string())
    } else {
        Bound::Included(raw.to_string())
    }
}

fn sentinel_to_upper_bound(raw: &str) -> Bound<String> {
    if raw == "~" {
        Bound::Unbounded
    } else if let Some(stripped) = raw.strip_suffix('\u{1}') {
        Bound::Excluded(stripped.to_string())
    } else {
        Bound::Included(raw.to_string())
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
