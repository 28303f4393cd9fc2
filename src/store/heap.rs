//! Minimal on-disk record heap.
//!
//! spec.md treats the record store as an external collaborator ("we assume
//! an external record store that assigns opaque integer record-ids, supports
//! insert/delete/select, exposes a full scan, and supplies a (page, slot)
//! encoding scheme") and explicitly puts `DiskManager`/`RecordManager` out of
//! scope. This module is the concrete stand-in needed to make the crate
//! runnable end to end — intentionally the smallest module in the crate (see
//! SPEC_FULL.md §4.0): no page cache, no buffered writer, a single
//! in-memory map flushed as one flat file on close.

use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use fs2::FileExt;

use super::record::{self, RecordId};
use crate::{err_at, Result};

const SLOTS_PER_PAGE: u32 = 16;

/// Heap of variable-length text records addressed by [`RecordId`].
pub struct RecordStore {
    path: PathBuf,
    _lock: File,
    records: BTreeMap<(u32, u32), String>,
    free: Vec<(u32, u32)>,
    next_alloc: (u32, u32),
}

impl RecordStore {
    /// Open (creating if absent) the heap file at `path`, taking an
    /// exclusive OS-level lock on it for the lifetime of the returned
    /// store — per spec.md §5, "no file-level locking is required beyond
    /// what the OS provides against a second process."
    pub fn open(path: &Path) -> Result<RecordStore> {
        let file = err_at!(
            IOError,
            OpenOptions::new().create(true).read(true).write(true).open(path)
        )?;
        err_at!(IOError, file.try_lock_exclusive())?;

        let mut records = BTreeMap::new();
        let mut max_seen: Option<(u32, u32)> = None;
        let reader = BufReader::new(err_at!(IOError, File::open(path))?);
        for line in reader.lines() {
            let line = err_at!(IOError, line)?;
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, '|');
            let page: u32 = match parts.next().and_then(|s| s.parse().ok()) {
                Some(p) => p,
                None => continue,
            };
            let slot: u32 = match parts.next().and_then(|s| s.parse().ok()) {
                Some(s) => s,
                None => continue,
            };
            let text = parts.next().unwrap_or("").to_string();
            max_seen = Some(match max_seen {
                Some(m) if m >= (page, slot) => m,
                _ => (page, slot),
            });
            records.insert((page, slot), text);
        }

        let next_alloc = match max_seen {
            None => (0, 0),
            Some((page, slot)) if slot + 1 < SLOTS_PER_PAGE => (page, slot + 1),
            Some((page, _)) => (page + 1, 0),
        };

        Ok(RecordStore {
            path: path.to_path_buf(),
            _lock: file,
            records,
            free: Vec::new(),
            next_alloc,
        })
    }

    fn alloc_slot(&mut self) -> (u32, u32) {
        match self.free.pop() {
            Some(slot) => slot,
            None => {
                let cur = self.next_alloc;
                self.next_alloc = if cur.1 + 1 < SLOTS_PER_PAGE {
                    (cur.0, cur.1 + 1)
                } else {
                    (cur.0 + 1, 0)
                };
                cur
            }
        }
    }

    /// Insert a record, returning its freshly assigned id.
    pub fn insert(&mut self, text: String) -> RecordId {
        let (page, slot) = self.alloc_slot();
        self.records.insert((page, slot), text);
        record::encode(page, slot)
    }

    /// Delete a record by id. Returns `false` if it was already absent.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let key = record::decode(id);
        match self.records.remove(&key) {
            Some(_) => {
                self.free.push(key);
                true
            }
            None => false,
        }
    }

    /// Fetch a record's text by id.
    pub fn select(&self, id: RecordId) -> Option<&str> {
        self.records.get(&record::decode(id)).map(|s| s.as_str())
    }

    /// Iterate every live record in ascending `(page, slot)` order.
    pub fn scan(&self) -> impl Iterator<Item = (RecordId, &str)> {
        self.records
            .iter()
            .map(|(&(page, slot), text)| (record::encode(page, slot), text.as_str()))
    }

    /// Write the full heap back to disk. Called on clean shutdown — per
    /// spec.md §5 this crate does not attempt crash recovery, so data
    /// since the last flush is lost if the process is killed uncleanly.
    pub fn flush(&self) -> Result<()> {
        let mut out = String::new();
        for (&(page, slot), text) in &self.records {
            out.push_str(&format!("{}|{}|{}\n", page, slot, text));
        }
        let mut file = err_at!(
            IOError,
            OpenOptions::new().write(true).truncate(true).open(&self.path)
        )?;
        err_at!(IOError, file.write_all(out.as_bytes()))?;
        log::debug!(target: "store", "flushed {} record(s) to {:?}", self.records.len(), self.path);
        Ok(())
    }
}

impl Drop for RecordStore {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            log::error!(target: "store", "flush on drop failed: {}", err);
        }
    }
}

#[cfg(test)]
#[path = "heap_test.rs"]
mod heap_test;
