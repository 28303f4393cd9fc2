//! Engine-wide configuration.
//!
//! Grounded on the teacher crate's `Config` structs (`robt_config.rs`,
//! `robt/config.rs`): a plain, `Clone`-able struct of public fields with a
//! `dir`/`data_dir` field and sane defaults, rather than a builder pattern.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Minimum fan-out for the B+ tree, per spec.md §3 ("Fan-out / Order").
pub const DEFAULT_TREE_ORDER: usize = 4;

/// Configuration shared by every manager in an open database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory under which `<data_dir>/<dbname>/` directories live.
    pub data_dir: PathBuf,
    /// Maximum keys per B+ tree node. Tests shrink this to exercise
    /// split/merge/redistribution without loading thousands of keys.
    pub tree_order: usize,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            data_dir: PathBuf::from("data"),
            tree_order: DEFAULT_TREE_ORDER,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any field it omits. Returns `Err` only if the file exists but fails
    /// to parse.
    pub fn from_toml_file(path: &std::path::Path) -> crate::Result<EngineConfig> {
        let text = crate::err_at!(IOError, std::fs::read_to_string(path))?;
        crate::err_at!(DecodeFail, toml::from_str(&text))
    }

    /// Path of the directory holding one database's files:
    /// `<data_dir>/<name>/`.
    pub fn db_dir(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}
