//! Catalog Manager: table schemas, persisted as ordinary records in the
//! same heap as user data.
//!
//! spec.md §4.2/§4.3: a schema is serialised with a `SCHEMA|` sentinel
//! prefix and inserted into the record store like any other row; at
//! startup the catalog scans the whole heap and rebuilds its in-memory
//! cache from every record beginning with that prefix. This mirrors
//! `src/catalog_manager.cpp`'s `load_schemas`, which walks the record
//! manager once at construction time.

use std::collections::HashMap;

use crate::store::{RecordId, RecordStore};
use crate::{err_at, ident, Result};

const SCHEMA_PREFIX: &str = "SCHEMA|";

/// A column's declared storage type. spec.md §2 names `INT` and `VARCHAR`
/// explicitly; `FLOAT` and `Unknown` are carried over from
/// `original_source/include/data_type.h` (see DESIGN.md). `Unknown` is a
/// parse-failure marker only — `as_tag` never produces it for a real
/// column, and [`CatalogManager::create_table`] rejects any column whose
/// declared type parses to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    Varchar,
    Float,
    Unknown,
}

impl DataType {
    fn as_tag(&self) -> &'static str {
        match self {
            DataType::Int => "INT",
            DataType::Varchar => "VARCHAR",
            DataType::Float => "FLOAT",
            DataType::Unknown => "UNKNOWN",
        }
    }

    /// Parses a type tag the way `data_type.h`'s `parse_type` does:
    /// anything unrecognised becomes `Unknown` rather than an error.
    pub fn from_tag(tag: &str) -> DataType {
        match tag {
            "INT" => DataType::Int,
            "VARCHAR" => DataType::Varchar,
            "FLOAT" => DataType::Float,
            _ => DataType::Unknown,
        }
    }
}

/// A table's shape: column names, their types, and which column is the
/// primary key.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<String>,
    pub column_types: Vec<DataType>,
    pub primary_key_index: usize,
}

impl TableSchema {
    pub fn primary_key_column(&self) -> &str {
        &self.columns[self.primary_key_index]
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn serialize(&self) -> String {
        let cols = self.columns.join(",");
        let types = self
            .column_types
            .iter()
            .map(|t| t.as_tag())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}{}|{}|{}|{}",
            SCHEMA_PREFIX, self.name, cols, types, self.primary_key_index
        )
    }

    fn deserialize(line: &str) -> Result<TableSchema> {
        let body = match line.strip_prefix(SCHEMA_PREFIX) {
            Some(b) => b,
            None => return err_at!(DecodeFail, msg: "not a schema record: '{}'", line),
        };
        let parts: Vec<&str> = body.splitn(4, '|').collect();
        if parts.len() != 4 {
            return err_at!(DecodeFail, msg: "malformed schema record: '{}'", line);
        }
        let name = parts[0].to_string();
        let columns: Vec<String> = parts[1].split(',').map(|s| s.to_string()).collect();
        let column_types: Vec<DataType> = parts[2].split(',').map(DataType::from_tag).collect();
        let primary_key_index: usize =
            err_at!(DecodeFail, parts[3].parse())?;
        if columns.len() != column_types.len() {
            return err_at!(
                DecodeFail,
                msg: "schema '{}' has {} column(s) but {} type(s)",
                name,
                columns.len(),
                column_types.len()
            );
        }
        if primary_key_index >= columns.len() {
            return err_at!(
                DecodeFail,
                msg: "schema '{}' primary key index {} out of range",
                name,
                primary_key_index
            );
        }
        Ok(TableSchema { name, columns, column_types, primary_key_index })
    }
}

/// Keeps the in-memory schema cache in sync with the `SCHEMA|` records
/// living in the record store.
pub struct CatalogManager {
    cache: HashMap<String, TableSchema>,
    /// id of the schema record for each table, so drop_table can remove
    /// exactly that one record without a full rescan.
    schema_record_id: HashMap<String, RecordId>,
}

impl CatalogManager {
    pub fn new() -> CatalogManager {
        CatalogManager { cache: HashMap::new(), schema_record_id: HashMap::new() }
    }

    /// Rebuild the cache from every `SCHEMA|` record in `store`. Called
    /// once when a database is opened.
    pub fn load(&mut self, store: &RecordStore) -> Result<()> {
        self.cache.clear();
        self.schema_record_id.clear();
        for (id, text) in store.scan() {
            if !text.starts_with(SCHEMA_PREFIX) {
                continue;
            }
            match TableSchema::deserialize(text) {
                Ok(schema) => {
                    self.schema_record_id.insert(schema.name.clone(), id);
                    self.cache.insert(schema.name.clone(), schema);
                }
                Err(err) => {
                    log::warn!(target: "catalog", "skipping unreadable schema record {}: {}", id, err);
                }
            }
        }
        Ok(())
    }

    /// Register a new table. Normalises and validates every identifier,
    /// rejects a table that already exists, and persists the schema as a
    /// record in `store`.
    pub fn create_table(
        &mut self,
        store: &mut RecordStore,
        name: &str,
        columns: &[String],
        column_types: &[DataType],
        primary_key_index: usize,
    ) -> Result<TableSchema> {
        let name = ident::normalize(name);
        ident::validate(&name)?;
        if self.cache.contains_key(&name) {
            return err_at!(Duplicate, msg: "table '{}' already exists", name);
        }
        if columns.is_empty() {
            return err_at!(Invalid, msg: "table '{}' must have at least one column", name);
        }
        if columns.len() != column_types.len() {
            return err_at!(Invalid, msg: "column/type count mismatch for table '{}'", name);
        }
        if primary_key_index >= columns.len() {
            return err_at!(Invalid, msg: "primary key index out of range for table '{}'", name);
        }
        if let Some(pos) = column_types.iter().position(|t| *t == DataType::Unknown) {
            return err_at!(Invalid, msg: "column '{}' of table '{}' has an unrecognised type", columns[pos], name);
        }
        let columns = ident::normalize_all(columns);
        for col in &columns {
            ident::validate(col)?;
        }
        let mut seen = std::collections::HashSet::new();
        for col in &columns {
            if !seen.insert(col.clone()) {
                return err_at!(Invalid, msg: "duplicate column '{}' in table '{}'", col, name);
            }
        }

        let schema = TableSchema {
            name: name.clone(),
            columns,
            column_types: column_types.to_vec(),
            primary_key_index,
        };
        let id = store.insert(schema.serialize());
        self.schema_record_id.insert(name.clone(), id);
        self.cache.insert(name, schema.clone());
        Ok(schema)
    }

    /// Remove a table's schema record. Does not touch the table's data
    /// rows or indexes — callers (see [`crate::db::Database::drop_table`])
    /// must remove those first while the schema is still available to
    /// describe them.
    pub fn drop_table_schema(&mut self, store: &mut RecordStore, name: &str) -> Result<()> {
        let name = ident::normalize(name);
        if !self.cache.contains_key(&name) {
            return err_at!(NotFound, msg: "table '{}' does not exist", name);
        }
        if let Some(id) = self.schema_record_id.remove(&name) {
            store.delete(id);
        }
        self.cache.remove(&name);
        Ok(())
    }

    pub fn get_schema(&self, name: &str) -> Option<&TableSchema> {
        self.cache.get(&ident::normalize(name))
    }

    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cache.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn column_exists(&self, table: &str, column: &str) -> bool {
        let column = ident::normalize(column);
        self.get_schema(table)
            .map(|s| s.columns.iter().any(|c| *c == column))
            .unwrap_or(false)
    }
}

impl Default for CatalogManager {
    fn default() -> Self {
        CatalogManager::new()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;
