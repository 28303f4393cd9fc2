//! Table Manager: a thin shim that keeps secondary indexes in sync with
//! the record heap.
//!
//! spec.md §4.4 describes this layer as stateless glue — it owns nothing,
//! it borrows the catalog, the index manager, and the record store for
//! the duration of each call. That mirrors `include/table_manager.h`
//! holding references to `CatalogManager&`/`IndexManager&`, translated
//! into Rust as explicit borrowed parameters rather than stored
//! references, which would otherwise tangle catalog/table/index into a
//! reference cycle.

use crate::catalog::{CatalogManager, TableSchema};
use crate::index::IndexManager;
use crate::store::{RecordId, RecordStore};
use crate::{err_at, Result};

/// What to delete. Replaces the original prototype's `delete_from(name, -1)`
/// sentinel (spec.md §9) with a proper sum type.
#[derive(Debug, Clone, Copy)]
pub enum DeleteTarget {
    One(RecordId),
    All,
}

/// Split a stored record's pipe-joined text back into fields, in schema
/// column order.
pub fn unpack_record<'a>(text: &'a str, schema: &TableSchema) -> Vec<&'a str> {
    text.splitn(schema.columns.len(), '|').collect()
}

fn pack_record(values: &[String]) -> Result<String> {
    for v in values {
        if v.contains('|') {
            return err_at!(Invalid, msg: "value '{}' may not contain '|'", v);
        }
    }
    Ok(values.join("|"))
}

/// Stateless operations over a table's data rows. Every method takes the
/// collaborators it needs as explicit borrows.
pub struct TableManager;

impl TableManager {
    /// Create a table's schema and auto-create an index on its primary
    /// key column — every table is queryable by primary key from the
    /// moment it exists, which [`Self::delete_from`]'s `All` case and
    /// [`Self::scan`] both rely on.
    pub fn create_table(
        catalog: &mut CatalogManager,
        index: &mut IndexManager,
        store: &mut RecordStore,
        name: &str,
        columns: &[String],
        column_types: &[crate::catalog::DataType],
        primary_key_index: usize,
    ) -> Result<TableSchema> {
        let schema = catalog.create_table(store, name, columns, column_types, primary_key_index)?;
        index.create_index(&schema.name, schema.primary_key_column())?;
        Ok(schema)
    }

    pub fn insert_into(
        catalog: &CatalogManager,
        index: &mut IndexManager,
        store: &mut RecordStore,
        table: &str,
        values: Vec<String>,
    ) -> Result<RecordId> {
        let schema = catalog
            .get_schema(table)
            .ok_or_else(|| crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table)))?;
        if values.len() != schema.columns.len() {
            return err_at!(
                Invalid,
                msg: "table '{}' expects {} value(s), got {}",
                table,
                schema.columns.len(),
                values.len()
            );
        }
        let text = pack_record(&values)?;
        let id = store.insert(text);
        for (i, col) in schema.columns.iter().enumerate() {
            if index.column_exists(&schema.name, col) {
                index.insert_entry(&schema.name, col, &values[i], id)?;
            }
        }
        Ok(id)
    }

    /// Delete one record, or every record, from `table`. Returns the
    /// number of rows removed.
    ///
    /// `All` walks the table's primary-key index rather than the whole
    /// heap: the heap has no per-record table tag (spec.md §3's data
    /// record form is exactly the pipe-joined column values, nothing
    /// more), but every table is guaranteed to have a primary-key index
    /// covering precisely its own rows, so that index's full key range is
    /// the table's row set. See DESIGN.md for the full resolution.
    pub fn delete_from(
        catalog: &CatalogManager,
        index: &mut IndexManager,
        store: &mut RecordStore,
        table: &str,
        target: DeleteTarget,
    ) -> Result<usize> {
        let schema = catalog
            .get_schema(table)
            .ok_or_else(|| crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table)))?;

        let ids: Vec<RecordId> = match target {
            DeleteTarget::One(id) => vec![id],
            DeleteTarget::All => index.all_ids(&schema.name, schema.primary_key_column()),
        };

        let mut removed = 0;
        for id in ids {
            let text = match store.select(id) {
                Some(t) => t.to_string(),
                None => continue,
            };
            let fields = unpack_record(&text, schema);
            store.delete(id);
            for (i, col) in schema.columns.iter().enumerate() {
                if index.column_exists(&schema.name, col) {
                    if let Some(value) = fields.get(i) {
                        index.delete_entry(&schema.name, col, value, id)?;
                    }
                }
            }
            removed += 1;
        }
        Ok(removed)
    }

    /// Replace the stored values of a single record, keeping every
    /// indexed column's entries in sync. `new_values` must cover every
    /// column in schema order, matching spec.md §4.5's UPDATE semantics
    /// (whole-row rewrite, not a sparse column patch).
    pub fn update(
        catalog: &CatalogManager,
        index: &mut IndexManager,
        store: &mut RecordStore,
        table: &str,
        id: RecordId,
        new_values: Vec<String>,
    ) -> Result<()> {
        let schema = catalog
            .get_schema(table)
            .ok_or_else(|| crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table)))?;
        if new_values.len() != schema.columns.len() {
            return err_at!(
                Invalid,
                msg: "table '{}' expects {} value(s), got {}",
                table,
                schema.columns.len(),
                new_values.len()
            );
        }
        let old_text = match store.select(id) {
            Some(t) => t.to_string(),
            None => return err_at!(NotFound, msg: "no such record {} in '{}'", id, table),
        };
        let old_fields: Vec<String> = unpack_record(&old_text, schema).iter().map(|s| s.to_string()).collect();

        let new_text = pack_record(&new_values)?;
        store.delete(id);
        let reinserted = store.insert(new_text);
        if reinserted != id {
            log::warn!(
                target: "table",
                "update reused a different record id ({} -> {}) for table '{}'",
                id,
                reinserted,
                table
            );
        }

        for (i, col) in schema.columns.iter().enumerate() {
            if index.column_exists(&schema.name, col) {
                index.delete_entry(&schema.name, col, &old_fields[i], id)?;
                index.insert_entry(&schema.name, col, &new_values[i], reinserted)?;
            }
        }
        Ok(())
    }

    pub fn select<'a>(store: &'a RecordStore, id: RecordId) -> Option<&'a str> {
        store.select(id)
    }

    /// Every row currently belonging to `table`, in primary-key order.
    /// See [`Self::delete_from`]'s doc comment for why this walks the
    /// primary-key index rather than the raw heap.
    pub fn scan(
        catalog: &CatalogManager,
        index: &IndexManager,
        store: &RecordStore,
        table: &str,
    ) -> Result<Vec<(RecordId, Vec<String>)>> {
        let schema = catalog
            .get_schema(table)
            .ok_or_else(|| crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table)))?;
        let ids = index.all_ids(&schema.name, schema.primary_key_column());
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(text) = store.select(id) {
                let fields = unpack_record(text, schema).iter().map(|s| s.to_string()).collect();
                rows.push((id, fields));
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
