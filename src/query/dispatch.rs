//! Predicate dispatch: turn a single-column WHERE clause into the
//! cheapest available index plan, falling back to a full table scan when
//! the column isn't indexed.
//!
//! spec.md §4.5: point lookup for `=`, a union of two half-open ranges
//! for `!=`, a single range for the four ordering operators, and a
//! recheck pass afterwards so a query never trusts index bookkeeping
//! more than the rows actually on disk.

use std::collections::BTreeSet;

use super::ast::{Op, Predicate};
use crate::catalog::CatalogManager;
use crate::index::IndexManager;
use crate::store::{RecordId, RecordStore};
use crate::table::{unpack_record, TableManager};
use crate::Result;

const EXCL_SUFFIX: char = '\u{1}';

/// Rows of `table` matching `predicate`, or every row if `predicate` is
/// `None`. Each row is `(id, fields)` in schema column order.
pub fn execute(
    catalog: &CatalogManager,
    index: &IndexManager,
    store: &RecordStore,
    table: &str,
    predicate: &Option<Predicate>,
) -> Result<Vec<(RecordId, Vec<String>)>> {
    let predicate = match predicate {
        None => return TableManager::scan(catalog, index, store, table),
        Some(p) => p,
    };

    let schema = catalog
        .get_schema(table)
        .ok_or_else(|| crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table)))?;

    let candidate_ids: Vec<RecordId> = if index.column_exists(table, &predicate.column) {
        match predicate.op {
            Op::Eq => index.search(table, &predicate.column, &predicate.value).into_iter().collect(),
            Op::Ne => {
                let mut below: BTreeSet<RecordId> =
                    index.range_search(table, &predicate.column, "", &format!("{}{}", predicate.value, EXCL_SUFFIX));
                let above = index.range_search(table, &predicate.column, &format!("{}{}", predicate.value, EXCL_SUFFIX), "~");
                below.extend(above);
                below.into_iter().collect()
            }
            Op::Ge => index.range_search(table, &predicate.column, &predicate.value, "~").into_iter().collect(),
            Op::Le => index.range_search(table, &predicate.column, "", &predicate.value).into_iter().collect(),
            Op::Gt => index
                .range_search(table, &predicate.column, &format!("{}{}", predicate.value, EXCL_SUFFIX), "~")
                .into_iter()
                .collect(),
            Op::Lt => index
                .range_search(table, &predicate.column, "", &format!("{}{}", predicate.value, EXCL_SUFFIX))
                .into_iter()
                .collect(),
        }
    } else {
        // No index on this column: the only candidate set is every row
        // of the table, found via the primary-key index as usual.
        index.all_ids(table, schema.primary_key_column())
    };

    let mut out = Vec::with_capacity(candidate_ids.len());
    for id in candidate_ids {
        let text = match store.select(id) {
            Some(t) => t,
            None => continue,
        };
        let fields: Vec<String> = unpack_record(text, schema).iter().map(|s| s.to_string()).collect();
        if evaluate(schema, &fields, predicate) {
            out.push((id, fields));
        }
    }
    Ok(out)
}

fn evaluate(schema: &crate::catalog::TableSchema, fields: &[String], predicate: &Predicate) -> bool {
    let idx = match schema.column_index(&predicate.column) {
        Some(i) => i,
        None => return false,
    };
    let actual = match fields.get(idx) {
        Some(v) => v.as_str(),
        None => return false,
    };
    let ordering = compare(actual, &predicate.value);
    match predicate.op {
        Op::Eq => ordering == std::cmp::Ordering::Equal,
        Op::Ne => ordering != std::cmp::Ordering::Equal,
        Op::Ge => ordering != std::cmp::Ordering::Less,
        Op::Le => ordering != std::cmp::Ordering::Greater,
        Op::Gt => ordering == std::cmp::Ordering::Greater,
        Op::Lt => ordering == std::cmp::Ordering::Less,
    }
}

/// spec.md §4.5: "all comparisons are lexicographic on the raw string
/// form", regardless of declared column type — the same ordering the
/// B+ tree's string keys already use, so a predicate's recheck pass
/// never disagrees with what an index range scan would have returned.
fn compare(a: &str, b: &str) -> std::cmp::Ordering {
    a.cmp(b)
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;
