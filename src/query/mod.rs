//! Query Executor: parses a statement and carries it out against the
//! catalog, index, and record store, matching spec.md §4.5's operation
//! list (CREATE TABLE, DROP TABLE, CREATE INDEX, INSERT, DELETE, UPDATE,
//! SELECT) and §7's REPL output contract.

mod ast;
mod dispatch;
mod parser;
mod render;

pub use ast::{Op, Predicate, Statement};
pub use parser::parse;
pub use render::render_table;

use crate::catalog::CatalogManager;
use crate::index::IndexManager;
use crate::store::RecordStore;
use crate::table::{DeleteTarget, TableManager};
use crate::{ident, Result};

/// Outcome of one executed statement, shaped for the REPL to print.
pub enum Outcome {
    TableCreated(String),
    TableDropped(String),
    IndexCreated { table: String, column: String },
    RowInserted(crate::store::RecordId),
    RowsAffected(usize),
    Rows { columns: Vec<String>, rows: Vec<Vec<String>> },
}

/// Parse and run one statement. Takes the three collaborators as
/// explicit borrows, same as [`crate::table::TableManager`] — see that
/// module's doc comment for why.
pub fn execute(
    catalog: &mut CatalogManager,
    index: &mut IndexManager,
    store: &mut RecordStore,
    input: &str,
) -> Result<Outcome> {
    let statement = parse(input)?;
    run(catalog, index, store, statement)
}

fn run(
    catalog: &mut CatalogManager,
    index: &mut IndexManager,
    store: &mut RecordStore,
    statement: Statement,
) -> Result<Outcome> {
    match statement {
        Statement::CreateTable { table, columns, primary_key } => {
            let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
            let types: Vec<_> = columns.iter().map(|c| c.data_type).collect();
            let normalized_pk = ident::normalize(&primary_key);
            let pk_index = names
                .iter()
                .map(|n| ident::normalize(n))
                .position(|n| n == normalized_pk)
                .ok_or_else(|| {
                    crate::Error::Invalid(
                        format!("{}:{}", file!(), line!()),
                        format!("primary key column '{}' not declared", primary_key),
                    )
                })?;
            let schema = TableManager::create_table(catalog, index, store, &table, &names, &types, pk_index)?;
            Ok(Outcome::TableCreated(schema.name))
        }
        Statement::DropTable { table } => {
            let schema = catalog
                .get_schema(&table)
                .cloned()
                .ok_or_else(|| crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table)))?;
            TableManager::delete_from(catalog, index, store, &schema.name, DeleteTarget::All)?;
            for column in &schema.columns {
                if index.column_exists(&schema.name, column) {
                    let _ = index.drop_index(&schema.name, column);
                }
            }
            catalog.drop_table_schema(store, &schema.name)?;
            Ok(Outcome::TableDropped(schema.name))
        }
        Statement::CreateIndex { table, column } => {
            if !catalog.column_exists(&table, &column) {
                return Err(crate::Error::Invalid(
                    format!("{}:{}", file!(), line!()),
                    format!("no such column '{}' on table '{}'", column, table),
                ));
            }
            index.create_index(&table, &column)?;
            Ok(Outcome::IndexCreated { table: ident::normalize(&table), column: ident::normalize(&column) })
        }
        Statement::InsertInto { table, columns, values } => {
            let values = match columns {
                None => values,
                Some(cols) => {
                    let schema = catalog.get_schema(&table).ok_or_else(|| {
                        crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table))
                    })?;
                    if cols.len() != values.len() {
                        return Err(crate::Error::Invalid(
                            format!("{}:{}", file!(), line!()),
                            format!("column list has {} name(s) but {} value(s) were given", cols.len(), values.len()),
                        ));
                    }
                    let mut reordered = vec![String::new(); schema.columns.len()];
                    let mut filled = vec![false; schema.columns.len()];
                    for (col, value) in cols.iter().zip(values.into_iter()) {
                        let idx = schema.column_index(col).ok_or_else(|| {
                            crate::Error::Invalid(format!("{}:{}", file!(), line!()), format!("no such column '{}'", col))
                        })?;
                        reordered[idx] = value;
                        filled[idx] = true;
                    }
                    if let Some(pos) = filled.iter().position(|f| !f) {
                        return Err(crate::Error::Invalid(
                            format!("{}:{}", file!(), line!()),
                            format!("missing value for column '{}'", schema.columns[pos]),
                        ));
                    }
                    reordered
                }
            };
            let id = TableManager::insert_into(catalog, index, store, &table, values)?;
            Ok(Outcome::RowInserted(id))
        }
        Statement::DeleteFrom { table, record_id } => {
            let target = match record_id {
                Some(id) => DeleteTarget::One(id),
                None => DeleteTarget::All,
            };
            let removed = TableManager::delete_from(catalog, index, store, &table, target)?;
            Ok(Outcome::RowsAffected(removed))
        }
        Statement::Update { table, set_column, set_value, predicate } => {
            let schema = catalog
                .get_schema(&table)
                .cloned()
                .ok_or_else(|| crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table)))?;
            let set_idx = schema.column_index(&set_column).ok_or_else(|| {
                crate::Error::Invalid(format!("{}:{}", file!(), line!()), format!("no such column '{}'", set_column))
            })?;

            // UPDATE's WHERE clause is always a plain equality lookup,
            // never the general predicate dispatcher (spec.md §4.5).
            let ids: Vec<_> = match &predicate {
                None => TableManager::scan(catalog, index, store, &schema.name)?.into_iter().map(|(id, _)| id).collect(),
                Some(p) => index.search(&schema.name, &p.column, &p.value).into_iter().collect(),
            };

            let mut affected = 0;
            for id in ids {
                let text = match store.select(id) {
                    Some(t) => t.to_string(),
                    None => continue,
                };
                let mut fields: Vec<String> =
                    crate::table::unpack_record(&text, &schema).iter().map(|s| s.to_string()).collect();
                fields[set_idx] = set_value.clone();
                TableManager::update(catalog, index, store, &schema.name, id, fields)?;
                affected += 1;
            }
            Ok(Outcome::RowsAffected(affected))
        }
        Statement::Select { table, projection, predicate } => {
            let schema = catalog
                .get_schema(&table)
                .cloned()
                .ok_or_else(|| crate::Error::NotFound(format!("{}:{}", file!(), line!()), format!("table '{}' does not exist", table)))?;
            let rows = dispatch::execute(catalog, index, store, &schema.name, &predicate)?;

            let (columns, projected): (Vec<String>, Vec<Vec<String>>) = match &projection {
                None => (schema.columns.clone(), rows.into_iter().map(|(_, fields)| fields).collect()),
                Some(cols) => {
                    let indices: Vec<usize> = cols
                        .iter()
                        .map(|c| {
                            schema.column_index(c).ok_or_else(|| {
                                crate::Error::Invalid(
                                    format!("{}:{}", file!(), line!()),
                                    format!("no such column '{}' on table '{}'", c, schema.name),
                                )
                            })
                        })
                        .collect::<Result<_>>()?;
                    let projected = rows
                        .into_iter()
                        .map(|(_, fields)| indices.iter().map(|&i| fields[i].clone()).collect())
                        .collect();
                    (cols.clone(), projected)
                }
            };
            Ok(Outcome::Rows { columns, rows: projected })
        }
    }
}
