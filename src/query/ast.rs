//! Parsed statement shapes. Grounded on the statement set accepted by
//! `parse_update`/`parse_select`/etc. in `src/query/query_parser.cpp`:
//! CREATE TABLE, DROP TABLE, CREATE INDEX, INSERT INTO, DELETE FROM,
//! UPDATE, SELECT.

use crate::catalog::DataType;

/// Comparison operators a WHERE clause may use against a single column.
/// spec.md §4.5 orders operator matching `>=`, `<=`, `!=` before `=`,
/// `>`, `<` so that a two-character operator is never mistaken for a
/// one-character prefix of itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Op {
    /// Operators in the precedence order they must be tried while
    /// scanning a WHERE clause for its operator.
    pub const PRECEDENCE: [(&'static str, Op); 6] = [
        (">=", Op::Ge),
        ("<=", Op::Le),
        ("!=", Op::Ne),
        ("=", Op::Eq),
        (">", Op::Gt),
        ("<", Op::Lt),
    ];
}

#[derive(Debug, Clone)]
pub struct Predicate {
    pub column: String,
    pub op: Op,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable {
        table: String,
        columns: Vec<ColumnDef>,
        primary_key: String,
    },
    DropTable {
        table: String,
    },
    CreateIndex {
        table: String,
        column: String,
    },
    InsertInto {
        table: String,
        columns: Option<Vec<String>>,
        values: Vec<String>,
    },
    /// `record_id` is the only predicate DELETE supports (spec.md §6):
    /// `None` means every row, `Some(id)` means exactly that record.
    DeleteFrom {
        table: String,
        record_id: Option<crate::store::RecordId>,
    },
    Update {
        table: String,
        set_column: String,
        set_value: String,
        predicate: Option<Predicate>,
    },
    /// `projection` is `None` for `SELECT *`, `Some(cols)` for a
    /// comma-separated column list (spec.md §4.5/§6).
    Select {
        table: String,
        projection: Option<Vec<String>>,
        predicate: Option<Predicate>,
    },
}
