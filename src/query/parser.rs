//! Hand-rolled recursive-descent parser for the small SQL-like surface
//! spec.md §4.5/§7 describes. Grounded on the statement grammar of
//! `src/query/query_parser.cpp`, re-expressed as an idiomatic Rust
//! tokenizer + parser rather than a transliteration of the C++.

use super::ast::{ColumnDef, Op, Predicate, Statement};
use crate::catalog::DataType;
use crate::{err_at, ident, Result};

/// Split a statement into tokens: words, commas, and parenthesised
/// groups are all returned as separate tokens; quoted strings keep their
/// interior whitespace.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' => {
                tokens.push(c.to_string());
                chars.next();
            }
            '\'' | '"' => {
                let quote = c;
                chars.next();
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c == quote {
                        chars.next();
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                tokens.push(s);
            }
            _ => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == ',' {
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                tokens.push(s);
            }
        }
    }
    tokens
}

struct Cursor {
    tokens: Vec<String>,
    pos: usize,
}

impl Cursor {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|s| s.as_str())
    }

    fn peek_upper(&self) -> Option<String> {
        self.peek().map(|s| s.to_uppercase())
    }

    fn next(&mut self) -> Result<String> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| crate::Error::Invalid(format!("{}:{}", file!(), line!()), "unexpected end of statement".to_string()))?;
        self.pos += 1;
        Ok(tok)
    }

    fn expect(&mut self, word: &str) -> Result<()> {
        let tok = self.next()?;
        if tok.eq_ignore_ascii_case(word) {
            Ok(())
        } else {
            err_at!(Invalid, msg: "expected '{}', found '{}'", word, tok)
        }
    }

    fn expect_any(&mut self, words: &[&str]) -> Result<String> {
        let tok = self.next()?;
        if words.iter().any(|w| tok.eq_ignore_ascii_case(w)) {
            Ok(tok)
        } else {
            err_at!(Invalid, msg: "expected one of {:?}, found '{}'", words, tok)
        }
    }
}

/// Parse one statement. Input is expected without a trailing `;`, though
/// a single trailing `;` token is tolerated and dropped.
pub fn parse(input: &str) -> Result<Statement> {
    let mut tokens = tokenize(input);
    if tokens.last().map(|t| t == ";").unwrap_or(false) {
        tokens.pop();
    }
    if tokens.is_empty() {
        return err_at!(Invalid, msg: "empty statement");
    }
    let mut cur = Cursor { tokens, pos: 0 };
    let keyword = cur.peek_upper().unwrap_or_default();
    match keyword.as_str() {
        "CREATE" => parse_create(&mut cur),
        "DROP" => parse_drop_table(&mut cur),
        "INSERT" => parse_insert(&mut cur),
        "DELETE" => parse_delete(&mut cur),
        "UPDATE" => parse_update(&mut cur),
        "SELECT" => parse_select(&mut cur),
        other => err_at!(Invalid, msg: "unrecognised statement keyword '{}'", other),
    }
}

fn parse_create(cur: &mut Cursor) -> Result<Statement> {
    cur.expect("CREATE")?;
    let what = cur.expect_any(&["TABLE", "INDEX"])?;
    if what.eq_ignore_ascii_case("TABLE") {
        parse_create_table(cur)
    } else {
        parse_create_index(cur)
    }
}

fn parse_create_table(cur: &mut Cursor) -> Result<Statement> {
    let table = cur.next()?;
    cur.expect("(")?;
    let mut columns = Vec::new();
    let mut primary_key = None;
    loop {
        // `PRIMARY KEY (<col>)` is one of the comma-separated items inside
        // the column list itself, not a separate trailing clause —
        // matching `query_parser.cpp`'s `parse_create_table`.
        if cur.peek_upper().as_deref() == Some("PRIMARY") {
            cur.expect("PRIMARY")?;
            cur.expect("KEY")?;
            cur.expect("(")?;
            primary_key = Some(cur.next()?);
            cur.expect(")")?;
        } else {
            let name = cur.next()?;
            let type_tok = cur.next()?;
            let data_type = parse_data_type(&type_tok);
            columns.push(ColumnDef { name, data_type });
        }
        match cur.next()?.as_str() {
            "," => continue,
            ")" => break,
            other => return err_at!(Invalid, msg: "expected ',' or ')' in column list, found '{}'", other),
        }
    }
    let primary_key = primary_key.ok_or_else(|| {
        crate::Error::Invalid(format!("{}:{}", file!(), line!()), "CREATE TABLE requires a PRIMARY KEY clause".to_string())
    })?;
    Ok(Statement::CreateTable { table, columns, primary_key })
}

/// Maps the token to a [`DataType`], falling back to `Unknown` for
/// anything unrecognised rather than failing the parse here —
/// `CatalogManager::create_table` is what rejects an `Unknown` column
/// type, matching `data_type.h`'s `parse_type`/`parse_create_table`
/// split between original_source's type parser and its caller.
fn parse_data_type(tok: &str) -> DataType {
    match tok.to_uppercase().as_str() {
        "INT" | "INTEGER" => DataType::Int,
        "VARCHAR" | "TEXT" | "STRING" => DataType::Varchar,
        "FLOAT" | "DOUBLE" => DataType::Float,
        _ => DataType::Unknown,
    }
}

fn parse_create_index(cur: &mut Cursor) -> Result<Statement> {
    cur.expect("ON")?;
    let table = cur.next()?;
    cur.expect("(")?;
    let column = cur.next()?;
    cur.expect(")")?;
    Ok(Statement::CreateIndex { table, column })
}

fn parse_drop_table(cur: &mut Cursor) -> Result<Statement> {
    cur.expect("DROP")?;
    cur.expect("TABLE")?;
    let table = cur.next()?;
    Ok(Statement::DropTable { table })
}

fn parse_insert(cur: &mut Cursor) -> Result<Statement> {
    cur.expect("INSERT")?;
    cur.expect("INTO")?;
    let table = cur.next()?;
    // Optional `(<col>, ...)` list before VALUES; the executor reorders
    // the parsed values into schema column order when this is present.
    let columns = if cur.peek() == Some("(") {
        cur.expect("(")?;
        let mut cols = Vec::new();
        loop {
            cols.push(ident::normalize(&cur.next()?));
            match cur.next()?.as_str() {
                "," => continue,
                ")" => break,
                other => return err_at!(Invalid, msg: "expected ',' or ')' in column list, found '{}'", other),
            }
        }
        Some(cols)
    } else {
        None
    };
    cur.expect("VALUES")?;
    cur.expect("(")?;
    let mut values = Vec::new();
    loop {
        values.push(cur.next()?);
        match cur.next()?.as_str() {
            "," => continue,
            ")" => break,
            other => return err_at!(Invalid, msg: "expected ',' or ')' in VALUES list, found '{}'", other),
        }
    }
    Ok(Statement::InsertInto { table, columns, values })
}

fn parse_predicate(cur: &mut Cursor) -> Result<Predicate> {
    let column = cur.next()?;
    let op_tok = cur.next()?;
    let op = match op_tok.as_str() {
        ">=" => Op::Ge,
        "<=" => Op::Le,
        "!=" | "<>" => Op::Ne,
        "=" => Op::Eq,
        ">" => Op::Gt,
        "<" => Op::Lt,
        other => return err_at!(Invalid, msg: "unknown comparison operator '{}'", other),
    };
    let value = cur.next()?;
    Ok(Predicate { column: ident::normalize(&column), op, value })
}

fn parse_optional_where(cur: &mut Cursor) -> Result<Option<Predicate>> {
    if cur.peek_upper().as_deref() == Some("WHERE") {
        cur.next()?;
        Ok(Some(parse_predicate(cur)?))
    } else {
        Ok(None)
    }
}

/// `DELETE FROM <t> [WHERE record_id = <id>]` — the only predicate DELETE
/// supports is an equality test on `record_id` (spec.md §6); anything
/// else is rejected here rather than left to the executor.
fn parse_delete(cur: &mut Cursor) -> Result<Statement> {
    cur.expect("DELETE")?;
    cur.expect("FROM")?;
    let table = cur.next()?;
    let record_id = match parse_optional_where(cur)? {
        None => None,
        Some(p) => {
            if !p.column.eq_ignore_ascii_case("record_id") {
                return err_at!(Invalid, msg: "DELETE only supports WHERE record_id = <id>, found column '{}'", p.column);
            }
            if p.op != Op::Eq {
                return err_at!(Invalid, msg: "DELETE only supports '=' on record_id, found a different operator");
            }
            let id: crate::store::RecordId = err_at!(Invalid, p.value.parse())?;
            Some(id)
        }
    };
    Ok(Statement::DeleteFrom { table, record_id })
}

fn parse_update(cur: &mut Cursor) -> Result<Statement> {
    cur.expect("UPDATE")?;
    let table = cur.next()?;
    cur.expect("SET")?;
    let set_column = ident::normalize(&cur.next()?);
    cur.expect("=")?;
    let set_value = cur.next()?;
    // spec.md §4.5: UPDATE's WHERE clause is always a plain equality
    // lookup through the index, never the general predicate dispatcher.
    let predicate = match parse_optional_where(cur)? {
        Some(p) if p.op == Op::Eq => Some(p),
        Some(p) => {
            return err_at!(Invalid, msg: "UPDATE ... WHERE only supports '=', found operator on column '{}'", p.column)
        }
        None => None,
    };
    Ok(Statement::Update { table, set_column, set_value, predicate })
}

/// `SELECT <*|cols> FROM <t> [WHERE ...]` — `*` parses to `None`
/// (project every column), a comma-separated column list to `Some`.
fn parse_select(cur: &mut Cursor) -> Result<Statement> {
    cur.expect("SELECT")?;
    let projection = if cur.peek() == Some("*") {
        cur.next()?;
        None
    } else {
        let mut cols = vec![ident::normalize(&cur.next()?)];
        while cur.peek() == Some(",") {
            cur.next()?;
            cols.push(ident::normalize(&cur.next()?));
        }
        Some(cols)
    };
    cur.expect("FROM")?;
    let table = cur.next()?;
    let predicate = parse_optional_where(cur)?;
    Ok(Statement::Select { table, projection, predicate })
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod parser_test;
