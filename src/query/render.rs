//! Render SELECT results for the REPL.
//!
//! spec.md §7 only asks that results be legible on a terminal; this
//! module has two renderers picked at compile time by the `pretty-print`
//! feature, mirroring how the teacher repo gates optional dependencies
//! behind a Cargo feature rather than a runtime flag.

#[cfg(feature = "pretty-print")]
pub fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut table = prettytable::Table::new();
    table.add_row(prettytable::Row::new(
        columns.iter().map(|c| prettytable::Cell::new(c)).collect(),
    ));
    for row in rows {
        table.add_row(prettytable::Row::new(row.iter().map(|v| prettytable::Cell::new(v)).collect()));
    }
    table.to_string()
}

#[cfg(not(feature = "pretty-print"))]
pub fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(value.len());
            }
        }
    }

    let mut out = String::new();
    out.push_str(&render_row(columns, &widths));
    out.push('\n');
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&render_row(&separator, &widths));
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row, &widths));
        out.push('\n');
    }
    out
}

#[cfg(not(feature = "pretty-print"))]
fn render_row(values: &[String], widths: &[usize]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:width$}", v, width = widths.get(i).copied().unwrap_or(v.len())))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
