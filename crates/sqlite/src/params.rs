//! Binding assignments to rusqlite statements

use rowmap_core::{Assignment, ColumnValue, Schema};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::trace;

/// Convert a cell value to an owned rusqlite value
pub fn to_sql_value(value: &ColumnValue) -> Value {
    match value {
        ColumnValue::Null => Value::Null,
        ColumnValue::Integer(n) => Value::Integer(*n),
        ColumnValue::Real(f) => Value::Real(*f),
        ColumnValue::Text(s) => Value::Text(s.clone()),
        ColumnValue::Blob(b) => Value::Blob(b.clone()),
    }
}

/// Quote an identifier for use in generated SQL
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Collapse assignments so each column appears once
///
/// A column keeps the position of its first assignment and the value of its
/// last.
pub fn collapse(assignments: &[Assignment]) -> Vec<(&str, &ColumnValue)> {
    let mut out: Vec<(&str, &ColumnValue)> = Vec::with_capacity(assignments.len());
    for a in assignments {
        match out.iter_mut().find(|(column, _)| *column == a.column) {
            Some(slot) => slot.1 = &a.value,
            None => out.push((a.column.as_str(), &a.value)),
        }
    }
    out
}

/// `INSERT` statement text and bound values for one record
pub fn insert_statement(table: &str, assignments: &[Assignment]) -> (String, Vec<Value>) {
    let cells = collapse(assignments);
    if cells.is_empty() {
        return (
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table)),
            Vec::new(),
        );
    }
    let columns: Vec<String> = cells.iter().map(|(c, _)| quote_ident(c)).collect();
    let placeholders: Vec<String> = (1..=cells.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns.join(", "),
        placeholders.join(", ")
    );
    let values = cells.iter().map(|(_, v)| to_sql_value(v)).collect();
    (sql, values)
}

/// `SELECT` of every schema column from `table`
pub fn select_statement(table: &str, schema: &Schema) -> String {
    let columns: Vec<String> = schema.column_names().iter().map(|c| quote_ident(c)).collect();
    if columns.is_empty() {
        return format!("SELECT * FROM {}", quote_ident(table));
    }
    format!("SELECT {} FROM {}", columns.join(", "), quote_ident(table))
}

/// Insert one encoded record, returning the rows changed
pub fn insert(conn: &Connection, table: &str, assignments: &[Assignment]) -> rusqlite::Result<usize> {
    let (sql, values) = insert_statement(table, assignments);
    trace!(table, columns = values.len(), "insert");
    conn.execute(&sql, params_from_iter(values))
}

/// Insert several encoded records inside one transaction
pub fn insert_many(
    conn: &mut Connection,
    table: &str,
    records: &[Vec<Assignment>],
) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    let mut changed = 0;
    for assignments in records {
        changed += insert(&tx, table, assignments)?;
    }
    tx.commit()?;
    Ok(changed)
}
