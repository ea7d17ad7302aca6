//! Result set rendering for terminal output.
//!
//! Two formats: an aligned text table for humans, and a JSON array of
//! row objects for piping into other tools.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sqlgate_client::{ResultSet, Value};

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Render a result set as an aligned text table, with a trailing row count.
///
/// Statements without a projection (INSERT, DDL, ...) render as `(ok)`.
pub fn render_table(rs: &ResultSet) -> String {
    if rs.columns().is_empty() {
        return "(ok)\n".to_string();
    }

    let cells: Vec<Vec<String>> = rs
        .rows()
        .iter()
        .map(|row| row.values().iter().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = rs.columns().iter().map(|c| width(c)).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(width(cell));
        }
    }

    let separators: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    push_row(&mut out, rs.columns().iter().map(String::as_str), &widths);
    push_row(&mut out, separators.iter().map(String::as_str), &widths);
    for row in &cells {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }

    let n = rs.len();
    let plural = if n == 1 { "" } else { "s" };
    out.push_str(&format!("({n} row{plural})\n"));
    out
}

// Column widths count characters, not bytes, so multi-byte text lines up.
fn width(cell: &str) -> usize {
    cell.chars().count()
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut first = true;
    for (cell, col_width) in cells.zip(widths) {
        if !first {
            out.push_str("  ");
        }
        first = false;
        out.push_str(cell);
        // Pad to the column width; trailing spaces are trimmed per line below.
        for _ in width(cell)..*col_width {
            out.push(' ');
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

// ---------------------------------------------------------------------------
// JSON rendering
// ---------------------------------------------------------------------------

/// Render a result set as a JSON array of one object per row.
///
/// Blobs are base64-encoded strings; everything else maps to its natural
/// JSON scalar.
pub fn render_json(rs: &ResultSet) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = rs
        .rows()
        .iter()
        .map(|row| {
            let obj: serde_json::Map<String, serde_json::Value> = rs
                .columns()
                .iter()
                .zip(row.values())
                .map(|(col, value)| (col.clone(), json_value(value)))
                .collect();
            serde_json::Value::Object(obj)
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Real(r) => serde_json::Value::from(*r),
        Value::Text(s) => serde_json::Value::from(s.as_str()),
        Value::Blob(b) => serde_json::Value::from(BASE64.encode(b)),
    }
}
