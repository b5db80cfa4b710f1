//! Row lookups. "Not found" is an ordinary outcome: a table may not have
//! emitted a metric yet.

use crate::snapshot::{Row, TableMap};

/// First row whose key equals `row_key`.
pub fn find_row<'a>(rows: &'a [Row], row_key: &str) -> Option<&'a Row> {
    rows.iter().find(|row| row.row_key == row_key)
}

/// For every table, the row keyed by `suffix` (if the table has one).
///
/// Output follows the map's table order.
pub fn find_table_rows<'a>(tables: &'a TableMap, suffix: &str) -> Vec<(&'a str, Option<&'a Row>)> {
    tables
        .iter()
        .map(|(table, rows)| (table, find_row(rows, suffix)))
        .collect()
}
