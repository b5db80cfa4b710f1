//! Turns resolved rows into named, chart-ready point sequences.

use serde::Serialize;

use crate::coerce::coerce;
use crate::resolve::{find_row, find_table_rows};
use crate::snapshot::{Row, TableSnapshot, DEFAULT_QUALIFIER, VALUE_FAMILY};

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Cosmetic table-name markers stripped from series names.
pub const DEFAULT_NAME_PREFIXES: [&str; 2] = ["t#", "usr_"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Epoch milliseconds.
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Where a per-table metric lives in each snapshot shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn<'a> {
    /// Row key in the current shape (`stats#du`).
    pub suffix: &'a str,
    /// `(family, qualifier)` in the legacy shape, if it ever carried the metric.
    pub legacy: Option<(&'a str, &'a str)>,
}

/// Strips each marker at most once, in order.
pub fn display_name(raw: &str, prefixes: &[&str]) -> String {
    let mut name = raw;
    for prefix in prefixes {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
        }
    }
    name.to_string()
}

/// Points of `row.columns[family][qualifier]`; absent row or column gives none.
///
/// Points without a recognised numeric tag are skipped.
pub fn column_points(row: Option<&Row>, family: &str, qualifier: &str) -> Vec<Point> {
    let Some(cells) = row.and_then(|r| r.column(family, qualifier)) else {
        return Vec::new();
    };
    cells
        .iter()
        .filter_map(|cell| {
            coerce(&cell.value).map(|y| Point {
                x: cell.timestamp_nanos / NANOS_PER_MILLI,
                y,
            })
        })
        .collect()
}

pub fn build_series(name: impl Into<String>, row: Option<&Row>, family: &str, qualifier: &str) -> Series {
    Series {
        name: name.into(),
        points: column_points(row, family, qualifier),
    }
}

/// Series for one system-scope row key, read from the `value:` column.
pub fn system_series(rows: &[Row], row_key: &str, name: &str) -> Series {
    build_series(name, find_row(rows, row_key), VALUE_FAMILY, DEFAULT_QUALIFIER)
}

pub fn drop_empty(series: Vec<Series>) -> Vec<Series> {
    series.into_iter().filter(|s| !s.is_empty()).collect()
}

/// One series per table that reported the metric, in snapshot order.
pub fn table_series(snapshot: &TableSnapshot, column: &TableColumn<'_>, prefixes: &[&str]) -> Vec<Series> {
    let all = match snapshot {
        TableSnapshot::Current(tables) => find_table_rows(tables, column.suffix)
            .into_iter()
            .map(|(table, row)| {
                build_series(display_name(table, prefixes), row, VALUE_FAMILY, DEFAULT_QUALIFIER)
            })
            .collect(),
        TableSnapshot::Legacy(rows) => match column.legacy {
            Some((family, qualifier)) => rows
                .iter()
                .map(|row| build_series(display_name(&row.row_key, prefixes), Some(row), family, qualifier))
                .collect(),
            None => Vec::new(),
        },
    };
    drop_empty(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MetricPoint, NumericVariant, TableMap};

    fn f(ts: i64, v: f64) -> MetricPoint {
        MetricPoint::new(ts, NumericVariant::float(v))
    }

    const DU: TableColumn<'static> = TableColumn {
        suffix: "stats#du",
        legacy: Some(("stats", "du")),
    };

    #[test]
    fn nanos_truncate_to_millis() {
        let row = Row::new("sys#cpu").with_column("value", "", [f(1_999_999, 1.0), f(3_000_000, 2.0)]);
        let points = column_points(Some(&row), "value", "");
        assert_eq!(points, vec![Point { x: 1, y: 1.0 }, Point { x: 3, y: 2.0 }]);
    }

    #[test]
    fn keeps_delivered_order() {
        let row = Row::new("k").with_column("value", "", [f(5_000_000, 1.0), f(1_000_000, 2.0)]);
        let xs: Vec<i64> = column_points(Some(&row), "value", "").iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![5, 1]);
    }

    #[test]
    fn malformed_points_are_skipped() {
        let row = Row::new("k").with_column(
            "value",
            "",
            [f(0, 1.0), MetricPoint::new(1_000_000, NumericVariant::default()), f(2_000_000, 3.0)],
        );
        assert_eq!(column_points(Some(&row), "value", "").len(), 2);
    }

    #[test]
    fn missing_row_or_column_is_empty() {
        assert!(column_points(None, "value", "").is_empty());
        let row = Row::new("k");
        assert!(column_points(Some(&row), "value", "").is_empty());
        assert!(system_series(&[row], "wal#len", "# journals").is_empty());
    }

    #[test]
    fn strips_cosmetic_prefixes_once() {
        assert_eq!(display_name("t#usr_orders", &DEFAULT_NAME_PREFIXES), "orders");
        assert_eq!(display_name("usr_orders", &DEFAULT_NAME_PREFIXES), "orders");
        assert_eq!(display_name("orders_usr_", &DEFAULT_NAME_PREFIXES), "orders_usr_");
        assert_eq!(display_name("t#t#x", &DEFAULT_NAME_PREFIXES), "t#x");
        assert_eq!(display_name("plain", &[]), "plain");
    }

    #[test]
    fn current_shape_drops_silent_tables() {
        let mut tables = TableMap::new();
        tables.insert("usr_b", vec![Row::new("stats#du").with_column("value", "", [f(0, 10.0)])]);
        tables.insert("a", vec![Row::new("stats#du")]);
        tables.insert("c", vec![]);
        tables.insert("d", vec![Row::new("stats#du").with_column("value", "", [f(0, 20.0)])]);

        let series = table_series(&TableSnapshot::Current(tables), &DU, &DEFAULT_NAME_PREFIXES);
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d"]);
        assert!(series.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn legacy_shape_reads_family_column() {
        let rows = vec![
            Row::new("t#usr_orders").with_column("stats", "du", [f(0, 512.0)]),
            Row::new("t#usr_users").with_column("stats", "seg_cnt", [f(0, 3.0)]),
        ];
        let series = table_series(&TableSnapshot::Legacy(rows), &DU, &DEFAULT_NAME_PREFIXES);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "orders");
        assert_eq!(series[0].points, vec![Point { x: 0, y: 512.0 }]);
    }

    #[test]
    fn legacy_shape_without_mapping_yields_nothing() {
        let rows = vec![Row::new("t#x").with_column("gc", "del_cnt", [f(0, 1.0)])];
        let column = TableColumn {
            suffix: "gc#del_cnt",
            legacy: None,
        };
        assert!(table_series(&TableSnapshot::Legacy(rows), &column, &DEFAULT_NAME_PREFIXES).is_empty());
    }
}
