//! Telemetry snapshot model.
//!
//! Mirrors the JSON the storage server embeds in the dashboard page:
//! rows of `family -> qualifier -> [cell]`, where each cell carries a
//! nanosecond timestamp and a single-tag numeric value.

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Column family every current-shape metric row writes into.
pub const VALUE_FAMILY: &str = "value";

/// Qualifier of a single-valued column.
pub const DEFAULT_QUALIFIER: &str = "";

/// Numeric value as the store tags it: exactly one field is expected to be set.
///
/// Tags the dashboard doesn't know (`String`, `Boolean`, ...) are dropped at
/// parse time, leaving the variant empty. So are known tags whose value doesn't
/// fit (`{"U8":300}`, `{"I32":1.5}`, `null`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericVariant {
    #[serde(rename = "F64", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub f64: Option<f64>,
    #[serde(rename = "F32", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub f32: Option<f32>,
    #[serde(rename = "I64", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub i64: Option<i64>,
    #[serde(rename = "I32", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub i32: Option<i32>,
    #[serde(rename = "U8", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub u8: Option<u8>,
    #[serde(rename = "Byte", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub byte: Option<u8>,
}

impl NumericVariant {
    pub fn float(value: f64) -> Self {
        Self {
            f64: Some(value),
            ..Self::default()
        }
    }

    pub fn legacy_u8(value: u8) -> Self {
        Self {
            u8: Some(value),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    #[serde(rename = "timestamp")]
    pub timestamp_nanos: i64,
    #[serde(default, deserialize_with = "lenient_variant")]
    pub value: NumericVariant,
}

/// A tag value that doesn't fit its type reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

/// `"value": null` or a non-object value leaves the point without a number.
fn lenient_variant<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NumericVariant, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

impl MetricPoint {
    pub fn new(timestamp_nanos: i64, value: NumericVariant) -> Self {
        Self {
            timestamp_nanos,
            value,
        }
    }
}

/// Points of one (row, family, qualifier) column, timestamp-ascending as delivered.
pub type ColumnSeries = Vec<MetricPoint>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub row_key: String,
    #[serde(default)]
    pub columns: HashMap<String, HashMap<String, ColumnSeries>>,
}

impl Row {
    pub fn new(row_key: impl Into<String>) -> Self {
        Self {
            row_key: row_key.into(),
            columns: HashMap::new(),
        }
    }

    /// Builder used by fixtures and the server-side embedder.
    pub fn with_column(
        mut self,
        family: &str,
        qualifier: &str,
        points: impl IntoIterator<Item = MetricPoint>,
    ) -> Self {
        self.columns
            .entry(family.to_string())
            .or_default()
            .entry(qualifier.to_string())
            .or_default()
            .extend(points);
        self
    }

    pub fn column(&self, family: &str, qualifier: &str) -> Option<&ColumnSeries> {
        self.columns.get(family)?.get(qualifier)
    }

    pub fn cell_count(&self) -> usize {
        self.columns
            .values()
            .map(|family| family.values().map(Vec::len).sum::<usize>())
            .sum()
    }
}

/// System-scope snapshot: one row per metric key (`sys#cpu`, `wal#len`, ...).
pub type SystemSnapshot = Vec<Row>;

/// Table name -> metric rows, in the order the server emitted the tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMap {
    entries: Vec<(String, Vec<Row>)>,
}

impl TableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a table, replacing the rows of an existing entry with the same name.
    pub fn insert(&mut self, table: impl Into<String>, rows: Vec<Row>) {
        let table = table.into();
        match self.entries.iter_mut().find(|(name, _)| *name == table) {
            Some(entry) => entry.1 = rows,
            None => self.entries.push((table, rows)),
        }
    }

    pub fn get(&self, table: &str) -> Option<&[Row]> {
        self.entries
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Row])> {
        self.entries
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<Row>)> for TableMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Row>)>>(iter: I) -> Self {
        let mut map = TableMap::new();
        for (table, rows) in iter {
            map.insert(table, rows);
        }
        map
    }
}

impl Serialize for TableMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (table, rows) in &self.entries {
            map.serialize_entry(table, rows)?;
        }
        map.end()
    }
}

struct TableMapVisitor;

impl<'de> Visitor<'de> for TableMapVisitor {
    type Value = TableMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of table name to metric rows")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TableMap, A::Error> {
        let mut map = TableMap::new();
        while let Some((table, rows)) = access.next_entry::<String, Vec<Row>>()? {
            map.insert(table, rows);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for TableMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableMapVisitor)
    }
}

/// Per-table snapshot in either wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableSnapshot {
    /// One row per table; the row key carries the (prefixed) table name.
    Legacy(Vec<Row>),
    /// Table name -> one row per metric suffix (`stats#du`, `lat#write#batch`, ...).
    Current(TableMap),
}

impl Default for TableSnapshot {
    fn default() -> Self {
        TableSnapshot::Current(TableMap::new())
    }
}

impl TableSnapshot {
    pub fn table_count(&self) -> usize {
        match self {
            TableSnapshot::Legacy(rows) => rows.len(),
            TableSnapshot::Current(map) => map.len(),
        }
    }

    pub fn cell_count(&self) -> usize {
        match self {
            TableSnapshot::Legacy(rows) => rows.iter().map(Row::cell_count).sum(),
            TableSnapshot::Current(map) => map
                .iter()
                .flat_map(|(_, rows)| rows.iter())
                .map(Row::cell_count)
                .sum(),
        }
    }
}
