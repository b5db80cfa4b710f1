//! Snapshot embedding in the dashboard page.
//!
//! The server serialises its snapshots into `<script type="application/json">`
//! elements; mounting reads them back by element id. Both directions live here
//! so the element ids and placeholders stay in one place.

use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

use crate::snapshot::{Row, SystemSnapshot, TableSnapshot};

pub const SYSTEM_ELEMENT_ID: &str = "system-metrics-data";
pub const TABLES_ELEMENT_ID: &str = "disk-usage-data";
pub const LATENCY_ELEMENT_ID: &str = "latency-data";

pub const SYSTEM_PLACEHOLDER: &str = "{{system_metrics}}";
pub const TABLES_PLACEHOLDER: &str = "{{table_stats}}";
pub const LATENCY_PLACEHOLDER: &str = "{{latency_stats}}";
pub const RENDER_TIME_PLACEHOLDER: &str = "{{render_time_ms}}";

pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Dashboard</title>
</head>
<body>
  <div id="app"></div>
  <script id="system-metrics-data" type="application/json">{{system_metrics}}</script>
  <script id="disk-usage-data" type="application/json">{{table_stats}}</script>
  <script id="latency-data" type="application/json">{{latency_stats}}</script>
  <footer>rendered in {{render_time_ms}} ms</footer>
</body>
</html>
"#;

#[derive(Debug, Error)]
pub enum MountError {
    #[error("page has no element with id `{0}`")]
    MissingElement(&'static str),
    #[error("element `{id}` does not hold a valid snapshot: {source}")]
    Parse {
        id: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything one page load renders from. Immutable once mounted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageData {
    pub system: SystemSnapshot,
    pub tables: TableSnapshot,
    pub latency: Option<TableSnapshot>,
}

impl PageData {
    /// Latency document, or the stats document when the page carries one combined set.
    pub fn latency_or_tables(&self) -> &TableSnapshot {
        self.latency.as_ref().unwrap_or(&self.tables)
    }

    /// Parses the embedded documents. `lookup` returns an element's text content.
    pub fn mount<'a, F>(lookup: F) -> Result<Self, MountError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let system = parse_element(SYSTEM_ELEMENT_ID, lookup(SYSTEM_ELEMENT_ID))?;
        let tables = parse_element(TABLES_ELEMENT_ID, lookup(TABLES_ELEMENT_ID))?;
        let latency = match lookup(LATENCY_ELEMENT_ID) {
            Some(text) if !text.trim().is_empty() => Some(parse_element(LATENCY_ELEMENT_ID, Some(text))?),
            _ => None,
        };
        Ok(PageData {
            system,
            tables,
            latency,
        })
    }

    pub fn from_html(html: &str) -> Result<Self, MountError> {
        Self::mount(|id| element_text(html, id))
    }
}

fn parse_element<T: serde::de::DeserializeOwned>(id: &'static str, text: Option<&str>) -> Result<T, MountError> {
    let text = text.ok_or(MountError::MissingElement(id))?;
    serde_json::from_str(text).map_err(|source| MountError::Parse { id, source })
}

/// Text content of the element carrying `id="<id>"`.
pub fn element_text<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let needle = format!(" id=\"{}\"", id);
    let attr = html.find(&needle)?;
    let open = html[..attr].rfind('<')?;
    let tag = html[open + 1..attr].split_whitespace().next()?;
    let body_start = attr + html[attr..].find('>')? + 1;
    let close = format!("</{}>", tag);
    let body_len = html[body_start..].find(&close)?;
    Some(&html[body_start..body_start + body_len])
}

/// JSON safe to place inside a `<script>` element.
pub fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Fills the page placeholders the way the server renders the dashboard.
pub fn embed(
    template: &str,
    system: &[Row],
    tables: &TableSnapshot,
    latency: Option<&TableSnapshot>,
    render_time: Duration,
) -> serde_json::Result<String> {
    let latency = match latency {
        Some(snapshot) => script_json(snapshot)?,
        None => String::new(),
    };
    Ok(template
        .replace(SYSTEM_PLACEHOLDER, &script_json(system)?)
        .replace(TABLES_PLACEHOLDER, &script_json(tables)?)
        .replace(LATENCY_PLACEHOLDER, &latency)
        .replace(RENDER_TIME_PLACEHOLDER, &render_time.as_millis().to_string()))
}

/// Hex SHA-256 of a page, used to correlate reloads in the logs.
pub fn page_digest(html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    hex::encode(hasher.finalize())
}
