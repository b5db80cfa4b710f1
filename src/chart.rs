//! Chart descriptions handed to the rendering library.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::page::PageData;
use crate::palette::{assign_colors, ColoredSeries, PALETTE};
use crate::panels::{ChartShape, MetricSelector, Panel, TableSource, PANELS};
use crate::series::{drop_empty, system_series, table_series, Series, DEFAULT_NAME_PREFIXES};
use crate::units::ValueCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub stacked: bool,
    pub show_legend_for_single: bool,
    pub unit: ValueCategory,
    pub series: Vec<ColoredSeries>,
}

impl ChartSpec {
    pub fn y_formatter(&self) -> fn(f64) -> String {
        self.unit.formatter()
    }

    pub fn format_y(&self, value: f64) -> String {
        self.unit.format(value)
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Latest value of the first series, formatted for the axis.
    pub fn latest_label(&self) -> Option<String> {
        let last = self.series.first()?.points.last()?;
        Some(self.format_y(last.y))
    }
}

/// Non-empty series for one panel, before coloring.
pub fn panel_series(panel: &Panel, data: &PageData) -> Vec<Series> {
    match panel.selector {
        MetricSelector::System { row_key, series_name } => {
            drop_empty(vec![system_series(&data.system, row_key, series_name)])
        }
        MetricSelector::Table { source, column } => {
            let snapshot = match source {
                TableSource::Stats => &data.tables,
                TableSource::Latency => data.latency_or_tables(),
            };
            table_series(snapshot, &column, &DEFAULT_NAME_PREFIXES)
        }
    }
}

pub fn render_panel(panel: &Panel, data: &PageData) -> ChartSpec {
    let (kind, stacked) = match panel.shape {
        ChartShape::Line => (ChartKind::Line, false),
        ChartShape::StackedArea => (ChartKind::Area, true),
    };
    ChartSpec {
        id: panel.id,
        title: panel.title,
        kind,
        stacked,
        show_legend_for_single: panel.always_show_legend,
        unit: panel.category,
        series: assign_colors(panel_series(panel, data), &PALETTE),
    }
}

/// Every registered panel, recomputed from `data`.
pub fn render_dashboard(data: &PageData) -> Vec<ChartSpec> {
    PANELS.iter().map(|panel| render_panel(panel, data)).collect()
}

/// Writes the chart descriptions as pretty JSON, creating parent directories.
pub fn write_charts(path: &str, charts: &[ChartSpec]) -> Result<()> {
    if let Some(dir) = Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
    }
    let body = serde_json::to_string_pretty(charts)?;
    std::fs::write(path, body).with_context(|| format!("writing {}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::find_panel;
    use crate::snapshot::{MetricPoint, NumericVariant, Row, TableMap, TableSnapshot};

    fn f(ts: i64, v: f64) -> MetricPoint {
        MetricPoint::new(ts, NumericVariant::float(v))
    }

    fn metric_row(key: &str, v: f64) -> Row {
        Row::new(key).with_column("value", "", [f(0, v)])
    }

    #[test]
    fn stacked_area_shape() {
        let spec = render_panel(find_panel("disk_usage").unwrap(), &PageData::default());
        assert_eq!(spec.kind, ChartKind::Area);
        assert!(spec.stacked);
        assert!(spec.series.is_empty());
        assert_eq!(spec.latest_label(), None);
    }

    #[test]
    fn latency_reads_dedicated_document_when_present() {
        let mut stats = TableMap::new();
        stats.insert("a", vec![metric_row("lat#read#row", 5.0)]);
        let mut latency = TableMap::new();
        latency.insert("b", vec![metric_row("lat#read#row", 1_500.0)]);

        let mut data = PageData {
            tables: TableSnapshot::Current(stats),
            ..PageData::default()
        };
        let panel = find_panel("point_read_latency").unwrap();
        assert_eq!(render_panel(panel, &data).series[0].name, "a");

        data.latency = Some(TableSnapshot::Current(latency));
        let spec = render_panel(panel, &data);
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].name, "b");
        assert_eq!(spec.latest_label().as_deref(), Some("1.50 ms"));
    }

    #[test]
    fn colors_restart_per_panel() {
        let mut tables = TableMap::new();
        for name in ["a", "b", "c"] {
            tables.insert(name, vec![metric_row("stats#row_cnt", 1.0), metric_row("stats#cell_cnt", 2.0)]);
        }
        let data = PageData {
            tables: TableSnapshot::Current(tables),
            ..PageData::default()
        };
        let charts = render_dashboard(&data);
        let rows = charts.iter().find(|c| c.id == "rows").unwrap();
        let cells = charts.iter().find(|c| c.id == "cells").unwrap();
        let colors = |c: &ChartSpec| c.series.iter().map(|s| s.color).collect::<Vec<_>>();
        assert_eq!(colors(rows), colors(cells));
        assert_eq!(rows.series[0].color, "#0ea5e9");
    }

    #[test]
    fn serialises_for_the_chart_library() {
        let data = PageData {
            system: vec![metric_row("sys#mem", 2048.0)],
            ..PageData::default()
        };
        let spec = render_panel(find_panel("mem").unwrap(), &data);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["stacked"], false);
        assert_eq!(json["unit"], "bytes");
        assert_eq!(json["series"][0]["name"], "Mem");
        assert_eq!(json["series"][0]["data"][0]["y"], 2048.0);
        assert_eq!(json["series"][0]["color"], "#0ea5e9");
        assert_eq!((spec.y_formatter())(2048.0), "2.0 KiB");
    }

    #[test]
    fn writes_charts_under_new_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("charts.json");
        let path = path.to_str().unwrap();
        let charts = render_dashboard(&PageData::default());
        write_charts(path, &charts).unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.as_array().map(Vec::len), Some(charts.len()));
        assert_eq!(written[0]["id"], "cpu");
    }

    #[test]
    fn write_under_a_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("charts");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("charts.json");

        let err = write_charts(path.to_str().unwrap(), &[]).unwrap_err();
        assert!(format!("{:#}", err).contains("creating"), "{:#}", err);
    }
}
