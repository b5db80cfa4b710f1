//! Static dashboard catalog, in render order.

use crate::series::TableColumn;
use crate::units::ValueCategory;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartShape {
    Line,
    StackedArea,
}

/// Which embedded per-table document a table metric is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    Stats,
    /// Falls back to the stats document when the page carries no latency document.
    Latency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSelector {
    System {
        row_key: &'static str,
        series_name: &'static str,
    },
    Table {
        source: TableSource,
        column: TableColumn<'static>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    pub id: &'static str,
    pub title: &'static str,
    pub selector: MetricSelector,
    pub shape: ChartShape,
    pub category: ValueCategory,
    pub always_show_legend: bool,
}

const fn system(
    id: &'static str,
    title: &'static str,
    row_key: &'static str,
    series_name: &'static str,
    category: ValueCategory,
) -> Panel {
    Panel {
        id,
        title,
        selector: MetricSelector::System { row_key, series_name },
        shape: ChartShape::Line,
        category,
        always_show_legend: false,
    }
}

const fn stats(
    id: &'static str,
    title: &'static str,
    suffix: &'static str,
    legacy: Option<(&'static str, &'static str)>,
) -> Panel {
    Panel {
        id,
        title,
        selector: MetricSelector::Table {
            source: TableSource::Stats,
            column: TableColumn { suffix, legacy },
        },
        shape: ChartShape::Line,
        category: ValueCategory::Count,
        always_show_legend: false,
    }
}

const fn latency(
    id: &'static str,
    title: &'static str,
    suffix: &'static str,
    legacy: Option<(&'static str, &'static str)>,
) -> Panel {
    Panel {
        id,
        title,
        selector: MetricSelector::Table {
            source: TableSource::Latency,
            column: TableColumn { suffix, legacy },
        },
        shape: ChartShape::Line,
        category: ValueCategory::Duration,
        always_show_legend: true,
    }
}

pub static PANELS: &[Panel] = &[
    system("cpu", "CPU usage (system)", "sys#cpu", "CPU", ValueCategory::Percentage),
    system("mem", "Memory usage (system)", "sys#mem", "Mem", ValueCategory::Bytes),
    system("journals", "Journals count", "wal#len", "# journals", ValueCategory::Whole),
    system("write_buffer", "Write buffer size", "wbuf#size", "Write buffer", ValueCategory::Bytes),
    Panel {
        id: "disk_usage",
        title: "Disk usage",
        selector: MetricSelector::Table {
            source: TableSource::Stats,
            column: TableColumn {
                suffix: "stats#du",
                legacy: Some(("stats", "du")),
            },
        },
        shape: ChartShape::StackedArea,
        category: ValueCategory::Bytes,
        always_show_legend: true,
    },
    stats("segments", "Disk segments count", "stats#seg_cnt", Some(("stats", "seg_cnt"))),
    stats("rows", "Row count", "stats#row_cnt", Some(("stats", "row_cnt"))),
    stats("cells", "Cell count", "stats#cell_cnt", Some(("stats", "cell_cnt"))),
    stats("gc_deleted", "GC deleted cells", "gc#del_cnt", None),
    latency("write_latency", "Write latency", "lat#write#batch", Some(("lat", "w"))),
    latency("cell_write_latency", "Cell write latency", "lat#write#cell", None),
    latency("point_read_latency", "Point read latency", "lat#read#row", Some(("lat", "r#row"))),
    latency("scan_latency", "Scan latency", "lat#read#pfx", Some(("lat", "r#pfx"))),
    latency("delete_latency", "Delete row latency", "lat#del#row", Some(("lat", "del#row"))),
];

pub fn find_panel(id: &str) -> Option<&'static Panel> {
    PANELS.iter().find(|p| p.id == id)
}
