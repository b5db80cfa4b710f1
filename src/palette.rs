//! Per-panel series colors.
//!
//! Every panel starts with its own cursor over the shared palette, so one
//! panel's consumption never shifts another's colors.

use crate::series::{Point, Series};
use serde::Serialize;

/// Declared palette. Allocation takes entries from the end, so the first
/// series of a panel gets `#0ea5e9`.
pub const PALETTE: [&str; 7] = [
    "#f59e0b", "#22c55e", "#be185d", "#d946ef", "#8b5cf6", "#1d4ed8", "#0ea5e9",
];

/// Color for every series after the palette runs out.
pub const FALLBACK_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone)]
pub struct ColorAllocator<'a> {
    palette: &'a [&'static str],
    used: usize,
}

impl<'a> ColorAllocator<'a> {
    pub fn new(palette: &'a [&'static str]) -> Self {
        Self { palette, used: 0 }
    }

    pub fn next_color(&mut self) -> &'static str {
        if self.used >= self.palette.len() {
            return FALLBACK_COLOR;
        }
        self.used += 1;
        self.palette[self.palette.len() - self.used]
    }
}

impl Default for ColorAllocator<'static> {
    fn default() -> Self {
        Self::new(&PALETTE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColoredSeries {
    pub name: String,
    #[serde(rename = "data")]
    pub points: Vec<Point>,
    pub color: &'static str,
}

/// Colors one panel's series with a fresh allocator.
pub fn assign_colors(series: Vec<Series>, palette: &[&'static str]) -> Vec<ColoredSeries> {
    let mut colors = ColorAllocator::new(palette);
    series
        .into_iter()
        .map(|s| ColoredSeries {
            name: s.name,
            points: s.points,
            color: colors.next_color(),
        })
        .collect()
}
