//! Axis value formatting per metric category.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    Percentage,
    Bytes,
    /// SI-suffixed count (`k`, `M`).
    Count,
    /// Microsecond input.
    Duration,
    /// Plain integer, floored.
    Whole,
}

impl ValueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueCategory::Percentage => "percentage",
            ValueCategory::Bytes => "bytes",
            ValueCategory::Count => "count",
            ValueCategory::Duration => "duration",
            ValueCategory::Whole => "whole",
        }
    }

    pub fn formatter(&self) -> fn(f64) -> String {
        match self {
            ValueCategory::Percentage => format_percentage,
            ValueCategory::Bytes => format_bytes,
            ValueCategory::Count => format_count,
            ValueCategory::Duration => format_duration,
            ValueCategory::Whole => format_whole,
        }
    }

    pub fn format(&self, value: f64) -> String {
        (self.formatter())(value)
    }
}

/// Half-to-even rounding: `12.5 -> "12 %"`.
pub fn format_percentage(value: f64) -> String {
    format!("{} %", value.round_ties_even() as i64)
}

const BYTE_UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

pub fn format_bytes(bytes: f64) -> String {
    if bytes < 1024.0 {
        return format!("{} B", bytes as i64);
    }
    let mut scaled = bytes / 1024.0;
    let mut unit = BYTE_UNITS[0];
    for next in &BYTE_UNITS[1..] {
        if scaled < 1024.0 {
            break;
        }
        scaled /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", scaled, unit)
}

/// Quotients are printed as-is, so `999_999 -> "999.999k"`.
pub fn format_count(value: f64) -> String {
    if value < 1_000.0 {
        return format!("{}", value);
    }
    if value < 1_000_000.0 {
        return format!("{}k", value / 1_000.0);
    }
    format!("{}M", value / 1_000.0 / 1_000.0)
}

pub fn format_duration(micros: f64) -> String {
    if micros < 1_000.0 {
        return format!("{} µs", micros);
    }
    if micros < 1_000_000.0 {
        return format!("{} ms", fixed2(micros / 1_000.0));
    }
    format!("{} s", fixed2(micros / 1_000.0 / 1_000.0))
}

/// Two decimals; an exact tie (`1.125`) rounds away from zero.
fn fixed2(value: f64) -> String {
    let scaled = value * 100.0;
    let product_exact = value.mul_add(100.0, -scaled) == 0.0;
    if product_exact && scaled.fract().abs() == 0.5 {
        return format!("{:.2}", (scaled + 0.5f64.copysign(scaled)) / 100.0);
    }
    format!("{:.2}", value)
}

pub fn format_whole(value: f64) -> String {
    format!("{}", value.floor() as i64)
}
