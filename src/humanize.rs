//! Human-readable rendering of durations and byte counts.
//!
//! Durations are recorded in microseconds and promoted along the ladder
//! `mus -> ms -> secs -> mins -> hrs -> days -> years`. Byte counts are
//! promoted in powers of 1024.

use crate::measurement::Measurement;

pub const DEFAULT_PRECISION: usize = 2;

pub const DURATION_UNITS: [&str; 7] = ["mus", "ms", "secs", "mins", "hrs", "days", "years"];

pub const BYTE_UNITS: [&str; 5] = ["bytes", "KiB", "MiB", "GiB", "TiB"];

pub const MICROS_PER_MILLI: f64 = 1_000.0;
pub const MICROS_PER_SEC: f64 = 1_000_000.0;
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

const DAYS_PER_YEAR: f64 = 365.25;

/// Renders a microsecond duration in the largest sensible unit.
///
/// ```
/// use polyreport::humanize::humanize_micros;
/// assert_eq!(humanize_micros(1_500.0, 2), "1.50 ms");
/// assert_eq!(humanize_micros(0.0, 2), "0.00 mus");
/// ```
pub fn humanize_micros(micros: f64, precision: usize) -> String {
    let mut value = micros;
    let mut idx = 0usize;

    while value >= 1000.0 && idx < 2 {
        value /= 1000.0;
        idx += 1;
    }
    while value >= 60.0 && (2..4).contains(&idx) {
        value /= 60.0;
        idx += 1;
    }
    if idx == 4 && value >= 24.0 {
        value /= 24.0;
        idx += 1;
    }
    if idx == 5 && value >= DAYS_PER_YEAR {
        value /= DAYS_PER_YEAR;
        idx += 1;
    }

    assert!(
        idx < DURATION_UNITS.len(),
        "duration ladder overflow at index {idx}"
    );
    format!("{value:.precision$} {}", DURATION_UNITS[idx])
}

/// Humanizes a cell, leaving unmeasured entries untouched.
pub fn humanize_measurement(measurement: &Measurement, precision: usize) -> Option<String> {
    measurement
        .value()
        .map(|micros| humanize_micros(micros, precision))
}

pub fn humanize_bytes(bytes: f64, precision: usize) -> String {
    let mut value = bytes;
    let mut idx = 0usize;
    while value >= 1024.0 && idx < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    format!("{value:.precision$} {}", BYTE_UNITS[idx])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationUnit {
    Micros,
    Millis,
    Secs,
}

impl DurationUnit {
    pub fn label(self) -> &'static str {
        match self {
            DurationUnit::Micros => "microseconds",
            DurationUnit::Millis => "milliseconds",
            DurationUnit::Secs => "seconds",
        }
    }
}

pub fn convert_micros(micros: f64, unit: DurationUnit) -> f64 {
    match unit {
        DurationUnit::Micros => micros,
        DurationUnit::Millis => micros / MICROS_PER_MILLI,
        DurationUnit::Secs => micros / MICROS_PER_SEC,
    }
}
