//! Reporting toolkit for polynomial-commitment benchmark results.
//! Turns benchmark CSVs into humanized tables, LaTeX macro reports and PNG charts.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod bench_utils;
pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod export;
pub mod humanize;
pub mod labels;
pub mod latex;
pub mod measurement;
pub mod plot;
pub mod table;

pub use crate::compare::{Comparison, CompareOptions, Crossover, RatioPoint, compare, compare_all};
pub use crate::config::ReportConfig;
pub use crate::errors::ReportError;
pub use crate::export::{Experiment, Report};
pub use crate::humanize::humanize_micros;
pub use crate::labels::LabelMap;
pub use crate::latex::MacroWriter;
pub use crate::measurement::{Measurement, Series};
pub use crate::plot::{ChartJob, ChartSpec, ChartStyle};
pub use crate::table::BenchTable;
