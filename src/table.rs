//! In-memory benchmark tables loaded from CSV.
//!
//! Every transform returns a new table; cells are never mutated while the
//! table is being walked.

use std::{fmt::Write as _, fs::File, path::Path};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::debug;

use crate::{
    ReportError,
    humanize::{humanize_bytes, humanize_micros},
    labels::LabelMap,
    measurement::{Measurement, Series, format_number},
};

pub const USEC_SUFFIX: &str = "_usec";
pub const HUM_SUFFIX: &str = "_hum";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BenchTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl BenchTable {
    pub fn from_records<H, R, C>(headers: H, rows: R) -> Result<Self, ReportError>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut table_rows = Vec::new();
        for (idx, row) in rows.into_iter().enumerate() {
            let row: Vec<String> = row.into_iter().map(Into::into).collect();
            if row.len() != headers.len() {
                return Err(ReportError::invalid_input(format!(
                    "row {idx} has {} cells, expected {}",
                    row.len(),
                    headers.len()
                )));
            }
            table_rows.push(row);
        }
        Ok(Self {
            headers,
            rows: table_rows,
        })
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| ReportError::csv(format!("{}: {e}", path.display())))?;
        let headers = reader
            .headers()
            .map_err(|e| ReportError::csv(format!("{}: {e}", path.display())))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| ReportError::csv(format!("{}: {e}", path.display())))?;
            if record.len() > headers.len() {
                return Err(ReportError::csv(format!(
                    "{}: row {} has {} cells but the header has {}",
                    path.display(),
                    idx + 1,
                    record.len(),
                    headers.len()
                )));
            }
            // short rows are padded with unmeasured cells
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }
        debug!(path = %path.display(), rows = rows.len(), "read csv");
        Ok(Self { headers, rows })
    }

    pub fn read_all<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ReportError> {
        if paths.is_empty() {
            return Err(ReportError::invalid_input("no CSV files given"));
        }
        let tables = paths
            .iter()
            .map(Self::read_csv)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::concat(tables))
    }

    /// Row-wise concatenation over the union of all headers; cells missing
    /// from a table are left blank.
    pub fn concat<I: IntoIterator<Item = BenchTable>>(tables: I) -> Self {
        let tables: Vec<BenchTable> = tables.into_iter().collect();
        let mut headers: Vec<String> = Vec::new();
        for table in &tables {
            for header in &table.headers {
                if !headers.contains(header) {
                    headers.push(header.clone());
                }
            }
        }
        let mut rows = Vec::new();
        for table in tables {
            let positions: Vec<Option<usize>> = headers
                .iter()
                .map(|h| table.headers.iter().position(|own| own == h))
                .collect();
            for row in table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|pos| pos.map(|p| row[p].clone()).unwrap_or_default())
                        .collect(),
                );
            }
        }
        Self { headers, rows }
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ReportError::io(format!("{}: {e}", path.display())))?;
        let mut writer = WriterBuilder::new().from_writer(file);
        writer
            .write_record(&self.headers)
            .map_err(|e| ReportError::csv(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| ReportError::csv(e.to_string()))?;
        }
        writer.flush().map_err(|e| ReportError::io(e.to_string()))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize, ReportError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::missing_column(name))
    }

    pub fn column(&self, name: &str) -> Result<Vec<&str>, ReportError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    pub fn measurements(&self, name: &str) -> Result<Vec<Measurement>, ReportError> {
        Ok(self
            .column(name)?
            .into_iter()
            .map(Measurement::parse)
            .collect())
    }

    /// Numeric column where every cell must parse.
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>, ReportError> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(idx, cell)| {
                Measurement::parse(cell).value().ok_or_else(|| {
                    ReportError::invalid_input(format!(
                        "column '{name}' row {idx}: '{cell}' is not a number"
                    ))
                })
            })
            .collect()
    }

    pub fn unique(&self, name: &str) -> Result<Vec<String>, ReportError> {
        let mut seen: Vec<String> = Vec::new();
        for cell in self.column(name)? {
            if !seen.iter().any(|s| s == cell) {
                seen.push(cell.to_string());
            }
        }
        Ok(seen)
    }

    pub fn unique_numbers(&self, name: &str) -> Result<Vec<f64>, ReportError> {
        let mut seen: Vec<f64> = Vec::new();
        for value in self.numbers(name)? {
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Ok(seen)
    }

    pub fn min_max(&self, name: &str) -> Result<Option<(f64, f64)>, ReportError> {
        let values = self.numbers(name)?;
        Ok(values.iter().copied().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        }))
    }

    pub fn canonicalize(&self, name: &str, labels: &LabelMap) -> Result<Self, ReportError> {
        let idx = self.column_index(name)?;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[idx] = labels.canonical(&row[idx]).to_string();
                row
            })
            .collect();
        Ok(Self {
            headers: self.headers.clone(),
            rows,
        })
    }

    pub fn filter_eq(&self, name: &str, value: &str) -> Result<Self, ReportError> {
        let idx = self.column_index(name)?;
        Ok(self.retain_rows(|row| row[idx] == value))
    }

    pub fn filter_range(&self, name: &str, min: f64, max: f64) -> Result<Self, ReportError> {
        let values = self.numbers(name)?;
        let mut keep = values.iter().map(|v| *v >= min && *v <= max);
        Ok(self.retain_rows(|_| keep.next().unwrap_or(false)))
    }

    pub fn with_column(&self, name: &str, values: Vec<String>) -> Result<Self, ReportError> {
        if values.len() != self.rows.len() {
            return Err(ReportError::invalid_input(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        let mut headers = self.headers.clone();
        let idx = match headers.iter().position(|h| h == name) {
            Some(idx) => idx,
            None => {
                headers.push(name.to_string());
                headers.len() - 1
            }
        };
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row.resize(headers.len(), String::new());
                row[idx] = value;
                row
            })
            .collect();
        Ok(Self { headers, rows })
    }

    /// Derived column holding the row-wise sum of `sources`; blank when any
    /// source cell is unmeasured.
    pub fn with_sum(&self, name: &str, sources: &[&str]) -> Result<Self, ReportError> {
        let columns = sources
            .iter()
            .map(|s| self.measurements(s))
            .collect::<Result<Vec<_>, _>>()?;
        let values = (0..self.rows.len())
            .map(|row| {
                columns
                    .iter()
                    .map(|col| col[row].value())
                    .sum::<Option<f64>>()
                    .map(format_number)
                    .unwrap_or_default()
            })
            .collect();
        self.with_column(name, values)
    }

    /// Fills `hum_col` from `usec_col`. Unmeasured rows keep whatever the
    /// humanized column already held (blank for a new column).
    pub fn with_humanized(
        &self,
        usec_col: &str,
        hum_col: &str,
        precision: usize,
    ) -> Result<Self, ReportError> {
        self.humanize_into(usec_col, hum_col, false, |v| humanize_micros(v, precision))
    }

    /// Only touches rows whose humanized cell is blank or `nan`.
    pub fn with_missing_humanized(
        &self,
        usec_col: &str,
        hum_col: &str,
        precision: usize,
    ) -> Result<Self, ReportError> {
        self.humanize_into(usec_col, hum_col, true, |v| humanize_micros(v, precision))
    }

    pub fn with_missing_humanized_bytes(
        &self,
        bytes_col: &str,
        hum_col: &str,
        precision: usize,
    ) -> Result<Self, ReportError> {
        self.humanize_into(bytes_col, hum_col, true, |v| humanize_bytes(v, precision))
    }

    pub fn humanize_usec_columns(&self, precision: usize) -> Result<Self, ReportError> {
        let pairs: Vec<(String, String)> = self
            .headers
            .iter()
            .filter_map(|h| {
                h.strip_suffix(USEC_SUFFIX)
                    .map(|stem| (h.clone(), format!("{stem}{HUM_SUFFIX}")))
            })
            .collect();
        let mut table = self.clone();
        for (usec, hum) in pairs {
            debug!(usec = %usec, hum = %hum, "humanizing column");
            table = table.with_humanized(&usec, &hum, precision)?;
        }
        Ok(table)
    }

    /// Groups `value_col` by `label_col` into one series per label, keyed by
    /// `key_col`, in first-appearance order.
    pub fn series(
        &self,
        label_col: &str,
        key_col: &str,
        value_col: &str,
    ) -> Result<Vec<Series>, ReportError> {
        self.unique(label_col)?
            .iter()
            .map(|label| self.series_for(label_col, label, key_col, value_col))
            .collect()
    }

    pub fn series_for(
        &self,
        label_col: &str,
        label: &str,
        key_col: &str,
        value_col: &str,
    ) -> Result<Series, ReportError> {
        let subset = self.filter_eq(label_col, label)?;
        let keys = subset.numbers(key_col)?;
        let values = subset.measurements(value_col)?;
        Series::new(label, keys.into_iter().zip(values).collect())
    }

    pub fn to_text(&self, columns: &[&str]) -> Result<String, ReportError> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        let widths: Vec<usize> = indices
            .iter()
            .zip(columns)
            .map(|(idx, name)| {
                self.rows
                    .iter()
                    .map(|row| row[*idx].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let mut out = String::new();
        for (name, &width) in columns.iter().zip(&widths) {
            let _ = write!(out, "{name:>width$} ");
        }
        out.push('\n');
        for row in &self.rows {
            for (idx, &width) in indices.iter().zip(&widths) {
                let _ = write!(out, "{:>width$} ", row[*idx]);
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn humanize_into<F>(
        &self,
        source: &str,
        target: &str,
        only_missing: bool,
        render: F,
    ) -> Result<Self, ReportError>
    where
        F: Fn(f64) -> String,
    {
        let existing = self.existing_or_blank(target);
        let values = self
            .measurements(source)?
            .into_iter()
            .zip(existing)
            .map(|(m, old)| match m.value() {
                Some(_) if only_missing && is_text(&old) => old,
                Some(value) => render(value),
                None => old,
            })
            .collect();
        self.with_column(target, values)
    }

    fn existing_or_blank(&self, name: &str) -> Vec<String> {
        match self.column_index(name) {
            Ok(idx) => self.rows.iter().map(|row| row[idx].clone()).collect(),
            Err(_) => vec![String::new(); self.rows.len()],
        }
    }

    fn retain_rows<F: FnMut(&[String]) -> bool>(&self, mut keep: F) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }
}

fn is_text(cell: &str) -> bool {
    let trimmed = cell.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan")
}
