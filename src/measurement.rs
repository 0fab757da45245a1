use std::fmt;

use serde::Serialize;

use crate::ReportError;

/// Cell markers that mean "not measured yet".
pub const UNMEASURED_MARKERS: [&str; 4] = ["", "todo", "nan", "NaN"];

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Measurement {
    Value(f64),
    Unmeasured,
}

impl Measurement {
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if UNMEASURED_MARKERS.contains(&trimmed) {
            return Measurement::Unmeasured;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Measurement::Value(value),
            _ => Measurement::Unmeasured,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Measurement::Value(v) => Some(*v),
            Measurement::Unmeasured => None,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Measurement::Value(_))
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Value(v) => write!(f, "{}", format_number(*v)),
            Measurement::Unmeasured => Ok(()),
        }
    }
}

/// Prints integral values without a fractional part (`64`, not `64.0`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: f64,
    pub measurement: Measurement,
}

/// Measurements of one variant, keyed by a strictly increasing independent
/// variable (`n`, `t` or `k`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    label: String,
    points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new<L: Into<String>>(
        label: L,
        points: Vec<(f64, Measurement)>,
    ) -> Result<Self, ReportError> {
        let label = label.into();
        let mut points: Vec<SeriesPoint> = points
            .into_iter()
            .map(|(key, measurement)| SeriesPoint { key, measurement })
            .collect();
        if points.iter().any(|p| p.key.is_nan()) {
            return Err(ReportError::invalid_input(format!(
                "series '{label}' has a NaN key"
            )));
        }
        points.sort_by(|a, b| a.key.total_cmp(&b.key));
        if let Some(pair) = points.windows(2).find(|w| w[0].key == w[1].key) {
            return Err(ReportError::invalid_input(format!(
                "series '{label}' repeats key {}",
                format_number(pair[0].key)
            )));
        }
        Ok(Self { label, points })
    }

    pub fn from_values<L: Into<String>>(
        label: L,
        keys: &[f64],
        values: &[f64],
    ) -> Result<Self, ReportError> {
        let label = label.into();
        if keys.len() != values.len() {
            return Err(ReportError::invalid_input(format!(
                "series '{label}' has {} keys but {} values",
                keys.len(),
                values.len()
            )));
        }
        let points = keys
            .iter()
            .zip(values)
            .map(|(k, v)| (*k, Measurement::Value(*v)))
            .collect();
        Self::new(label, points)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn keys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.key).collect()
    }
}
