//! Pairwise relative-performance analysis of measurement series.
//!
//! A comparison picks the variant with the smaller total as the winner and
//! reports how many times larger the loser is at every point, together with
//! the point from which the winner is ahead by more than a margin.

use serde::{Deserialize, Serialize, Serializer};

use crate::{
    ReportError,
    measurement::{Series, format_number},
};

pub const DEFAULT_MARGIN: f64 = 1.2;
pub const DEFAULT_MIN_INDEPENDENT_VALUE: f64 = 16.0;
pub const IMPROVEMENT_SYMBOL: &str = "\\texttimes";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    pub margin: f64,
    pub min_independent_value: f64,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            min_independent_value: DEFAULT_MIN_INDEPENDENT_VALUE,
        }
    }
}

impl CompareOptions {
    pub fn with_min(self, min_independent_value: f64) -> Self {
        Self {
            min_independent_value,
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RatioPoint {
    pub key: f64,
    #[serde(serialize_with = "serialize_opt_ratio")]
    pub ratio: Option<f64>,
}

impl RatioPoint {
    pub fn rounded(&self) -> Option<f64> {
        self.ratio.map(round_ratio)
    }

    pub fn display(&self, symbol: &str) -> Option<String> {
        self.rounded()
            .map(|ratio| format!("{}{symbol}", format_ratio(ratio)))
    }
}

pub fn round_ratio(ratio: f64) -> f64 {
    (ratio * 100.0).round() / 100.0
}

/// Formats like a float repr: `2.0`, `1.5`, `1.23`.
pub fn format_ratio(ratio: f64) -> String {
    if ratio.is_finite() && ratio.fract() == 0.0 {
        format!("{ratio:.1}")
    } else {
        format!("{ratio}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Crossover {
    pub key: f64,
    #[serde(serialize_with = "serialize_ratio")]
    pub ratio: f64,
}

// JSON has no infinity; serde_json would write it as null, which reads as unmeasured.
fn serialize_ratio<S: Serializer>(ratio: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if ratio.is_finite() {
        serializer.serialize_f64(*ratio)
    } else {
        serializer.serialize_str(&format_ratio(*ratio))
    }
}

fn serialize_opt_ratio<S: Serializer>(
    ratio: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ratio {
        Some(ratio) => serialize_ratio(ratio, serializer),
        None => serializer.serialize_none(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub winner: String,
    pub loser: String,
    pub swapped: bool,
    pub margin: f64,
    pub min_independent_value: f64,
    pub ratios: Vec<RatioPoint>,
    pub first_crossing: Option<Crossover>,
    /// Earliest point from which every later measured ratio beats the margin.
    pub sustained_from: Option<Crossover>,
}

impl Comparison {
    pub fn has_crossover(&self) -> bool {
        self.first_crossing.is_some()
    }

    pub fn summary(&self) -> String {
        match &self.first_crossing {
            Some(crossing) => format!(
                "{} starts outperforming {} at {} ({}x)",
                self.winner,
                self.loser,
                format_number(crossing.key),
                format_ratio(round_ratio(crossing.ratio))
            ),
            None => format!(
                "{} never beats {} by more than {}x past {}",
                self.winner,
                self.loser,
                self.margin,
                format_number(self.min_independent_value)
            ),
        }
    }
}

pub fn compare(a: &Series, b: &Series, opts: &CompareOptions) -> Result<Comparison, ReportError> {
    if a.label() == b.label() {
        return Err(ReportError::invariant(format!(
            "cannot compare '{}' with itself",
            a.label()
        )));
    }
    if a.is_empty() || b.is_empty() {
        return Err(ReportError::invalid_input(format!(
            "cannot compare empty series ('{}' has {} points, '{}' has {})",
            a.label(),
            a.len(),
            b.label(),
            b.len()
        )));
    }
    check_aligned(a, b)?;

    let (sum_a, sum_b) = paired_sums(a, b);
    let (winner, loser, swapped) = if sum_b < sum_a {
        (b, a, true)
    } else {
        (a, b, false)
    };

    let ratios = divide(loser, winner);
    let first_crossing = first_crossing(&ratios, opts);
    let sustained_from = sustained_from(&ratios, opts);

    Ok(Comparison {
        winner: winner.label().to_string(),
        loser: loser.label().to_string(),
        swapped,
        margin: opts.margin,
        min_independent_value: opts.min_independent_value,
        ratios,
        first_crossing,
        sustained_from,
    })
}

pub fn compare_all(series: &[Series], opts: &CompareOptions) -> Result<Vec<Comparison>, ReportError> {
    let mut comparisons = Vec::new();
    for (idx, left) in series.iter().enumerate() {
        for right in &series[idx + 1..] {
            comparisons.push(compare(left, right, opts)?);
        }
    }
    Ok(comparisons)
}

/// Fixed-direction `numerator / denominator` ratios, without picking a winner.
pub fn ratio_series(numerator: &Series, denominator: &Series) -> Result<Vec<RatioPoint>, ReportError> {
    check_aligned(numerator, denominator)?;
    Ok(divide(numerator, denominator))
}

fn check_aligned(a: &Series, b: &Series) -> Result<(), ReportError> {
    if a.len() != b.len() {
        return Err(ReportError::misaligned(
            a.label(),
            b.label(),
            format!("{} points vs {} points", a.len(), b.len()),
        ));
    }
    for (pa, pb) in a.points().iter().zip(b.points()) {
        if pa.key != pb.key {
            return Err(ReportError::misaligned(
                a.label(),
                b.label(),
                format!(
                    "key {} does not line up with key {}",
                    format_number(pa.key),
                    format_number(pb.key)
                ),
            ));
        }
    }
    Ok(())
}

fn paired_sums(a: &Series, b: &Series) -> (f64, f64) {
    a.points()
        .iter()
        .zip(b.points())
        .filter_map(|(pa, pb)| Some((pa.measurement.value()?, pb.measurement.value()?)))
        .fold((0.0, 0.0), |(sa, sb), (va, vb)| (sa + va, sb + vb))
}

fn divide(numerator: &Series, denominator: &Series) -> Vec<RatioPoint> {
    numerator
        .points()
        .iter()
        .zip(denominator.points())
        .map(|(num, den)| {
            let ratio = match (num.measurement.value(), den.measurement.value()) {
                // x / 0 is infinitely far ahead; only 0 / 0 has no ratio
                (Some(n), Some(d)) if d != 0.0 || n != 0.0 => Some(n / d),
                _ => None,
            };
            RatioPoint {
                key: num.key,
                ratio,
            }
        })
        .collect()
}

fn beats(point: &RatioPoint, ratio: f64, opts: &CompareOptions) -> bool {
    ratio > opts.margin && point.key > opts.min_independent_value
}

pub fn first_crossing(ratios: &[RatioPoint], opts: &CompareOptions) -> Option<Crossover> {
    ratios.iter().find_map(|point| {
        let ratio = point.ratio?;
        beats(point, ratio, opts).then_some(Crossover {
            key: point.key,
            ratio,
        })
    })
}

pub fn sustained_from(ratios: &[RatioPoint], opts: &CompareOptions) -> Option<Crossover> {
    let mut candidate = None;
    for point in ratios.iter().rev() {
        if point.key <= opts.min_independent_value {
            break;
        }
        let Some(ratio) = point.ratio else {
            continue;
        };
        if !beats(point, ratio, opts) {
            break;
        }
        candidate = Some(Crossover {
            key: point.key,
            ratio,
        });
    }
    candidate
}
