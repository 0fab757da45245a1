use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    ReportError,
    measurement::{Measurement, Series},
};

/// Cost model a synthetic scheme follows as the player count grows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Growth {
    Linear,
    NLogN,
    Quadratic,
}

impl Growth {
    fn cost(self, n: f64) -> f64 {
        match self {
            Growth::Linear => n,
            Growth::NLogN => n * n.log2().max(1.0),
            Growth::Quadratic => n * n,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SyntheticScheme {
    pub label: String,
    pub growth: Growth,
    /// Microseconds per unit of cost.
    pub scale: f64,
    /// Fixed overhead in microseconds.
    pub setup: f64,
}

impl SyntheticScheme {
    pub fn new<L: Into<String>>(label: L, growth: Growth, scale: f64, setup: f64) -> Self {
        Self {
            label: label.into(),
            growth,
            scale,
            setup,
        }
    }
}

/// Powers of two `2, 4, ..., 2^max_log2`.
pub fn player_counts(max_log2: u32) -> Vec<f64> {
    assert!(max_log2 >= 1, "max_log2 must be at least 1");
    (1..=max_log2).map(|exp| f64::from(1u32 << exp)).collect()
}

/// Seeded noisy timings for `scheme` at every key. Every `gap_every`-th
/// point is left unmeasured when set.
pub fn generate_series(
    scheme: &SyntheticScheme,
    keys: &[f64],
    noise: f64,
    gap_every: Option<usize>,
    seed: u64,
) -> Result<Series, ReportError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let points = keys
        .iter()
        .enumerate()
        .map(|(idx, &n)| {
            let jitter = if noise > 0.0 {
                1.0 + rng.gen_range(-noise..noise)
            } else {
                1.0
            };
            let measurement = match gap_every {
                Some(every) if every > 0 && idx % every == every - 1 => Measurement::Unmeasured,
                _ => Measurement::Value(scheme.setup + scheme.scale * scheme.growth.cost(n) * jitter),
            };
            (n, measurement)
        })
        .collect();
    Series::new(scheme.label.clone(), points)
}

/// A quadratic baseline against a quasi-linear contender that overtakes it
/// once `n` passes a few dozen players.
pub fn generate_crossing_pair(max_log2: u32, seed: u64) -> Result<(Series, Series), ReportError> {
    let keys = player_counts(max_log2);
    let baseline = SyntheticScheme::new("jf", Growth::Quadratic, 40.0, 2_000.0);
    let contender = SyntheticScheme::new("amt", Growth::NLogN, 150.0, 8_000.0);
    Ok((
        generate_series(&baseline, &keys, 0.05, None, seed)?,
        generate_series(&contender, &keys, 0.05, None, seed.wrapping_add(1))?,
    ))
}
