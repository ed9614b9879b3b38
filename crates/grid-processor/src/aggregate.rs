//! Temporal reductions over a stack of yearly land-point arrays.
//!
//! The stack is `years x land_points`. Three reductions are produced:
//!
//! - **mean**: per land point, averaged over years
//! - **growth**: per land point, average year-on-year difference
//! - **timeseries**: per year, averaged over land points
//!
//! NaN land points propagate through every reduction they touch.

use tracing::debug;

use crate::error::{GridError, Result};

/// Minimum number of years needed for a growth rate.
const MIN_YEARS: usize = 2;

/// The three reductions of a yearly stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Reductions {
    /// Per-land-point mean over all years
    pub mean: Vec<f32>,
    /// Per-land-point mean of consecutive-year differences
    pub growth: Vec<f32>,
    /// Per-year mean over all land points
    pub timeseries: Vec<f32>,
}

/// Yearly land-point arrays collected one year at a time.
///
/// Lengths are checked as years arrive, so a bad year is reported before
/// the next file is read.
#[derive(Debug, Clone, Default)]
pub struct StackedSeries {
    years: Vec<Vec<f32>>,
}

impl StackedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(years: usize) -> Self {
        Self {
            years: Vec::with_capacity(years),
        }
    }

    /// Append the next year.
    pub fn push(&mut self, values: Vec<f32>) -> Result<()> {
        let year = self.years.len();
        if values.is_empty() {
            return Err(GridError::EmptyYear { year });
        }
        if let Some(expected) = self.land_points() {
            if values.len() != expected {
                return Err(GridError::LengthMismatch {
                    year,
                    got: values.len(),
                    expected,
                });
            }
        }
        self.years.push(values);
        Ok(())
    }

    /// Number of years pushed so far.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Land points per year, once the first year is in.
    pub fn land_points(&self) -> Option<usize> {
        self.years.first().map(Vec::len)
    }

    pub fn years(&self) -> &[Vec<f32>] {
        &self.years
    }

    /// Compute mean, growth and timeseries over the stack.
    pub fn aggregate(&self) -> Result<Reductions> {
        if self.years.len() < MIN_YEARS {
            return Err(GridError::InsufficientYears {
                needed: MIN_YEARS,
                got: self.years.len(),
            });
        }
        // push() guarantees a non-empty, rectangular stack from here on
        let n_land = self.years[0].len();
        let n_years = self.years.len();

        let mut sums = vec![0.0f64; n_land];
        for year in &self.years {
            for (sum, &v) in sums.iter_mut().zip(year) {
                *sum += f64::from(v);
            }
        }
        let mean = sums
            .into_iter()
            .map(|s| (s / n_years as f64) as f32)
            .collect();

        let mut diffs = vec![0.0f64; n_land];
        for pair in self.years.windows(2) {
            for (d, (&prev, &next)) in diffs.iter_mut().zip(pair[0].iter().zip(&pair[1])) {
                *d += f64::from(next) - f64::from(prev);
            }
        }
        let growth = diffs
            .into_iter()
            .map(|d| (d / (n_years - 1) as f64) as f32)
            .collect();

        let timeseries = self
            .years
            .iter()
            .map(|year| {
                let total: f64 = year.iter().map(|&v| f64::from(v)).sum();
                (total / n_land as f64) as f32
            })
            .collect();

        debug!(years = n_years, land_points = n_land, "Aggregated yearly stack");

        Ok(Reductions {
            mean,
            growth,
            timeseries,
        })
    }
}

/// Aggregate an already collected `years x land_points` stack.
pub fn aggregate(yearly: &[Vec<f32>]) -> Result<Reductions> {
    let mut stack = StackedSeries::with_capacity(yearly.len());
    for year in yearly {
        stack.push(year.clone())?;
    }
    stack.aggregate()
}
