//! # Force histories
//!
//! Time series of a force (or force coefficient) acting on a body,
//! with time averages, extrema and the Strouhal number of periodic
//! shedding.
//!
//! ```
//! use gridconv::force::ForceHistory;
//! use ndarray::Array1;
//! use std::f64::consts::PI;
//!
//! let times = Array1::linspace(0., 50., 5001);
//! let values = times.mapv(|t| (2. * PI * 0.2 * t).sin());
//! let lift = ForceHistory::new(times, values).unwrap();
//! let st = lift.strouhal(1., 1., 3, 50., 5).unwrap();
//! assert!((st.mean - 0.2).abs() < 1e-8);
//! ```
use crate::error::{Error, Result};
use ndarray::prelude::*;
use serde::Serialize;

/// Time-averaged force and the actual limits of the average
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanForce {
    /// Mean value
    pub value: f64,
    /// Time of the first sample taken into account
    pub start: f64,
    /// Time of the last sample taken into account
    pub end: f64,
}

/// Indices of the relative minima and maxima of a history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extrema {
    /// Indices of minima, ascending
    pub minima: Vec<usize>,
    /// Indices of maxima, ascending
    pub maxima: Vec<usize>,
}

/// Absolute distances of the extrema from the mean value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deviations {
    /// Distances of the minima
    pub minima: Vec<f64>,
    /// Distances of the maxima
    pub maxima: Vec<f64>,
}

/// Strouhal number averaged over the last periods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strouhal {
    /// Mean over all periods
    pub mean: f64,
    /// Value over each period
    pub values: Vec<f64>,
    /// Time of the first minimum used
    pub start: f64,
    /// Time of the last minimum used
    pub end: f64,
}

/// Discrete force history
#[derive(Debug, Clone, PartialEq)]
pub struct ForceHistory {
    times: Array1<f64>,
    values: Array1<f64>,
}

impl ForceHistory {
    /// Return force history
    ///
    /// # Errors
    /// Times and values differ in length.
    pub fn new(times: Array1<f64>, values: Array1<f64>) -> Result<Self> {
        if times.len() != values.len() {
            return Err(Error::InvalidParameter(format!(
                "force history has {} times but {} values",
                times.len(),
                values.len()
            )));
        }
        Ok(Self { times, values })
    }

    /// Discrete times
    pub fn times(&self) -> ArrayView1<f64> {
        self.times.view()
    }

    /// Instantaneous values
    pub fn values(&self) -> ArrayView1<f64> {
        self.values.view()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True if history holds no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Mean over all samples with `start <= t <= end`
    ///
    /// # Errors
    /// No sample inside the window.
    pub fn mean(&self, start: f64, end: f64) -> Result<MeanForce> {
        let window = self.window(start, end);
        match (window.first(), window.last()) {
            (Some(&first), Some(&last)) => {
                let value = window.iter().map(|&i| self.values[i]).sum::<f64>()
                    / window.len() as f64;
                Ok(MeanForce {
                    value,
                    start: self.times[first],
                    end: self.times[last],
                })
            }
            _ => Err(Error::InsufficientData(format!(
                "no samples in time window [{}, {}]",
                start, end
            ))),
        }
    }

    /// Relative extrema over the whole history, see [`ForceHistory::extrema_within`]
    ///
    /// # Errors
    /// `order` is zero.
    pub fn extrema(&self, order: usize) -> Result<Extrema> {
        self.extrema_within(f64::NEG_INFINITY, f64::INFINITY, order)
    }

    /// Relative extrema with `start <= t <= end`
    ///
    /// A sample is a minimum (maximum) if it is less (greater) or equal
    /// than its `order` neighbours on each side; neighbours beyond
    /// the ends are clipped to the end samples. The last candidate of
    /// each kind is discarded, and candidates closer than `order + 1`
    /// samples to their predecessor are removed.
    ///
    /// # Errors
    /// `order` is zero.
    pub fn extrema_within(&self, start: f64, end: f64, order: usize) -> Result<Extrema> {
        if order == 0 {
            return Err(Error::InvalidParameter(
                "extrema need at least one neighbour".to_owned(),
            ));
        }
        let inside = |&i: &usize| self.times[i] >= start && self.times[i] <= end;
        let select = |mut candidates: Vec<usize>| {
            candidates.pop();
            let candidates: Vec<usize> = candidates.into_iter().filter(&inside).collect();
            remove_close(&candidates, order)
        };
        let extrema = Extrema {
            minima: select(relative_extrema(&self.values, order, |a, b| a <= b)),
            maxima: select(relative_extrema(&self.values, order, |a, b| a >= b)),
        };
        log::debug!(
            "found {} minima and {} maxima",
            extrema.minima.len(),
            extrema.maxima.len()
        );
        Ok(extrema)
    }

    /// Mean over the last period, bounded by the last two minima if
    /// the last minimum follows the last maximum, else by the last
    /// two maxima
    ///
    /// # Errors
    /// Fewer than two extrema of the relevant kind.
    pub fn mean_last_period(&self, order: usize) -> Result<MeanForce> {
        let extrema = self.extrema(order)?;
        let bounds = match (extrema.minima.last(), extrema.maxima.last()) {
            (Some(min), Some(max)) if min > max => &extrema.minima,
            (_, Some(_)) => &extrema.maxima,
            _ => &extrema.minima,
        };
        if bounds.len() < 2 {
            return Err(Error::InsufficientData(
                "last period needs two extrema".to_owned(),
            ));
        }
        let (first, last) = (bounds[bounds.len() - 2], bounds[bounds.len() - 1]);
        let value = self.values.slice(s![first..=last]).mean().ok_or_else(|| {
            Error::InsufficientData("empty last period".to_owned())
        })?;
        Ok(MeanForce {
            value,
            start: self.times[first],
            end: self.times[last],
        })
    }

    /// Distances of the extrema in `[start, end]` from the mean
    /// over the same window
    ///
    /// # Errors
    /// Empty window or `order` is zero.
    pub fn deviations(&self, start: f64, end: f64, order: usize) -> Result<Deviations> {
        let extrema = self.extrema_within(start, end, order)?;
        let mean = self.mean(start, end)?.value;
        let distance = |indices: &[usize]| -> Vec<f64> {
            indices
                .iter()
                .map(|&i| (self.values[i] - mean).abs())
                .collect()
        };
        Ok(Deviations {
            minima: distance(&extrema.minima),
            maxima: distance(&extrema.maxima),
        })
    }

    /// Strouhal number L / (U T) from the distance T between
    /// consecutive minima, over the last `n_periods` periods
    /// ending before `end_time`
    ///
    /// # Errors
    /// - `InvalidParameter` for a zero number of periods or
    ///   a non-positive velocity scale
    /// - `InsufficientData` if fewer than `n_periods + 1` minima
    pub fn strouhal(
        &self,
        length: f64,
        velocity: f64,
        n_periods: usize,
        end_time: f64,
        order: usize,
    ) -> Result<Strouhal> {
        if n_periods == 0 {
            return Err(Error::InvalidParameter(
                "Strouhal number needs at least one period".to_owned(),
            ));
        }
        if !(velocity.is_finite() && velocity > 0.) {
            return Err(Error::InvalidParameter(format!(
                "velocity scale must be positive, got {}",
                velocity
            )));
        }
        let minima = self.extrema_within(f64::NEG_INFINITY, end_time, order)?.minima;
        if minima.len() < n_periods + 1 {
            return Err(Error::InsufficientData(format!(
                "{} periods requested, found {} minima before t = {}",
                n_periods,
                minima.len(),
                end_time
            )));
        }
        let minima = &minima[minima.len() - n_periods - 1..];
        let values: Vec<f64> = minima
            .windows(2)
            .map(|w| length / velocity / (self.times[w[1]] - self.times[w[0]]))
            .collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        log::info!("Strouhal number {} over {} periods", mean, n_periods);
        Ok(Strouhal {
            mean,
            values,
            start: self.times[minima[0]],
            end: self.times[minima[n_periods]],
        })
    }

    fn window(&self, start: f64, end: f64) -> Vec<usize> {
        self.times
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t >= start && t <= end)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Drag and lift histories of a body
#[derive(Debug, Clone, PartialEq)]
pub struct ForceCoefficients {
    /// Force in stream direction
    pub drag: ForceHistory,
    /// Force normal to the stream
    pub lift: ForceHistory,
}

/// Mean drag and lift
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanCoefficients {
    /// Mean drag
    pub drag: MeanForce,
    /// Mean lift
    pub lift: MeanForce,
}

impl ForceCoefficients {
    /// Pair drag and lift histories
    pub fn new(drag: ForceHistory, lift: ForceHistory) -> Self {
        Self { drag, lift }
    }

    /// Mean drag and lift over `start <= t <= end`
    ///
    /// # Errors
    /// See [`ForceHistory::mean`].
    pub fn mean(&self, start: f64, end: f64) -> Result<MeanCoefficients> {
        Ok(MeanCoefficients {
            drag: self.drag.mean(start, end)?,
            lift: self.lift.mean(start, end)?,
        })
    }

    /// Strouhal number of the lift history
    ///
    /// # Errors
    /// See [`ForceHistory::strouhal`].
    pub fn strouhal(
        &self,
        length: f64,
        velocity: f64,
        n_periods: usize,
        end_time: f64,
        order: usize,
    ) -> Result<Strouhal> {
        self.lift
            .strouhal(length, velocity, n_periods, end_time, order)
    }
}

/// Indices i with cmp(values[i], values[i +- k]) for k in 1..=order,
/// indices clipped to the ends
fn relative_extrema<F>(values: &Array1<f64>, order: usize, cmp: F) -> Vec<usize>
where
    F: Fn(f64, f64) -> bool,
{
    let n = values.len();
    (0..n)
        .filter(|&i| {
            (1..=order).all(|shift| {
                let plus = (i + shift).min(n - 1);
                let minus = i.saturating_sub(shift);
                cmp(values[i], values[plus]) && cmp(values[i], values[minus])
            })
        })
        .collect()
}

/// Keep indices more than `order` samples after their predecessor
fn remove_close(indices: &[usize], order: usize) -> Vec<usize> {
    indices
        .iter()
        .enumerate()
        .filter(|&(k, &i)| k == 0 || i - indices[k - 1] > order)
        .map(|(_, &i)| i)
        .collect()
}
