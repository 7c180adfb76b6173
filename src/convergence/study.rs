//! Grid-convergence study over a sequence of refined solutions
//!
//! # Example
//! Second order error on four nested grids
//! ```
//! use gridconv::{ConvergenceStudy, GridField, Norm, Triplet};
//! use ndarray::{Array1, Array2};
//! let fields: Vec<GridField> = [5, 9, 17, 33]
//!     .iter()
//!     .map(|&n| {
//!         let x = Array1::linspace(0., 1., n);
//!         let h = 1. / (n - 1) as f64;
//!         let values = Array2::from_shape_fn((n, n), |(j, i)| x[i] * x[j] + h * h);
//!         GridField::new(x.clone(), x, values, "pressure").unwrap()
//!     })
//!     .collect();
//! let mask = fields[0].grid();
//! let study = ConvergenceStudy::with_ratio_from_spacing(fields, mask).unwrap();
//! let p = study.observed_order(Triplet::Last, Norm::Linf).unwrap();
//! assert!((p - 2.).abs() < 1e-8);
//! ```
use super::{ConvergenceAnalyzer, Norm};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::field::{Grid, GridField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects three consecutive grids of a study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Triplet {
    /// Three coarsest grids
    First,
    /// Three finest grids
    Last,
}

impl Triplet {
    /// `Last` if `last_three` is set, else `First`
    pub fn from_last_three(last_three: bool) -> Self {
        if last_three {
            Triplet::Last
        } else {
            Triplet::First
        }
    }
}

/// Refinement ratio between two uniform grids
///
/// # Errors
/// Spacing of a grid cannot be computed, or medium spacing is zero.
pub fn ratio_from_spacing(coarse: &GridField, medium: &GridField) -> Result<f64> {
    let hc = coarse.grid_spacing()?;
    let hm = medium.grid_spacing()?;
    if hm == 0. {
        return Err(Error::InvalidParameter(format!(
            "grid spacing of {:?} is zero",
            medium.label()
        )));
    }
    Ok(hc / hm)
}

/// Solutions of one quantity on consecutively refined grids,
/// ordered coarse -> fine, with a constant refinement ratio.
#[derive(Debug, Clone)]
pub struct ConvergenceStudy {
    fields: Vec<GridField>,
    ratio: f64,
    mask: Grid,
    analyzer: ConvergenceAnalyzer,
}

impl ConvergenceStudy {
    /// Return new study
    ///
    /// # Errors
    /// Fewer than three fields, or ratio not finite and > 1.
    pub fn new(fields: Vec<GridField>, ratio: f64, mask: Grid) -> Result<Self> {
        if fields.len() < 3 {
            return Err(Error::InvalidParameter(format!(
                "a convergence study needs at least three grids, got {}",
                fields.len()
            )));
        }
        if !ratio.is_finite() || ratio <= 1. {
            return Err(Error::InvalidParameter(format!(
                "refinement ratio must be finite and larger than 1, got {}",
                ratio
            )));
        }
        Ok(Self {
            fields,
            ratio,
            mask,
            analyzer: ConvergenceAnalyzer::default(),
        })
    }

    /// Return new study, refinement ratio is taken from the
    /// spacings of the two coarsest grids
    ///
    /// # Errors
    /// See [`ConvergenceStudy::new`] and [`ratio_from_spacing`].
    pub fn with_ratio_from_spacing(fields: Vec<GridField>, mask: Grid) -> Result<Self> {
        if fields.len() < 2 {
            return Self::new(fields, f64::NAN, mask);
        }
        let ratio = ratio_from_spacing(&fields[0], &fields[1])?;
        Self::new(fields, ratio, mask)
    }

    /// Return new study with ratio and tolerance from `config`
    ///
    /// # Errors
    /// See [`ConvergenceStudy::new`].
    pub fn from_config(fields: Vec<GridField>, mask: Grid, config: &Config) -> Result<Self> {
        let study = match config.convergence.ratio {
            Some(ratio) => Self::new(fields, ratio, mask)?,
            None => Self::with_ratio_from_spacing(fields, mask)?,
        };
        Ok(study.with_analyzer(ConvergenceAnalyzer::from_config(config)))
    }

    /// Replace analyzer (restriction tolerance)
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: ConvergenceAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Solutions, coarse -> fine
    pub fn fields(&self) -> &[GridField] {
        &self.fields
    }

    /// Refinement ratio
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Grid onto which all solutions are restricted
    pub fn mask(&self) -> &Grid {
        &self.mask
    }

    /// Label of the coarsest solution
    pub fn label(&self) -> &str {
        self.fields[0].label()
    }

    /// Coarse, medium and fine solution of a triplet
    pub fn triplet(&self, triplet: Triplet) -> (&GridField, &GridField, &GridField) {
        let start = match triplet {
            Triplet::First => 0,
            Triplet::Last => self.fields.len() - 3,
        };
        (
            &self.fields[start],
            &self.fields[start + 1],
            &self.fields[start + 2],
        )
    }

    /// Observed order of convergence of a triplet
    ///
    /// # Errors
    /// See [`ConvergenceAnalyzer::observed_order`].
    pub fn observed_order(&self, triplet: Triplet, norm: Norm) -> Result<f64> {
        let (coarse, medium, fine) = self.triplet(triplet);
        self.analyzer
            .observed_order(coarse, medium, fine, self.ratio, &self.mask, norm)
    }

    /// Uniform grid-spacing of every solution
    ///
    /// # Errors
    /// A solution has fewer than two stations along x.
    pub fn grid_spacings(&self) -> Result<Vec<f64>> {
        self.fields.iter().map(GridField::grid_spacing).collect()
    }

    /// Error of every solution with respect to a reference
    /// (e.g. analytical) solution
    ///
    /// # Errors
    /// See [`ConvergenceAnalyzer::error_norm`].
    pub fn errors(&self, reference: &GridField, norm: Norm) -> Result<Vec<f64>> {
        self.fields
            .iter()
            .map(|f| self.analyzer.error_norm(f, reference, &self.mask, norm))
            .collect()
    }

    /// Error of every solution but the finest one, which serves
    /// as reference when no exact solution is available
    ///
    /// # Errors
    /// See [`ConvergenceAnalyzer::error_norm`].
    pub fn errors_against_finest(&self, norm: Norm) -> Result<Vec<f64>> {
        let (finest, others) = self
            .fields
            .split_last()
            .ok_or_else(|| Error::InsufficientData("empty study".to_owned()))?;
        others
            .iter()
            .map(|f| self.analyzer.error_norm(f, finest, &self.mask, norm))
            .collect()
    }

    /// Collect orders and errors for the reporting layer
    ///
    /// Failures for single norms are logged and skipped.
    pub fn report(
        &self,
        norms: &[Norm],
        triplet: Triplet,
        reference: Option<&GridField>,
    ) -> ConvergenceReport {
        let mut orders = Vec::new();
        let mut errors = Vec::new();
        for &norm in norms {
            match self.observed_order(triplet, norm) {
                Ok(order) => orders.push((norm, order)),
                Err(e) => log::warn!("{:?}: skip {} order: {}", self.label(), norm, e),
            }
            let result = match reference {
                Some(reference) => self.errors(reference, norm),
                None => self.errors_against_finest(norm),
            };
            match result {
                Ok(e) => errors.push((norm, e)),
                Err(e) => log::warn!("{:?}: skip {} errors: {}", self.label(), norm, e),
            }
        }
        let grid_spacings = self.grid_spacings().unwrap_or_else(|e| {
            log::warn!("{:?}: skip grid spacings: {}", self.label(), e);
            Vec::new()
        });
        ConvergenceReport {
            label: self.label().to_owned(),
            time_step: self.fields[0].time_step(),
            triplet,
            ratio: self.ratio,
            orders,
            grid_spacings,
            errors,
        }
    }
}

/// Plain data summary of a convergence study
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceReport {
    /// Field label
    pub label: String,
    /// Time step of the solutions
    pub time_step: Option<usize>,
    /// Grids used for the observed order
    pub triplet: Triplet,
    /// Refinement ratio
    pub ratio: f64,
    /// Observed order per norm
    pub orders: Vec<(Norm, f64)>,
    /// Grid-spacing per solution
    pub grid_spacings: Vec<f64>,
    /// Errors per norm
    pub errors: Vec<(Norm, Vec<f64>)>,
}

impl ConvergenceReport {
    /// Observed order for a norm, if it could be computed
    pub fn order(&self, norm: Norm) -> Option<f64> {
        self.orders.iter().find(|(n, _)| *n == norm).map(|(_, p)| *p)
    }
}

impl fmt::Display for ConvergenceReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (norm, order) in &self.orders {
            writeln!(f, "{} ({}): {}", self.label, norm, order)?;
        }
        Ok(())
    }
}
