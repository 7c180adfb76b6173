#![warn(missing_docs)]
//! # gridconv: grid convergence of two-dimensional flow solutions
//!
//! Post-processing core for structured-grid simulations. Solutions of
//! the same problem on consecutively refined grids are restricted onto
//! a common coarse grid, and the observed order of convergence is
//! estimated from the norms of their differences.
//!
//! Besides the convergence analysis the library provides
//! - vorticity on staggered grids
//! - analytical solutions of periodic vortex flows
//! - statistics of force histories (mean, extrema, Strouhal number)
//!
//! # Example
//! Three solutions whose error decays with h²
//! ```
//! use gridconv::{ConvergenceStudy, GridField, Norm, Triplet};
//! use ndarray::{Array1, Array2};
//!
//! let solution = |n: usize| {
//!     let x = Array1::linspace(0., 1., n);
//!     let y = Array1::linspace(0., 1., n);
//!     let h = 1. / (n - 1) as f64;
//!     let values = Array2::from_shape_fn((n, n), |(j, i)| x[i] * y[j] + h * h);
//!     GridField::new(x, y, values, "pressure").unwrap()
//! };
//! let fields = vec![solution(5), solution(9), solution(17)];
//! let mask = fields[0].grid();
//! let study = ConvergenceStudy::with_ratio_from_spacing(fields, mask).unwrap();
//! let order = study.observed_order(Triplet::First, Norm::Linf).unwrap();
//! assert!((order - 2.).abs() < 1e-8);
//! ```
pub mod config;
pub mod convergence;
pub mod error;
pub mod field;
pub mod force;
pub mod solutions;
pub mod utils;
pub mod vorticity;
pub use config::Config;
pub use convergence::{
    error_norm, observed_order, ConvergenceAnalyzer, ConvergenceReport, ConvergenceStudy, Norm,
    Triplet,
};
pub use error::{Error, Result};
pub use field::{restrict, restrict_all, Grid, GridField, DEFAULT_TOLERANCE};
pub use force::{ForceCoefficients, ForceHistory};
pub use solutions::{Analytical, Solution};
