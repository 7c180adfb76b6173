//! # Observed order of grid convergence
//!
//! Solutions on three consecutively refined grids (constant
//! refinement ratio r) are restricted onto a common mask grid.
//! The observed order is
//!
//! p = ln( |medium - coarse| / |fine - medium| ) / ln(r)
//!
//! where |.| denotes the L2- or Linf-norm.
pub mod norm;
pub mod study;
pub use norm::Norm;
pub use study::{ConvergenceReport, ConvergenceStudy, Triplet};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::field::{Grid, GridField, DEFAULT_TOLERANCE, SUBTRACT_TOLERANCE};

/// Compares restricted solutions
///
/// Holds the absolute tolerance used to match the stations of
/// the mask grid with the stations of each solution, and the
/// tolerance used to compare the restricted grids before
/// subtraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceAnalyzer {
    /// Absolute coordinate tolerance for restriction
    pub tolerance: f64,
    /// Absolute coordinate tolerance for subtraction
    pub subtract_tolerance: f64,
}

impl Default for ConvergenceAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl ConvergenceAnalyzer {
    /// Return analyzer with given restriction tolerance
    ///
    /// Restricted stations lie within `tolerance` of the mask, so
    /// the subtraction tolerance is at least twice as large.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            subtract_tolerance: SUBTRACT_TOLERANCE.max(2. * tolerance),
        }
    }

    /// Replace subtraction tolerance
    #[must_use]
    pub fn with_subtract_tolerance(mut self, subtract_tolerance: f64) -> Self {
        self.subtract_tolerance = subtract_tolerance;
        self
    }

    /// Return analyzer configured from `config`
    pub fn from_config(config: &Config) -> Self {
        let analyzer = Self::new(config.restriction.tolerance);
        match config.restriction.subtract_tolerance {
            Some(subtract_tolerance) => analyzer.with_subtract_tolerance(subtract_tolerance),
            None => analyzer,
        }
    }

    /// Observed order of convergence from three solutions
    ///
    /// # Errors
    /// - `InvalidParameter` if ratio is not finite or not > 1
    /// - `Shape`/`GridMismatch` if a restriction fails
    /// - `DegenerateConvergence` if two consecutive solutions coincide,
    ///   if fine and coarse solutions coincide, or the order is not finite
    pub fn observed_order(
        &self,
        coarse: &GridField,
        medium: &GridField,
        fine: &GridField,
        ratio: f64,
        mask: &Grid,
        norm: Norm,
    ) -> Result<f64> {
        if !ratio.is_finite() || ratio <= 1. {
            return Err(Error::InvalidParameter(format!(
                "refinement ratio must be finite and larger than 1, got {}",
                ratio
            )));
        }
        let coarse = coarse.restrict(mask, self.tolerance)?;
        let medium = medium.restrict(mask, self.tolerance)?;
        let fine = fine.restrict(mask, self.tolerance)?;

        let d1 = medium.subtract_with_tolerance(&coarse, self.subtract_tolerance)?;
        let d2 = fine.subtract_with_tolerance(&medium, self.subtract_tolerance)?;
        let n1 = norm.of(&d1.values());
        let n2 = norm.of(&d2.values());
        if n2 == 0. {
            return Err(Error::DegenerateConvergence(format!(
                "fine and medium solutions of {:?} coincide",
                fine.label()
            )));
        }
        if n1 == 0. {
            return Err(Error::DegenerateConvergence(format!(
                "medium and coarse solutions of {:?} coincide",
                medium.label()
            )));
        }
        if norm.of(&(&d1.values() + &d2.values())) == 0. {
            return Err(Error::DegenerateConvergence(format!(
                "fine and coarse solutions of {:?} coincide",
                fine.label()
            )));
        }
        let order = (n1 / n2).ln() / ratio.ln();
        if !order.is_finite() {
            return Err(Error::DegenerateConvergence(format!(
                "non-finite order ({}) for {:?}",
                order,
                fine.label()
            )));
        }
        log::info!(
            "observed order {:?} ({}, r = {}): {}",
            fine.label(),
            norm,
            ratio,
            order
        );
        Ok(order)
    }

    /// Difference between a candidate and a reference solution
    /// restricted onto the mask grid
    ///
    /// # Errors
    /// `Shape`/`GridMismatch` if a restriction or the subtraction fails.
    pub fn error_norm(
        &self,
        candidate: &GridField,
        reference: &GridField,
        mask: &Grid,
        norm: Norm,
    ) -> Result<f64> {
        let candidate = candidate.restrict(mask, self.tolerance)?;
        let reference = reference.restrict(mask, self.tolerance)?;
        let difference = candidate.subtract_with_tolerance(&reference, self.subtract_tolerance)?;
        Ok(norm.of(&difference.values()))
    }
}

/// Observed order of convergence with the default restriction tolerance
///
/// # Errors
/// See [`ConvergenceAnalyzer::observed_order`].
///
/// # Example
/// Errors decrease by a factor 2 between consecutive grids:
/// ```
/// use gridconv::{observed_order, GridField, Norm};
/// use ndarray::{Array1, Array2};
/// let x = Array1::linspace(0., 1., 5);
/// let y = Array1::linspace(0., 1., 3);
/// let make = |c: f64| GridField::new(x.clone(), y.clone(), Array2::from_elem((3, 5), c), "p").unwrap();
/// let (coarse, medium, fine) = (make(4.), make(2.), make(1.));
/// let p = observed_order(&coarse, &medium, &fine, 2., &coarse.grid(), Norm::L2).unwrap();
/// assert!((p - 1.).abs() < 1e-12);
/// ```
pub fn observed_order(
    coarse: &GridField,
    medium: &GridField,
    fine: &GridField,
    ratio: f64,
    mask: &Grid,
    norm: Norm,
) -> Result<f64> {
    ConvergenceAnalyzer::default().observed_order(coarse, medium, fine, ratio, mask, norm)
}

/// Error norm with the default restriction tolerance
///
/// # Errors
/// See [`ConvergenceAnalyzer::error_norm`].
pub fn error_norm(
    candidate: &GridField,
    reference: &GridField,
    mask: &Grid,
    norm: Norm,
) -> Result<f64> {
    ConvergenceAnalyzer::default().error_norm(candidate, reference, mask, norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::prelude::*;
    use ndarray::s;
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    const NORMS: [Norm; 2] = [Norm::L2, Norm::Linf];

    fn random(shape: (usize, usize), seed: u64) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Array2::random_using(shape, Uniform::new(0., 1.), &mut rng)
    }

    /// Uniformly distributed stations in [0, 1), sorted
    fn stations(n: usize, seed: u64) -> Array1<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut v = Array1::random_using(n, Uniform::new(0., 1.), &mut rng).to_vec();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        Array1::from(v)
    }

    /// Place the mask stations every `stride` nodes,
    /// fill the remaining nodes with values outside the mask range
    fn embed(mask: &Array1<f64>, stride: usize) -> Array1<f64> {
        let mut x = Array1::from_elem(mask.len() * stride, 2.);
        x.slice_mut(s![..;stride]).assign(mask);
        x
    }

    fn field(x: Array1<f64>, y: Array1<f64>, values: Array2<f64>, label: &str) -> GridField {
        GridField::new(x, y, values, label).unwrap()
    }

    #[test]
    fn test_same_grid_oscillating_is_degenerate() {
        let x = Array1::linspace(0., 1., 11);
        let y = Array1::linspace(0., 10., 51);
        let coarse = field(x.clone(), y.clone(), Array2::zeros((51, 11)), "field1");
        let medium = field(x.clone(), y.clone(), random((51, 11), 1), "field2");
        let fine = field(x.clone(), y.clone(), Array2::zeros((51, 11)), "field3");
        let mask = Grid::new(x, y);
        for norm in NORMS {
            for ratio in [2., 3.] {
                assert!(matches!(
                    observed_order(&coarse, &medium, &fine, ratio, &mask, norm),
                    Err(Error::DegenerateConvergence(_))
                ));
            }
        }
    }

    fn three_grids(nx: usize, ny: usize, ratio: usize, offset: u32, seed: u64) {
        let r2 = ratio.pow(offset + 2);
        let r1 = ratio.pow(offset + 1);
        let r0 = ratio.pow(offset);
        let mask = Grid::new(stations(nx, seed), stations(ny, seed + 1));

        let fine_values = random((ny * r2, nx * r2), seed + 2);
        let medium_values = fine_values.slice(s![..;ratio, ..;ratio]).to_owned() + 1.;
        let coarse_values = fine_values
            .slice(s![..;ratio * ratio, ..;ratio * ratio])
            .to_owned()
            + (1. + ratio as f64);

        let fine = field(
            embed(&mask.x, r2),
            embed(&mask.y, r2),
            fine_values,
            "fine",
        );
        let medium = field(
            embed(&mask.x, r1),
            embed(&mask.y, r1),
            medium_values,
            "medium",
        );
        let coarse = field(
            embed(&mask.x, r0),
            embed(&mask.y, r0),
            coarse_values,
            "coarse",
        );
        for norm in NORMS {
            let p = observed_order(&coarse, &medium, &fine, ratio as f64, &mask, norm).unwrap();
            assert_eq!(p, 1., "{} order", norm);
        }
    }

    #[test]
    fn test_three_grids_first_order() {
        three_grids(11, 11, 2, 0, 10);
        three_grids(11, 11, 2, 1, 20);
        three_grids(10, 21, 3, 0, 30);
        three_grids(21, 10, 3, 1, 40);
    }

    #[test]
    fn test_coarse_equals_medium_is_degenerate() {
        let x = Array1::linspace(0., 1., 5);
        let y = Array1::linspace(0., 1., 4);
        let a = field(x.clone(), y.clone(), random((4, 5), 3), "a");
        let b = field(x.clone(), y.clone(), random((4, 5), 4), "b");
        let mask = a.grid();
        assert!(matches!(
            observed_order(&a, &a, &b, 2., &mask, Norm::L2),
            Err(Error::DegenerateConvergence(_))
        ));
        assert!(matches!(
            observed_order(&b, &a, &a, 2., &mask, Norm::Linf),
            Err(Error::DegenerateConvergence(_))
        ));
    }

    #[test]
    fn test_invalid_ratio() {
        let x = Array1::linspace(0., 1., 3);
        let y = Array1::linspace(0., 1., 3);
        let f = field(x, y, Array2::zeros((3, 3)), "f");
        for ratio in [1., 0.5, f64::NAN] {
            assert!(matches!(
                observed_order(&f, &f, &f, ratio, &f.grid(), Norm::L2),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_mask_mismatch_propagates() {
        let x = Array1::linspace(0., 1., 3);
        let y = Array1::linspace(0., 1., 3);
        let f = field(x, y, Array2::zeros((3, 3)), "f");
        let mask = Grid::new(Array1::from(vec![0.25]), Array1::from(vec![0.]));
        assert!(matches!(
            observed_order(&f, &f, &f, 2., &mask, Norm::L2),
            Err(Error::GridMismatch { .. })
        ));
        assert!(matches!(
            error_norm(&f, &f, &mask, Norm::L2),
            Err(Error::GridMismatch { .. })
        ));
    }

    #[test]
    fn test_error_norm_reflexive() {
        let x = Array1::linspace(0., 10., 36);
        let y = Array1::linspace(-1., 1., 45);
        let f = field(x, y, random((45, 36), 5), "f");
        for norm in NORMS {
            assert_eq!(error_norm(&f, &f, &f.grid(), norm).unwrap(), 0.);
        }
    }

    #[test]
    fn test_error_norm_value() {
        let x = Array1::linspace(0., 1., 3);
        let y = Array1::linspace(0., 1., 2);
        let a = field(x.clone(), y.clone(), array![[0., 0., 0.], [0., 3., 0.]], "a");
        let b = field(x, y, array![[0., 0., 0.], [0., 0., 4.]], "b");
        let mask = a.grid();
        assert_eq!(error_norm(&a, &b, &mask, Norm::L2).unwrap(), 5.);
        assert_eq!(error_norm(&a, &b, &mask, Norm::Linf).unwrap(), 4.);
    }

    #[test]
    fn test_error_norm_invariant_to_storage_order() {
        let x = Array1::linspace(0., 1., 6);
        let y = Array1::linspace(0., 2., 5);
        let a_values = random((5, 6), 6);
        let b_values = random((5, 6), 7);
        let a = field(x.clone(), y.clone(), a_values, "a");
        let b = field(x.clone(), y.clone(), b_values.clone(), "b");

        // b stored with reversed x and permuted y
        let px: Vec<usize> = (0..6).rev().collect();
        let py: Vec<usize> = vec![3, 0, 4, 1, 2];
        let b_permuted = field(
            x.select(Axis(0), &px),
            y.select(Axis(0), &py),
            b_values.select(Axis(0), &py).select(Axis(1), &px),
            "b",
        );
        let mask = Grid::new(x.slice(s![..;2]).to_owned(), y.slice(s![..;2]).to_owned());
        for norm in NORMS {
            let e1 = error_norm(&a, &b, &mask, norm).unwrap();
            let e2 = error_norm(&a, &b_permuted, &mask, norm).unwrap();
            assert_eq!(e1, e2);
        }
    }

    #[test]
    fn test_analyzer_tolerance() {
        let x = Array1::linspace(0., 1., 3);
        let y = Array1::linspace(0., 1., 3);
        let f = field(x.clone(), y.clone(), Array2::zeros((3, 3)), "f");
        let mask = Grid::new(&x + 1e-5, y);
        assert!(error_norm(&f, &f, &mask, Norm::L2).is_err());
        let analyzer = ConvergenceAnalyzer::new(1e-4);
        assert_eq!(analyzer.subtract_tolerance, 2e-4);
        assert_eq!(analyzer.error_norm(&f, &f, &mask, Norm::L2).unwrap(), 0.);
    }

    #[test]
    fn test_analyzer_from_config() {
        let x = Array1::linspace(0., 1., 3);
        let y = Array1::linspace(0., 1., 3);
        let a = field(x.clone(), y.clone(), Array2::zeros((3, 3)), "a");
        let b = field(&x + 4e-4, y.clone(), Array2::zeros((3, 3)), "b");
        let mask = Grid::new(x, y);

        // wider restriction tolerance widens the subtraction tolerance
        let config = Config::from_yaml_str("restriction:\n  tolerance: 1.0e-3\n").unwrap();
        let analyzer = ConvergenceAnalyzer::from_config(&config);
        assert_eq!(analyzer, ConvergenceAnalyzer::new(1e-3));
        assert_eq!(analyzer.subtract_tolerance, 2e-3);
        assert_eq!(analyzer.error_norm(&a, &b, &mask, Norm::L2).unwrap(), 0.);

        // explicit subtraction tolerance takes precedence
        let config = Config::from_yaml_str(
            "restriction:\n  tolerance: 1.0e-3\n  subtract_tolerance: 1.0e-12\n",
        )
        .unwrap();
        let analyzer = ConvergenceAnalyzer::from_config(&config);
        assert_eq!(analyzer.tolerance, 1e-3);
        assert_eq!(analyzer.subtract_tolerance, 1e-12);
        assert!(matches!(
            analyzer.error_norm(&a, &b, &mask, Norm::L2),
            Err(Error::GridMismatch { .. })
        ));

        let analyzer = ConvergenceAnalyzer::from_config(&Config::default());
        assert_eq!(analyzer, ConvergenceAnalyzer::default());
        assert_eq!(analyzer.subtract_tolerance, 1e-4);
    }
}
