//! Restriction of a field onto a coarser grid
//!
//! Every node of the coarse grid must also be a node of the fine
//! grid (up to an absolute tolerance). Staggered arrangements are
//! supported as long as the coarse stations coincide with fine ones.
use super::{Grid, GridField};
use crate::error::{Direction, Error, Result};
use crate::utils::argsort;
use ndarray::prelude::*;
use rayon::prelude::*;

/// Default absolute tolerance to match coordinates
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Restrict `field` onto the grid (`target_x`, `target_y`)
///
/// Rows of the result follow `target_y`, columns follow `target_x`.
/// The result owns its data.
///
/// # Errors
/// - `Shape` if the values of `field` do not match its coordinates
/// - `GridMismatch` if a target coordinate matches zero or more than
///   one station of `field` within `tolerance`
///
/// # Example
/// ```
/// use gridconv::{restrict, GridField, DEFAULT_TOLERANCE};
/// use ndarray::{s, Array1, Array2};
/// let x = Array1::linspace(0., 1., 9);
/// let y = Array1::linspace(0., 2., 5);
/// let values = Array2::from_shape_fn((5, 9), |(j, i)| (10 * j + i) as f64);
/// let fine = GridField::new(x.clone(), y.clone(), values.clone(), "pressure").unwrap();
/// let xc = x.slice(s![..;2]);
/// let yc = y.slice(s![..;2]);
/// let coarse = restrict(&fine, xc, yc, DEFAULT_TOLERANCE).unwrap();
/// assert_eq!(coarse.values(), values.slice(s![..;2, ..;2]));
/// ```
pub fn restrict(
    field: &GridField,
    target_x: ArrayView1<f64>,
    target_y: ArrayView1<f64>,
    tolerance: f64,
) -> Result<GridField> {
    field.check_shape()?;
    let ix = coincident_indices(field.x(), target_x, tolerance, Direction::X)?;
    let iy = coincident_indices(field.y(), target_y, tolerance, Direction::Y)?;
    log::debug!(
        "restrict {:?}: {:?} -> [{}, {}]",
        field.label(),
        field.shape(),
        iy.len(),
        ix.len()
    );
    let values = field
        .values()
        .select(Axis(0), &iy)
        .select(Axis(1), &ix);
    Ok(GridField {
        x: field.x().select(Axis(0), &ix),
        y: field.y().select(Axis(0), &iy),
        values,
        label: field.label().to_owned(),
        time_step: field.time_step(),
    })
}

/// Restrict a collection of independent fields (e.g. several time
/// steps) onto the same grid. Runs in parallel.
///
/// # Errors
/// First failure of [`restrict`].
pub fn restrict_all(fields: &[GridField], grid: &Grid, tolerance: f64) -> Result<Vec<GridField>> {
    fields
        .par_iter()
        .map(|f| f.restrict(grid, tolerance))
        .collect()
}

/// For every target station return the index of the unique
/// source station within tolerance.
fn coincident_indices(
    source: ArrayView1<f64>,
    target: ArrayView1<f64>,
    tolerance: f64,
    direction: Direction,
) -> Result<Vec<usize>> {
    let source: Vec<f64> = source.to_vec();
    let perm = argsort(&source);
    let sorted: Vec<f64> = perm.iter().map(|&i| source[i]).collect();

    let mut indices = Vec::with_capacity(target.len());
    for &t in target.iter() {
        let lower = sorted.partition_point(|&s| s < t - tolerance);
        let upper = sorted.partition_point(|&s| s <= t + tolerance);
        let matches = upper.saturating_sub(lower);
        if matches != 1 {
            return Err(Error::GridMismatch {
                direction,
                coordinate: t,
                matches,
                tolerance,
            });
        }
        indices.push(perm[lower]);
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::s;

    fn field() -> GridField {
        let x = Array1::linspace(0., 10., 9 * 4);
        let y = Array1::linspace(-1., 1., 9 * 5);
        let values = Array2::from_shape_fn((45, 36), |(j, i)| (j as f64).sin() + 0.1 * i as f64);
        GridField::new(x, y, values, "test")
            .unwrap()
            .with_time_step(3)
    }

    #[test]
    fn test_restrict_identity() {
        let f = field();
        let r = restrict(&f, f.x(), f.y(), DEFAULT_TOLERANCE).unwrap();
        assert_eq!(r, f);
    }

    #[test]
    fn test_restrict_stride() {
        let f = field();
        for k in [3, 9] {
            let r = restrict(
                &f,
                f.x().slice(s![..;k]),
                f.y().slice(s![..;k]),
                DEFAULT_TOLERANCE,
            )
            .unwrap();
            assert_eq!(r.values(), f.values().slice(s![..;k, ..;k]));
            assert_eq!(r.x(), f.x().slice(s![..;k]));
            assert_eq!(r.y(), f.y().slice(s![..;k]));
            assert_eq!(r.label(), "test");
            assert_eq!(r.time_step(), Some(3));
        }
    }

    #[test]
    fn test_restrict_missing_station() {
        let f = field();
        let x0 = f.x()[0];
        let target_x = Array1::from(vec![x0 + 0.5 * (f.x()[1] - f.x()[0])]);
        match restrict(&f, target_x.view(), f.y(), DEFAULT_TOLERANCE) {
            Err(Error::GridMismatch {
                direction, matches, ..
            }) => {
                assert_eq!(direction, Direction::X);
                assert_eq!(matches, 0);
            }
            other => panic!("expected grid mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_restrict_ambiguous_station() {
        let x = Array1::from(vec![0., 0.5, 0.5 + 1e-8, 1.]);
        let y = Array1::from(vec![0., 1.]);
        let f = GridField::new(x, y, Array2::zeros((2, 4)), "p").unwrap();
        let target_x = Array1::from(vec![0., 0.5]);
        assert!(matches!(
            restrict(&f, target_x.view(), f.y(), DEFAULT_TOLERANCE),
            Err(Error::GridMismatch { matches: 2, .. })
        ));
    }

    #[test]
    fn test_restrict_follows_target_order() {
        let x = Array1::from(vec![0., 1., 2.]);
        let y = Array1::from(vec![0., 1.]);
        let values = array![[0., 1., 2.], [10., 11., 12.]];
        let f = GridField::new(x, y, values, "p").unwrap();
        let target_x = Array1::from(vec![2., 0.]);
        let target_y = Array1::from(vec![1., 0.]);
        let r = restrict(&f, target_x.view(), target_y.view(), DEFAULT_TOLERANCE).unwrap();
        assert_eq!(r.values(), array![[12., 10.], [2., 0.]]);
        assert_eq!(r.x(), target_x);
    }

    #[test]
    fn test_restrict_output_does_not_alias() {
        let f = field();
        let r = f.restrict(&f.grid(), DEFAULT_TOLERANCE).unwrap();
        let (_, _, mut values) = r.into_parts();
        values.fill(0.);
        assert!(f.values().iter().any(|v| *v != 0.));
    }

    #[test]
    fn test_restrict_all() {
        let f = field();
        let fields: Vec<GridField> = (0..4).map(|t| f.clone().with_time_step(t)).collect();
        let grid = Grid::new(
            f.x().slice(s![..;3]).to_owned(),
            f.y().slice(s![..;3]).to_owned(),
        );
        let restricted = restrict_all(&fields, &grid, DEFAULT_TOLERANCE).unwrap();
        assert_eq!(restricted.len(), 4);
        for (t, r) in restricted.iter().enumerate() {
            assert_eq!(r.time_step(), Some(t));
            assert_eq!(r.shape(), grid.shape());
        }
    }

    #[test]
    fn test_restrict_all_propagates_failure() {
        let f = field();
        let grid = Grid::new(Array1::from(vec![100.]), f.y().to_owned());
        assert!(restrict_all(&[f], &grid, DEFAULT_TOLERANCE).is_err());
    }
}
