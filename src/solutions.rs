//! # Analytical solutions
//!
//! Exact solutions of periodic two-dimensional flows, used as
//! reference when computing errors of numerical solutions.
//!
//! The physical domain spanned by the grid is mapped onto
//! [0, 2π] x [0, 2π]. Fields are sampled on the staggered
//! arrangement of the grid:
//! - x-velocity on the interior vertical faces
//! - y-velocity on the interior horizontal faces
//! - pressure at the cell centres
pub mod decaying_vortices;
pub mod moving_vortices;
pub use decaying_vortices::DecayingVortices;
pub use moving_vortices::MovingVortices;

use crate::error::{Error, Result};
use crate::field::{labels, Grid, GridField};
use crate::utils::midpoints;
use enum_dispatch::enum_dispatch;
use ndarray::prelude::*;
use std::f64::consts::PI;

/// Pointwise evaluation on mapped coordinates (x, y) in [0, 2π]
#[enum_dispatch]
pub trait Analytical {
    /// Velocity component along x
    fn x_velocity(&self, x: f64, y: f64) -> f64;
    /// Velocity component along y
    fn y_velocity(&self, x: f64, y: f64) -> f64;
    /// Pressure
    fn pressure(&self, x: f64, y: f64) -> f64;
}

/// All analytical solutions must implement the [`Analytical`] trait,
/// which is derived for this enum.
#[enum_dispatch(Analytical)]
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// Decaying Taylor-Green vortices
    DecayingVortices(DecayingVortices),
    /// Taylor-Green vortices advected by a uniform flow
    MovingVortices(MovingVortices),
}

/// Velocity components and pressure of a solution
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFields {
    /// Velocity along x
    pub x_velocity: GridField,
    /// Velocity along y
    pub y_velocity: GridField,
    /// Pressure
    pub pressure: GridField,
}

impl FlowFields {
    /// Field by label, see [`labels`]
    pub fn get(&self, label: &str) -> Option<&GridField> {
        match label {
            labels::X_VELOCITY => Some(&self.x_velocity),
            labels::Y_VELOCITY => Some(&self.y_velocity),
            labels::PRESSURE => Some(&self.pressure),
            _ => None,
        }
    }
}

impl Solution {
    /// Construct solution by name and list of parameters
    ///
    /// - `DecayingVortices` (alias `TaylorGreenVortex`): time, Reynolds number, amplitude
    /// - `MovingVortices`: time
    ///
    /// # Errors
    /// Unknown name or wrong number of parameters.
    ///
    /// ```
    /// use gridconv::solutions::Solution;
    /// let solution = Solution::from_name("MovingVortices", &[0.25]).unwrap();
    /// assert!(Solution::from_name("Lamb-Oseen", &[]).is_err());
    /// ```
    pub fn from_name(name: &str, parameters: &[f64]) -> Result<Self> {
        let check_count = |n: usize| -> Result<()> {
            if parameters.len() == n {
                Ok(())
            } else {
                Err(Error::InvalidParameter(format!(
                    "{} expects {} parameters, got {}",
                    name,
                    n,
                    parameters.len()
                )))
            }
        };
        match name {
            "DecayingVortices" | "TaylorGreenVortex" => {
                check_count(3)?;
                Ok(DecayingVortices::new(parameters[0], parameters[1], parameters[2]).into())
            }
            "MovingVortices" => {
                check_count(1)?;
                Ok(MovingVortices::new(parameters[0]).into())
            }
            _ => Err(Error::InvalidParameter(format!(
                "unknown analytical solution {:?}",
                name
            ))),
        }
    }

    /// Sample velocities and pressure on the staggered arrangement
    /// of a grid given by its cell vertices
    ///
    /// # Errors
    /// Fewer than three vertices along a direction, or a
    /// degenerate domain.
    pub fn fields(&self, grid: &Grid) -> Result<FlowFields> {
        let (nx, ny) = (grid.x.len(), grid.y.len());
        if nx < 3 || ny < 3 {
            return Err(Error::InvalidParameter(format!(
                "staggered sampling needs at least 3 vertices per direction, got [{}, {}]",
                nx, ny
            )));
        }
        let map_x = Mapping::new(grid.x[0], grid.x[nx - 1])?;
        let map_y = Mapping::new(grid.y[0], grid.y[ny - 1])?;
        let xc = midpoints(&grid.x);
        let yc = midpoints(&grid.y);
        let xf = grid.x.slice(s![1..nx - 1]).to_owned();
        let yf = grid.y.slice(s![1..ny - 1]).to_owned();

        let x_velocity = sample(xf, yc.clone(), map_x, map_y, labels::X_VELOCITY, |x, y| {
            self.x_velocity(x, y)
        })?;
        let y_velocity = sample(xc.clone(), yf, map_x, map_y, labels::Y_VELOCITY, |x, y| {
            self.y_velocity(x, y)
        })?;
        let pressure = sample(xc, yc, map_x, map_y, labels::PRESSURE, |x, y| {
            self.pressure(x, y)
        })?;
        Ok(FlowFields {
            x_velocity,
            y_velocity,
            pressure,
        })
    }
}

/// Linear map of [lower, upper] onto [0, 2π]
#[derive(Debug, Clone, Copy)]
struct Mapping {
    lower: f64,
    length: f64,
}

impl Mapping {
    fn new(lower: f64, upper: f64) -> Result<Self> {
        let length = upper - lower;
        if length.is_finite() && length > 0. {
            Ok(Self { lower, length })
        } else {
            Err(Error::InvalidParameter(format!(
                "degenerate domain [{}, {}]",
                lower, upper
            )))
        }
    }

    fn apply(&self, x: f64) -> f64 {
        2. * PI * (x - self.lower) / self.length
    }
}

fn sample<F>(
    x: Array1<f64>,
    y: Array1<f64>,
    map_x: Mapping,
    map_y: Mapping,
    label: &str,
    f: F,
) -> Result<GridField>
where
    F: Fn(f64, f64) -> f64,
{
    let values = Array2::from_shape_fn((y.len(), x.len()), |(j, i)| {
        f(map_x.apply(x[i]), map_y.apply(y[j]))
    });
    Ok(GridField::new(x, y, values, label)?.with_time_step(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(nx: usize, ny: usize) -> Grid {
        Grid::new(Array1::linspace(0., 1., nx + 1), Array1::linspace(-1., 1., ny + 1))
    }

    #[test]
    fn test_staggered_shapes() {
        let (nx, ny) = (8, 6);
        let solution = Solution::from_name("TaylorGreenVortex", &[0., 100., 1.]).unwrap();
        let fields = solution.fields(&grid(nx, ny)).unwrap();
        assert_eq!(fields.x_velocity.shape(), [ny, nx - 1]);
        assert_eq!(fields.y_velocity.shape(), [ny - 1, nx]);
        assert_eq!(fields.pressure.shape(), [ny, nx]);
        assert_eq!(fields.get("pressure").unwrap().label(), "pressure");
        assert_eq!(fields.get("y-velocity").unwrap().time_step(), Some(0));
        assert!(fields.get("vorticity").is_none());
    }

    #[test]
    fn test_wrong_parameters() {
        assert!(matches!(
            Solution::from_name("DecayingVortices", &[0., 100.]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            Solution::from_name("Unknown", &[]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_too_coarse_grid() {
        let solution = Solution::from_name("MovingVortices", &[0.]).unwrap();
        assert!(solution.fields(&grid(1, 4)).is_err());
        let flat = Grid::new(Array1::zeros(4), Array1::linspace(0., 1., 4));
        assert!(solution.fields(&flat).is_err());
    }

    #[test]
    fn test_mapping() {
        let m = Mapping::new(-1., 1.).unwrap();
        assert!((m.apply(0.) - PI).abs() < 1e-14);
        assert!((m.apply(1.) - 2. * PI).abs() < 1e-14);
    }
}
