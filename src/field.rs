//! # Scalar field on a rectilinear two-dimensional grid
//!
//! A [`GridField`] stores nodal values together with the coordinates
//! of the nodes. Fields are immutable: all operations return new
//! fields and never share storage with their inputs.
pub mod restrict;
pub use restrict::{restrict, restrict_all, DEFAULT_TOLERANCE};

use crate::error::{Direction, Error, Result};
use crate::utils::is_strictly_increasing;
use ndarray::prelude::*;

/// Absolute tolerance used to compare coordinates in [`GridField::subtract`]
pub const SUBTRACT_TOLERANCE: f64 = 1e-4;

/// Well-known field labels
pub mod labels {
    /// Velocity component along x
    pub const X_VELOCITY: &str = "x-velocity";
    /// Velocity component along y
    pub const Y_VELOCITY: &str = "y-velocity";
    /// Pressure
    pub const PRESSURE: &str = "pressure";
    /// Out-of-plane vorticity
    pub const VORTICITY: &str = "vorticity";
}

/// Nodal stations of a rectilinear grid
///
/// Used as mask grid onto which fields are restricted.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Stations along x
    pub x: Array1<f64>,
    /// Stations along y
    pub y: Array1<f64>,
}

impl Grid {
    /// Return new grid
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> Self {
        Self { x, y }
    }

    /// Grid-spacing of a uniform grid (taken along x)
    ///
    /// # Errors
    /// Fewer than two stations along x.
    pub fn spacing(&self) -> Result<f64> {
        uniform_spacing(&self.x)
    }

    /// Shape of a value array on this grid, (ny, nx)
    pub fn shape(&self) -> [usize; 2] {
        [self.y.len(), self.x.len()]
    }
}

impl From<(Array1<f64>, Array1<f64>)> for Grid {
    fn from(xy: (Array1<f64>, Array1<f64>)) -> Self {
        Self::new(xy.0, xy.1)
    }
}

/// Field values sampled on a rectilinear grid
///
/// x: ndarray
///
///   Stations along the first axis, len nx
///
/// y: ndarray
///
///   Stations along the second axis, len ny
///
/// values: ndarray
///
///   Nodal values with shape (ny, nx)
///
/// ```
/// use gridconv::GridField;
/// use ndarray::{Array1, Array2};
/// let x = Array1::linspace(0., 1., 5);
/// let y = Array1::linspace(0., 2., 3);
/// let field = GridField::new(x, y, Array2::zeros((3, 5)), "pressure").unwrap();
/// assert_eq!(field.shape(), [3, 5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    x: Array1<f64>,
    y: Array1<f64>,
    values: Array2<f64>,
    label: String,
    time_step: Option<usize>,
}

impl GridField {
    /// Returns field
    ///
    /// # Errors
    /// Shape of values differs from (len(y), len(x)).
    pub fn new<L: Into<String>>(
        x: Array1<f64>,
        y: Array1<f64>,
        values: Array2<f64>,
        label: L,
    ) -> Result<Self> {
        let field = Self {
            x,
            y,
            values,
            label: label.into(),
            time_step: None,
        };
        field.check_shape()?;
        Ok(field)
    }

    /// Tag field with the time step it was read at
    #[must_use]
    pub fn with_time_step(mut self, time_step: usize) -> Self {
        self.time_step = Some(time_step);
        self
    }

    /// Return field with a new label
    #[must_use]
    pub fn with_label<L: Into<String>>(mut self, label: L) -> Self {
        self.label = label.into();
        self
    }

    /// Stations along x
    pub fn x(&self) -> ArrayView1<f64> {
        self.x.view()
    }

    /// Stations along y
    pub fn y(&self) -> ArrayView1<f64> {
        self.y.view()
    }

    /// Nodal values, shape (ny, nx)
    pub fn values(&self) -> ArrayView2<f64> {
        self.values.view()
    }

    /// Semantic name
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Time step the field belongs to
    pub fn time_step(&self) -> Option<usize> {
        self.time_step
    }

    /// Shape of values, (ny, nx)
    pub fn shape(&self) -> [usize; 2] {
        [self.values.nrows(), self.values.ncols()]
    }

    /// Grid of the field
    pub fn grid(&self) -> Grid {
        Grid::new(self.x.clone(), self.y.clone())
    }

    /// Grid-spacing of a uniform grid (taken along x)
    ///
    /// # Errors
    /// Fewer than two stations along x.
    pub fn grid_spacing(&self) -> Result<f64> {
        uniform_spacing(&self.x)
    }

    /// True if both coordinate arrays increase strictly
    pub fn is_strictly_increasing(&self) -> bool {
        is_strictly_increasing(&self.x) && is_strictly_increasing(&self.y)
    }

    /// Decompose field into coordinates and values
    pub fn into_parts(self) -> (Array1<f64>, Array1<f64>, Array2<f64>) {
        (self.x, self.y, self.values)
    }

    /// Check that values have shape (len(y), len(x))
    ///
    /// # Errors
    /// Shape mismatch.
    pub fn check_shape(&self) -> Result<()> {
        let expected = [self.y.len(), self.x.len()];
        let found = [self.values.nrows(), self.values.ncols()];
        if expected == found {
            Ok(())
        } else {
            Err(Error::Shape {
                label: self.label.clone(),
                expected,
                found,
            })
        }
    }

    /// Restrict field onto a coarser grid, see [`restrict`]
    ///
    /// # Errors
    /// See [`restrict`].
    pub fn restrict(&self, grid: &Grid, tolerance: f64) -> Result<Self> {
        restrict(self, grid.x.view(), grid.y.view(), tolerance)
    }

    /// Return the difference self - other
    ///
    /// Both fields must live on the same grid
    /// (coordinates equal within [`SUBTRACT_TOLERANCE`]).
    ///
    /// # Errors
    /// Shapes or coordinates differ.
    ///
    /// ```
    /// use gridconv::GridField;
    /// use ndarray::{Array1, Array2};
    /// let x = Array1::linspace(0., 1., 4);
    /// let y = Array1::linspace(0., 1., 3);
    /// let f = GridField::new(x, y, Array2::ones((3, 4)), "pressure").unwrap();
    /// let zero = f.subtract(&f).unwrap();
    /// assert_eq!(zero.label(), "pressure-subtracted");
    /// assert!(zero.values().iter().all(|v| *v == 0.));
    /// ```
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.subtract_with_tolerance(other, SUBTRACT_TOLERANCE)
    }

    /// Return the difference self - other, coordinates
    /// must agree within `tolerance`
    ///
    /// # Errors
    /// Shapes or coordinates differ.
    pub fn subtract_with_tolerance(&self, other: &Self, tolerance: f64) -> Result<Self> {
        self.check_shape()?;
        other.check_shape()?;
        if self.shape() != other.shape() {
            return Err(Error::Shape {
                label: other.label.clone(),
                expected: self.shape(),
                found: other.shape(),
            });
        }
        check_close(&self.x, &other.x, tolerance, Direction::X)?;
        check_close(&self.y, &other.y, tolerance, Direction::Y)?;
        Ok(Self {
            x: self.x.clone(),
            y: self.y.clone(),
            values: &self.values - &other.values,
            label: format!("{}-subtracted", self.label),
            time_step: self.time_step,
        })
    }
}

/// (x[n-1] - x[0]) / (n - 1)
#[allow(clippy::cast_precision_loss)]
fn uniform_spacing(x: &Array1<f64>) -> Result<f64> {
    let n = x.len();
    if n < 2 {
        return Err(Error::InvalidParameter(format!(
            "grid spacing needs at least two stations, got {}",
            n
        )));
    }
    Ok((x[n - 1] - x[0]) / (n - 1) as f64)
}

fn check_close(
    a: &Array1<f64>,
    b: &Array1<f64>,
    tolerance: f64,
    direction: Direction,
) -> Result<()> {
    for (ai, bi) in a.iter().zip(b.iter()) {
        if (ai - bi).abs() > tolerance {
            return Err(Error::GridMismatch {
                direction,
                coordinate: *bi,
                matches: 0,
                tolerance,
            });
        }
    }
    Ok(())
}
