//! Calculate vorticity from staggered velocity components
//!
//! On a staggered (MAC) grid the x-velocity lives on the vertical
//! cell faces and the y-velocity on the horizontal cell faces.
//! The vorticity dv/dx - du/dy is evaluated at the cell vertices
//! enclosed by both components. [`velocity_cell_centers`] averages
//! both components onto the interior cell centres.
//!
//! # Example
//!
//! ```
//! use gridconv::vorticity::vorticity;
//! use gridconv::GridField;
//! use gridconv::utils::midpoints;
//! use ndarray::{Array1, Array2};
//!
//! let (nx, ny) = (8, 6);
//! let xg = Array1::linspace(0., 1., nx + 1);
//! let yg = Array1::linspace(0., 1., ny + 1);
//! let (xc, yc) = (midpoints(&xg), midpoints(&yg));
//! let xu = xg.slice(ndarray::s![1..nx]).to_owned();
//! let yv = yg.slice(ndarray::s![1..ny]).to_owned();
//! // solid body rotation
//! let u = Array2::from_shape_fn((ny, nx - 1), |(j, _)| -yc[j]);
//! let v = Array2::from_shape_fn((ny - 1, nx), |(_, i)| xc[i]);
//! let u = GridField::new(xu, yc.clone(), u, "x-velocity").unwrap();
//! let v = GridField::new(xc.clone(), yv, v, "y-velocity").unwrap();
//! let w = vorticity(&u, &v).unwrap();
//! assert!(w.values().iter().all(|w| (w - 2.).abs() < 1e-12));
//! ```
use crate::error::{Direction, Error, Result};
use crate::field::{labels, GridField};
use crate::utils::midpoints;
use ndarray::prelude::*;

/// Compute dv/dx - du/dy from staggered velocity components
///
/// # Errors
/// - `Shape` if a component violates its shape invariant
/// - `StaggeredLayout` if the components are not staggered
///   with respect to each other
pub fn vorticity(u: &GridField, v: &GridField) -> Result<GridField> {
    u.check_shape()?;
    v.check_shape()?;
    let (ux, uy) = (u.x(), u.y());
    let (vx, vy) = (v.x(), v.y());
    if vx.len() < 2 || uy.len() < 2 {
        return Err(Error::InvalidParameter(
            "vorticity needs at least two stations per direction".to_owned(),
        ));
    }

    // u-columns enclosed by v-stations, v-rows enclosed by u-stations
    let (vx0, vx1) = (vx[0], vx[vx.len() - 1]);
    let (uy0, uy1) = (uy[0], uy[uy.len() - 1]);
    let mask_x: Vec<usize> = (0..ux.len())
        .filter(|&i| ux[i] > vx0 && ux[i] < vx1)
        .collect();
    let mask_y: Vec<usize> = (0..vy.len())
        .filter(|&j| vy[j] > uy0 && vy[j] < uy1)
        .collect();

    let xw = midpoints(&vx);
    let yw = midpoints(&uy);
    if mask_x.len() != xw.len() {
        return Err(Error::StaggeredLayout {
            direction: Direction::X,
            expected: xw.len(),
            found: mask_x.len(),
        });
    }
    if mask_y.len() != yw.len() {
        return Err(Error::StaggeredLayout {
            direction: Direction::Y,
            expected: yw.len(),
            found: mask_y.len(),
        });
    }

    let uv = u.values();
    let vv = v.values();
    let w = Array2::from_shape_fn((yw.len(), xw.len()), |(j, i)| {
        let jv = mask_y[j];
        let iu = mask_x[i];
        (vv[[jv, i + 1]] - vv[[jv, i]]) / (vx[i + 1] - vx[i])
            - (uv[[j + 1, iu]] - uv[[j, iu]]) / (uy[j + 1] - uy[j])
    });
    log::debug!("vorticity on [{}, {}] vertices", yw.len(), xw.len());

    let field = GridField::new(xw, yw, w, labels::VORTICITY)?;
    Ok(match u.time_step() {
        Some(t) => field.with_time_step(t),
        None => field,
    })
}

/// Interpolate staggered velocity components onto the interior
/// cell centres (v.x[1..n-1], u.y[1..n-1]) by averaging the two
/// neighbouring faces.
///
/// Returns the x- and y-velocity on the common centres, labels and
/// time steps are kept.
///
/// # Errors
/// - `InvalidParameter` if there are no interior cell centres
/// - `StaggeredLayout` if the components are not staggered
///   with respect to each other
pub fn velocity_cell_centers(u: &GridField, v: &GridField) -> Result<(GridField, GridField)> {
    u.check_shape()?;
    v.check_shape()?;
    let (vx, uy) = (v.x(), u.y());
    if vx.len() < 3 || uy.len() < 3 {
        return Err(Error::InvalidParameter(
            "cell centres need at least three stations per direction".to_owned(),
        ));
    }
    let [_, u_cols] = u.shape();
    let [v_rows, _] = v.shape();
    if u_cols + 1 != vx.len() {
        return Err(Error::StaggeredLayout {
            direction: Direction::X,
            expected: vx.len() - 1,
            found: u_cols,
        });
    }
    if v_rows + 1 != uy.len() {
        return Err(Error::StaggeredLayout {
            direction: Direction::Y,
            expected: uy.len() - 1,
            found: v_rows,
        });
    }

    let xc = vx.slice(s![1..vx.len() - 1]).to_owned();
    let yc = uy.slice(s![1..uy.len() - 1]).to_owned();
    let (uv, vv) = (u.values(), v.values());
    let uc = (&uv.slice(s![1..-1, ..-1]) + &uv.slice(s![1..-1, 1..])) * 0.5;
    let vc = (&vv.slice(s![..-1, 1..-1]) + &vv.slice(s![1.., 1..-1])) * 0.5;
    log::debug!("velocity on [{}, {}] cell centres", yc.len(), xc.len());

    let centred = |field: &GridField, values: Array2<f64>| -> Result<GridField> {
        let centred = GridField::new(xc.clone(), yc.clone(), values, field.label())?;
        Ok(match field.time_step() {
            Some(t) => centred.with_time_step(t),
            None => centred,
        })
    };
    Ok((centred(u, uc)?, centred(v, vc)?))
}
