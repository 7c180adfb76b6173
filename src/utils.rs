//! Collection of usefull array methods
use ndarray::{Array1, ArrayBase, Data, Ix1};
use std::cmp::Ordering;

/// Argsort Vector ( smallest -> largest ).
/// Returns permutation vector. NaN compares equal to everything.
///
/// ```
/// use gridconv::utils::argsort;
/// use ndarray::{array, Axis};
/// let vec = array![3., 1., 2., 9., 7.];
/// let permut: Vec<usize> = argsort(vec.as_slice().unwrap());
/// let vec = vec.select(Axis(0), &permut).to_owned();
/// assert_eq!(vec, array![1.0, 2.0, 3.0, 7.0, 9.0]);
/// ```
pub fn argsort(vec: &[f64]) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..vec.len()).collect();

    perm.sort_by(|i, j| {
        if vec[*i] < vec[*j] {
            Ordering::Less
        } else if vec[*i] > vec[*j] {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
    perm
}

/// Return the midpoints between consecutive entries,
/// i.e. 0.5 * (a[1..] + a[..n-1]).
///
/// ```
/// use gridconv::utils::midpoints;
/// use ndarray::array;
/// assert_eq!(midpoints(&array![0., 1., 3.]), array![0.5, 2.0]);
/// ```
pub fn midpoints<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix1>) -> Array1<f64> {
    let n = a.len();
    if n < 2 {
        return Array1::zeros(0);
    }
    (&a.slice(ndarray::s![1..]) + &a.slice(ndarray::s![..n - 1])) * 0.5
}

/// Check whether entries increase strictly
pub fn is_strictly_increasing<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix1>) -> bool {
    a.windows(2).into_iter().all(|w| w[0] < w[1])
}
