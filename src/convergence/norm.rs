//! Vector norms of flattened arrays
use crate::error::Error;
use ndarray::{ArrayBase, Data, Dimension};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Norm used to measure differences between solutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Norm {
    /// Euclidean norm of the flattened array
    L2,
    /// Maximum absolute value
    Linf,
}

impl Norm {
    /// Apply norm to all entries of an array
    ///
    /// ```
    /// use gridconv::Norm;
    /// use ndarray::array;
    /// let a = array![[3., 0.], [0., -4.]];
    /// assert_eq!(Norm::L2.of(&a), 5.);
    /// assert_eq!(Norm::Linf.of(&a), 4.);
    /// ```
    pub fn of<A, S, D>(&self, a: &ArrayBase<S, D>) -> A
    where
        A: Float,
        S: Data<Elem = A>,
        D: Dimension,
    {
        match self {
            Norm::L2 => a.fold(A::zero(), |acc, &v| acc + v * v).sqrt(),
            Norm::Linf => a.fold(A::zero(), |acc, &v| {
                if acc.is_nan() || v.is_nan() {
                    A::nan()
                } else {
                    acc.max(v.abs())
                }
            }),
        }
    }
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Norm::L2 => write!(f, "L2"),
            Norm::Linf => write!(f, "Linf"),
        }
    }
}

impl FromStr for Norm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L2" => Ok(Norm::L2),
            "Linf" => Ok(Norm::Linf),
            _ => Err(Error::InvalidParameter(format!(
                "unknown norm {:?}, choose L2 or Linf",
                s
            ))),
        }
    }
}
