//! Error types
use std::fmt;
use thiserror::Error;

/// Crate wide result type
pub type Result<T> = std::result::Result<T, Error>;

/// Coordinate direction of a two-dimensional grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// First axis (columns of the value array)
    X,
    /// Second axis (rows of the value array)
    Y,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::X => write!(f, "x"),
            Direction::Y => write!(f, "y"),
        }
    }
}

/// Errors raised by restriction, comparison and post-processing routines
#[derive(Debug, Error)]
pub enum Error {
    /// Values do not match the lengths of the coordinate arrays
    #[error("shape mismatch for {label:?}: values have shape {found:?}, expected {expected:?}")]
    Shape {
        /// Label of the offending field
        label: String,
        /// Shape implied by the coordinates, (ny, nx)
        expected: [usize; 2],
        /// Actual shape of the values
        found: [usize; 2],
    },

    /// A target coordinate has zero or several matches on the source grid
    #[error("grid mismatch along {direction}: coordinate {coordinate} has {matches} matches within {tolerance}")]
    GridMismatch {
        /// Direction of the coordinate
        direction: Direction,
        /// Target coordinate
        coordinate: f64,
        /// Number of source coordinates within tolerance
        matches: usize,
        /// Absolute matching tolerance
        tolerance: f64,
    },

    /// Observed order would require log(0) or a division by zero
    #[error("degenerate convergence: {0}")]
    DegenerateConvergence(String),

    /// Velocity components are not arranged on a consistent staggered grid
    #[error("staggered layout mismatch along {direction}: expected {expected} nodes, found {found}")]
    StaggeredLayout {
        /// Direction of the inconsistency
        direction: Direction,
        /// Number of nodes implied by the other component
        expected: usize,
        /// Number of nodes found
        found: usize,
    },

    /// Invalid argument
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough samples to compute a statistic
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Reading the configuration failed
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Contents are not valid yaml for the configuration
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(ConfigError::Io(err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(ConfigError::Yaml(err))
    }
}
