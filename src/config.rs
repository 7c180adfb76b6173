//! Configuration of restriction and convergence studies
//!
//! Every entry is optional, missing entries fall back to defaults:
//! ```yaml
//! restriction:
//!   tolerance: 1.0e-6
//!   subtract_tolerance: 1.0e-4
//! convergence:
//!   norms: [L2, Linf]
//!   last_three: false
//!   ratio: 3.0
//! ```
use crate::convergence::{Norm, Triplet};
use crate::error::Result;
use crate::field::DEFAULT_TOLERANCE;
use serde::Deserialize;
use std::path::Path;

/// Top level configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coordinate matching
    pub restriction: RestrictionConfig,
    /// Observed order and error norms
    pub convergence: ConvergenceConfig,
}

/// Coordinate matching tolerances
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RestrictionConfig {
    /// Absolute tolerance to match mask stations
    pub tolerance: f64,
    /// Absolute tolerance to compare grids before subtraction,
    /// at least 1e-4 and twice `tolerance` if absent
    pub subtract_tolerance: Option<f64>,
}

/// Convergence study options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    /// Norms used for orders and errors
    pub norms: Vec<Norm>,
    /// Use the three finest grids for the observed order
    pub last_three: bool,
    /// Refinement ratio, derived from grid spacing if absent
    pub ratio: Option<f64>,
}

impl Default for RestrictionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            subtract_tolerance: None,
        }
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            norms: vec![Norm::L2],
            last_three: false,
            ratio: None,
        }
    }
}

impl ConvergenceConfig {
    /// Triplet selected by `last_three`
    pub fn triplet(&self) -> Triplet {
        Triplet::from_last_three(self.last_three)
    }
}

impl Config {
    /// Parse configuration from yaml
    ///
    /// # Errors
    /// Invalid yaml or entries of wrong type.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Read configuration from a yaml file
    ///
    /// # Errors
    /// File cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&contents)?;
        log::debug!("loaded config {:?}: {:?}", path.as_ref(), config);
        Ok(config)
    }
}
