//! Taylor-Green vortices advected by a uniform stream
use super::Analytical;
use std::f64::consts::PI;

/// Vortices moving diagonally with unit velocity (inviscid)
#[derive(Debug, Clone, PartialEq)]
pub struct MovingVortices {
    /// Time
    pub time: f64,
}

impl MovingVortices {
    /// Return solution at given time
    pub fn new(time: f64) -> Self {
        Self { time }
    }

    fn shift(&self) -> f64 {
        2. * PI * self.time
    }
}

impl Analytical for MovingVortices {
    fn x_velocity(&self, x: f64, y: f64) -> f64 {
        1. - 2. * (x - self.shift()).cos() * (y - self.shift()).sin()
    }

    fn y_velocity(&self, x: f64, y: f64) -> f64 {
        1. + 2. * (x - self.shift()).sin() * (y - self.shift()).cos()
    }

    fn pressure(&self, x: f64, y: f64) -> f64 {
        -(2. * (x - self.shift())).cos() - (2. * (y - self.shift())).cos()
    }
}
