//! Decaying Taylor-Green vortices
use super::Analytical;
use std::f64::consts::PI;

/// Taylor-Green vortices decaying under viscous dissipation
#[derive(Debug, Clone, PartialEq)]
pub struct DecayingVortices {
    /// Time
    pub time: f64,
    /// Reynolds number
    pub reynolds: f64,
    /// Amplitude of the velocity
    pub amplitude: f64,
}

impl DecayingVortices {
    /// Return solution at given time
    pub fn new(time: f64, reynolds: f64, amplitude: f64) -> Self {
        Self {
            time,
            reynolds,
            amplitude,
        }
    }

    /// exp(-n (2π)^2 t / Re)
    fn decay(&self, n: f64) -> f64 {
        (-n * (2. * PI).powi(2) * self.time / self.reynolds).exp()
    }
}

impl Analytical for DecayingVortices {
    fn x_velocity(&self, x: f64, y: f64) -> f64 {
        -self.amplitude * x.cos() * y.sin() * self.decay(2.)
    }

    fn y_velocity(&self, x: f64, y: f64) -> f64 {
        self.amplitude * x.sin() * y.cos() * self.decay(2.)
    }

    fn pressure(&self, x: f64, y: f64) -> f64 {
        -0.25 * ((2. * x).cos() + (2. * y).cos()) * self.decay(4.)
    }
}
