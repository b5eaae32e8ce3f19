use std::ops::{Add, Neg, Sub};

use nalgebra::Vector3;

/// Position–velocity pair.
///
/// Units
/// -----
/// * `position`: AU
/// * `velocity`: AU/day
///
/// The frame is implied by the producer (ICRF heliocentric for
/// [`get_heliocentric`](crate::solar_system::SolarSystem::get_heliocentric), ICRF
/// observer-centered for
/// [`get_observer_relative`](crate::solar_system::SolarSystem::get_observer_relative)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector { position, velocity }
    }

    pub fn zeros() -> Self {
        StateVector::new(Vector3::zeros(), Vector3::zeros())
    }

    /// Move the state `dt` days forward assuming constant velocity.
    ///
    /// The velocity is kept unchanged, so extrapolating twice by `dt/2` gives the same
    /// result as extrapolating once by `dt` (up to rounding).
    pub fn extrapolate(&self, dt: f64) -> Self {
        StateVector::new(self.position + self.velocity * dt, self.velocity)
    }

    /// Distance from the frame origin (AU).
    pub fn distance(&self) -> f64 {
        self.position.norm()
    }
}

impl Add for StateVector {
    type Output = StateVector;

    fn add(self, rhs: StateVector) -> StateVector {
        StateVector::new(self.position + rhs.position, self.velocity + rhs.velocity)
    }
}

impl Sub for StateVector {
    type Output = StateVector;

    fn sub(self, rhs: StateVector) -> StateVector {
        StateVector::new(self.position - rhs.position, self.velocity - rhs.velocity)
    }
}

impl Neg for StateVector {
    type Output = StateVector;

    fn neg(self) -> StateVector {
        StateVector::new(-self.position, -self.velocity)
    }
}
