use crate::{
    constants::{DPI, MJD},
    kepler::{principal_angle, propagate},
    orb_elem::derive_elements,
    planetes_errors::PlanetesError,
    state_vector::StateVector,
};

/// Keplerian orbital elements
/// Units:
/// * `reference_epoch`: MJD (TT)
/// * `semi_major_axis`: AU (Astronomical Units)
/// * `eccentricity`: unitless
/// * `inclination`: radians
/// * `ascending_node_longitude`: radians
/// * `periapsis_argument`: radians
/// * `mean_anomaly`: radians, at `reference_epoch`
/// * `mean_motion`: radians/day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerianElements {
    pub reference_epoch: MJD,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
    pub mean_motion: f64,
}

impl KeplerianElements {
    /// Osculating elements of a relative state, see [`derive_elements`].
    pub fn from_state(epoch: MJD, state: &StateVector, mu: f64) -> Result<Self, PlanetesError> {
        derive_elements(epoch, &state.position, &state.velocity, mu)
    }

    /// Check that the elements describe a bound orbit the propagator accepts.
    pub fn validate(&self) -> Result<(), PlanetesError> {
        let finite = [
            self.reference_epoch,
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
            self.mean_anomaly,
            self.mean_motion,
        ]
        .iter()
        .all(|x| x.is_finite());

        if !finite {
            return Err(PlanetesError::InvalidOrbit("non finite element".into()));
        }
        if self.semi_major_axis <= 0.0 {
            return Err(PlanetesError::InvalidOrbit(format!(
                "semi-major axis must be positive, got {}",
                self.semi_major_axis
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(PlanetesError::InvalidOrbit(format!(
                "only elliptic orbits are supported, got e = {}",
                self.eccentricity
            )));
        }
        Ok(())
    }

    /// Orbital period in days, infinite when the mean motion is zero.
    pub fn period(&self) -> f64 {
        if self.mean_motion == 0.0 {
            f64::INFINITY
        } else {
            DPI / self.mean_motion.abs()
        }
    }

    /// Mean anomaly at `time`, wrapped to `[0, 2π)`.
    pub fn mean_anomaly_at(&self, time: MJD) -> f64 {
        principal_angle(self.mean_anomaly + self.mean_motion * (time - self.reference_epoch))
    }

    /// Two-body state at `time`, in the frame the elements are referred to.
    pub fn propagate(&self, time: MJD) -> Result<StateVector, PlanetesError> {
        let (position, velocity) = propagate(
            self.reference_epoch,
            time,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
            self.semi_major_axis,
            self.mean_motion,
            self.eccentricity,
            self.mean_anomaly,
        )?;
        Ok(StateVector::new(position, velocity))
    }
}
