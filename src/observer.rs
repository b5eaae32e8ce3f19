//! # Observer snapshot
//!
//! An [`Observer`] is the read-only context of one query batch (typically one rendered
//! frame): the time, the barycentric states of the observer and of the Sun, the
//! heliocentric state of the Earth, and the ICRF ↔ ecliptic rotation of the date.
//!
//! ## Frames & conventions
//!
//! - All states are **ICRF** (mean equator and equinox of J2000), AU and AU/day.
//! - `sun_pvo` is the Sun seen from the observer: `sun_pvb − obs_pvb`.
//! - `ri2e` rotates ICRF vectors into the mean ecliptic and equinox **of date**.
//!
//! ## Fingerprint
//!
//! Every input that influences a position computation is folded into
//! [`Observer::fingerprint`], a 64-bit hash computed with a fixed-seed
//! [`ahash::RandomState`]. Two snapshots with bit-identical inputs have the same
//! fingerprint, which is what the observer-relative cache of each body is keyed on.
use std::hash::{BuildHasher, Hasher};

use hifitime::Epoch;
use nalgebra::Matrix3;

use crate::{
    constants::MJD,
    ephemeris::planets::approximate_earth_state,
    planetes_errors::PlanetesError,
    ref_system::{rotpn, RefEpoch, RefSystem},
    state_vector::StateVector,
    time::epoch_to_mjd_tt,
};

/// Seeds of the fingerprint hasher. Fixed so fingerprints are reproducible.
const FINGERPRINT_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// The fields are read-only: a snapshot is only built through [`Observer::new`] and
/// the constructors on top of it, which derive `sun_pvo`, the rotations and the
/// fingerprint from the input states.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    /// Time of the snapshot (MJD, TT).
    tt: MJD,
    /// Observer state relative to the solar-system barycentre.
    obs_pvb: StateVector,
    /// Sun state relative to the solar-system barycentre.
    sun_pvb: StateVector,
    /// Sun state relative to the observer.
    sun_pvo: StateVector,
    /// Earth state relative to the Sun.
    earth_pvh: StateVector,
    /// ICRF → mean ecliptic of date.
    ri2e: Matrix3<f64>,
    /// Mean ecliptic of date → ICRF.
    re2i: Matrix3<f64>,
    fingerprint: u64,
}

impl Observer {
    /// Build a snapshot from externally computed states.
    ///
    /// Arguments
    /// ---------
    /// * `tt`: time (MJD TT).
    /// * `obs_pvb`: observer barycentric state (ICRF, AU, AU/day).
    /// * `sun_pvb`: Sun barycentric state.
    /// * `earth_pvh`: Earth heliocentric state.
    pub fn new(
        tt: MJD,
        obs_pvb: StateVector,
        sun_pvb: StateVector,
        earth_pvh: StateVector,
    ) -> Self {
        let re2i = rotpn(
            &RefSystem::Eclm(RefEpoch::Epoch(tt)),
            &RefSystem::Equm(RefEpoch::J2000),
        );
        let mut obs = Observer {
            tt,
            obs_pvb,
            sun_pvb,
            sun_pvo: sun_pvb - obs_pvb,
            earth_pvh,
            ri2e: re2i.transpose(),
            re2i,
            fingerprint: 0,
        };
        obs.fingerprint = obs.compute_fingerprint();
        obs
    }

    /// Observer at the centre of the Earth, the barycentre being taken at the Sun.
    pub fn geocentric(tt: MJD, earth_pvh: StateVector) -> Self {
        Observer::new(tt, earth_pvh, StateVector::zeros(), earth_pvh)
    }

    /// Geocentric observer whose Earth state comes from the built-in mean-element
    /// series (see [`approximate_earth_state`]). Arc-minute accuracy, enough for
    /// tests and for hosts without an external ephemeris.
    pub fn approximate_geocentric(tt: MJD) -> Result<Self, PlanetesError> {
        Ok(Observer::geocentric(tt, approximate_earth_state(tt)?))
    }

    /// Same as [`Observer::new`] with the time given as an hifitime [`Epoch`].
    pub fn from_epoch(
        epoch: &Epoch,
        obs_pvb: StateVector,
        sun_pvb: StateVector,
        earth_pvh: StateVector,
    ) -> Self {
        Observer::new(epoch_to_mjd_tt(epoch), obs_pvb, sun_pvb, earth_pvh)
    }

    /// Copy of this snapshot at another time, every state left unchanged.
    pub fn with_time(&self, tt: MJD) -> Self {
        Observer::new(tt, self.obs_pvb, self.sun_pvb, self.earth_pvh)
    }

    /// Time of the snapshot (MJD, TT).
    pub fn tt(&self) -> MJD {
        self.tt
    }

    pub fn obs_pvb(&self) -> StateVector {
        self.obs_pvb
    }

    pub fn sun_pvb(&self) -> StateVector {
        self.sun_pvb
    }

    /// Sun state relative to the observer, `sun_pvb − obs_pvb`.
    pub fn sun_pvo(&self) -> StateVector {
        self.sun_pvo
    }

    pub fn earth_pvh(&self) -> StateVector {
        self.earth_pvh
    }

    /// ICRF → mean ecliptic of date.
    pub fn ri2e(&self) -> &Matrix3<f64> {
        &self.ri2e
    }

    /// Mean ecliptic of date → ICRF.
    pub fn re2i(&self) -> &Matrix3<f64> {
        &self.re2i
    }

    /// Observer heliocentric state.
    pub fn obs_pvh(&self) -> StateVector {
        -self.sun_pvo
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    fn compute_fingerprint(&self) -> u64 {
        let mut hasher = ahash::RandomState::with_seeds(
            FINGERPRINT_SEEDS[0],
            FINGERPRINT_SEEDS[1],
            FINGERPRINT_SEEDS[2],
            FINGERPRINT_SEEDS[3],
        )
        .build_hasher();

        hasher.write_u64(self.tt.to_bits());
        for sv in [&self.obs_pvb, &self.sun_pvb, &self.earth_pvh] {
            for x in sv.position.iter().chain(sv.velocity.iter()) {
                hasher.write_u64(x.to_bits());
            }
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod observer_test {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn earth() -> StateVector {
        StateVector::new(
            Vector3::new(-0.17, 0.89, 0.39),
            Vector3::new(-0.0172, -0.0028, -0.0012),
        )
    }

    #[test]
    fn test_sun_relative_to_observer() {
        let obs = Observer::geocentric(60000.0, earth());
        assert_eq!(obs.sun_pvo, -earth());
        assert_eq!(obs.obs_pvh(), earth());
        assert_relative_eq!(obs.ri2e * obs.re2i, Matrix3::identity(), epsilon = 1e-14);
    }

    #[test]
    fn test_fingerprint() {
        let a = Observer::geocentric(60000.0, earth());
        let b = Observer::geocentric(60000.0, earth());
        assert_eq!(a.fingerprint(), b.fingerprint());

        let later = a.with_time(60000.0 + 1e-9);
        assert_ne!(a.fingerprint(), later.fingerprint());

        let moved = Observer::new(
            60000.0,
            earth().extrapolate(1e-6),
            StateVector::zeros(),
            earth(),
        );
        assert_ne!(a.fingerprint(), moved.fingerprint());
    }

    #[test]
    fn test_from_epoch() {
        let epoch = crate::time::mjd_tt_to_epoch(60000.5);
        let obs = Observer::from_epoch(&epoch, earth(), StateVector::zeros(), earth());
        assert_relative_eq!(obs.tt, 60000.5, epsilon = 1e-9);
    }
}
