//! # Galilean satellites
//!
//! Jovicentric positions of Io, Europa, Ganymede and Callisto from their mean
//! longitudes (Lieske E5 theory as quoted by Meeus, chapter 44) corrected by the
//! principal terms of the Laplace resonance and of the solar perturbation, with the
//! matching radius-vector terms.
//!
//! The satellites are placed in Jupiter's equatorial plane (IAU pole). Their
//! longitudes, counted along the ecliptic of J2000 from the equinox, are projected
//! onto that plane. The velocity is the circular-motion derivative `ω × r`.
//! Positions are good to a few tenths of a degree of orbital longitude, enough to
//! place shadows and transits correctly on screen.
use nalgebra::Vector3;

use crate::{
    constants::{AU, MJD, RADEG},
    ref_system::{rotpn, RefEpoch, RefSystem},
    state_vector::StateVector,
    time::days_since_j2000,
};

/// Equatorial radius of Jupiter used as unit of the satellite radius vectors (km).
const JUPITER_RADIUS_KM: f64 = 71_398.0;

/// IAU 2009 north pole of Jupiter (ICRF, degrees).
const JUPITER_POLE_RA: f64 = 268.056595;
const JUPITER_POLE_DEC: f64 = 64.495303;

/// Longitude shift from the B1950 equinox of the theory to J2000 (degrees).
const PRECESSION_B1950_J2000: f64 = 0.6984;

/// Epoch of the mean longitudes, JD 2443000.5 as MJD.
const LIESKE_EPOCH: MJD = 43000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalileanMoon {
    Io,
    Europa,
    Ganymede,
    Callisto,
}

impl GalileanMoon {
    pub const ALL: [GalileanMoon; 4] = [
        GalileanMoon::Io,
        GalileanMoon::Europa,
        GalileanMoon::Ganymede,
        GalileanMoon::Callisto,
    ];

    pub fn horizons_id(self) -> i32 {
        match self {
            GalileanMoon::Io => 501,
            GalileanMoon::Europa => 502,
            GalileanMoon::Ganymede => 503,
            GalileanMoon::Callisto => 504,
        }
    }

    pub fn from_horizons_id(id: i32) -> Option<GalileanMoon> {
        GalileanMoon::ALL.into_iter().find(|m| m.horizons_id() == id)
    }

    fn index(self) -> usize {
        match self {
            GalileanMoon::Io => 0,
            GalileanMoon::Europa => 1,
            GalileanMoon::Ganymede => 2,
            GalileanMoon::Callisto => 3,
        }
    }
}

/// Mean longitude at the theory epoch and daily motion (degrees, degrees/day).
const MEAN_LONGITUDES: [(f64, f64); 4] = [
    (106.07719, 203.488955790),
    (175.73161, 101.374724735),
    (120.55883, 50.317609207),
    (84.44459, 21.571071177),
];

/// Unit vector of Jupiter's rotation axis in ICRF.
pub fn jupiter_pole() -> Vector3<f64> {
    let (sin_d, cos_d) = (JUPITER_POLE_DEC * RADEG).sin_cos();
    let (sin_a, cos_a) = (JUPITER_POLE_RA * RADEG).sin_cos();
    Vector3::new(cos_d * cos_a, cos_d * sin_a, sin_d)
}

/// Perturbed longitudes (radians) and radius vectors (Jupiter radii) of the four
/// satellites at `tt`.
fn longitudes_and_radii(tt: MJD) -> [(f64, f64); 4] {
    let t = tt - LIESKE_EPOCH;
    let d = days_since_j2000(tt);

    let [l1, l2, l3, l4] = MEAN_LONGITUDES
        .map(|(l0, rate)| (l0 + rate * t + PRECESSION_B1950_J2000) * RADEG);

    let g = (331.18 + 50.310482 * d) * RADEG;
    let h = (87.45 + 21.569231 * d) * RADEG;

    let res_12 = 2.0 * (l1 - l2);
    let res_23 = 2.0 * (l2 - l3);

    [
        (l1 + 0.473 * RADEG * res_12.sin(), 5.9057 - 0.0244 * res_12.cos()),
        (l2 + 1.065 * RADEG * res_23.sin(), 9.3966 - 0.0882 * res_23.cos()),
        (l3 + 0.165 * RADEG * g.sin(), 14.9883 - 0.0216 * g.cos()),
        (l4 + 0.843 * RADEG * h.sin(), 26.3627 - 0.1939 * h.cos()),
    ]
}

/// Jovicentric ICRF state of a Galilean satellite at `tt` (AU, AU/day).
pub fn jovicentric_state(moon: GalileanMoon, tt: MJD) -> StateVector {
    let (longitude, radius) = longitudes_and_radii(tt)[moon.index()];
    let pole = jupiter_pole();

    let ecl_to_icrf = rotpn(
        &RefSystem::Eclm(RefEpoch::J2000),
        &RefSystem::Equm(RefEpoch::J2000),
    );
    let direction = ecl_to_icrf * Vector3::new(longitude.cos(), longitude.sin(), 0.0);
    // Jupiter's equator is only ~2° from the ecliptic: the projection never vanishes.
    let in_plane = (direction - pole * direction.dot(&pole)).normalize();

    let position = in_plane * (radius * JUPITER_RADIUS_KM / AU);
    let angular_rate = MEAN_LONGITUDES[moon.index()].1 * RADEG;
    let velocity = pole.cross(&position) * angular_rate;

    StateVector::new(position, velocity)
}

#[cfg(test)]
mod galilean_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ids() {
        for m in GalileanMoon::ALL {
            assert_eq!(GalileanMoon::from_horizons_id(m.horizons_id()), Some(m));
        }
        assert_eq!(GalileanMoon::from_horizons_id(599), None);
    }

    #[test]
    fn test_orbits_lie_in_jupiter_equator() {
        let pole = jupiter_pole();
        let expected_radii = [5.9057, 9.3966, 14.9883, 26.3627];
        for (moon, r) in GalileanMoon::ALL.into_iter().zip(expected_radii) {
            let state = jovicentric_state(moon, 60123.4);
            assert!(state.position.dot(&pole).abs() < 1e-15);
            assert!(state.velocity.dot(&pole).abs() < 1e-15);
            let radius = state.position.norm() * AU / JUPITER_RADIUS_KM;
            assert_relative_eq!(radius, r, epsilon = 0.2);
        }
    }

    #[test]
    fn test_prograde_motion() {
        let pole = jupiter_pole();
        for moon in GalileanMoon::ALL {
            let state = jovicentric_state(moon, 58000.0);
            let h = state.position.cross(&state.velocity);
            assert!(h.dot(&pole) > 0.0);

            let later = jovicentric_state(moon, 58000.01);
            let fd = (later.position - state.position) / 0.01;
            assert!((fd - state.velocity).norm() < 0.05 * state.velocity.norm());
        }
    }

    #[test]
    fn test_io_period() {
        // Sidereal period of Io: 1.769 days
        let p0 = jovicentric_state(GalileanMoon::Io, 59000.0).position;
        let p1 = jovicentric_state(GalileanMoon::Io, 59000.0 + 360.0 / 203.488955790).position;
        assert!(p0.normalize().dot(&p1.normalize()) > 0.999);
    }
}
