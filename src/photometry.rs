//! # Photometric models
//!
//! Apparent visual magnitudes and phase quantities, as pure functions of the
//! geometry. [`SolarSystem`](crate::solar_system::SolarSystem) computes the
//! positions and dispatches to the model matching the body class:
//!
//! | body class     | model                                                      |
//! |----------------|------------------------------------------------------------|
//! | Sun            | absolute magnitude + distance modulus, eclipse attenuation |
//! | Moon           | empirical elongation/distance law                          |
//! | major planets  | tabulated base magnitude + cubic phase law (+ Saturn rings)|
//! | other bodies   | asteroid `H` from albedo and diameter                      |
//!
//! Distances are in AU and angles in radians. Every logarithm argument is floored,
//! so degenerate geometries (zero distance, zero albedo) yield large but finite
//! magnitudes.
use std::f64::consts::PI;

use crate::{
    constants::{Magnitude, Radian, RADEG, SUN_ABSOLUTE_VMAG},
    ephemeris::planets::Planet,
    ref_system::angular_separation,
};
use nalgebra::Vector3;

/// Smallest `r·Δ` product (AU²) entering a distance modulus.
const MIN_DISTANCE_PRODUCT: f64 = 1e-12;

/// Smallest geometric albedo of a generic body.
const MIN_ALBEDO: f64 = 1e-4;

/// Smallest diameter of a generic body (km).
const MIN_DIAMETER_KM: f64 = 1e-3;

/// Reference distance of the lunar law (AU).
const MOON_REFERENCE_DISTANCE: f64 = 0.0025;

/// Apparent magnitude of the full Moon at the reference distance.
const MOON_FULL_VMAG: f64 = -12.7;

/// `5·log10(r·Δ)`, the distance part of every planetary magnitude.
fn distance_modulus(heliocentric_distance: f64, observer_distance: f64) -> f64 {
    5.0 * (heliocentric_distance * observer_distance)
        .max(MIN_DISTANCE_PRODUCT)
        .log10()
}

/// Phase angle of a body: angle at the body between the Sun and the observer.
///
/// Arguments
/// ---------
/// * `heliocentric`: body position relative to the Sun.
/// * `observer_relative`: body position relative to the observer.
pub fn phase_angle(heliocentric: &Vector3<f64>, observer_relative: &Vector3<f64>) -> Radian {
    angular_separation(heliocentric, observer_relative)
}

/// Illuminated fraction of the disk for a given phase angle, `(1 + cos i) / 2`.
///
/// NaN propagates, so an undefined phase yields an undefined fraction.
pub fn illuminated_fraction(phase: Radian) -> f64 {
    0.5 * phase.cos() + 0.5
}

/// Apparent magnitude of the Sun.
///
/// `4.83 + 5·(log10(d_pc) − 1) − 2.5·log10(max(f, floor))`
///
/// Arguments
/// ---------
/// * `distance`: Sun–observer distance (AU).
/// * `eclipse_factor`: unobstructed fraction of the disk, in `[0, 1]`.
/// * `floor`: smallest factor used, keeps the magnitude finite during totality.
pub fn sun_magnitude(distance: f64, eclipse_factor: f64, floor: f64) -> Magnitude {
    let parsecs = (distance * PI / 648_000.0).max(f64::MIN_POSITIVE);
    SUN_ABSOLUTE_VMAG + 5.0 * (parsecs.log10() - 1.0)
        - 2.5 * eclipse_factor.max(floor).log10()
}

/// Apparent magnitude of the Moon from its elongation and distance.
///
/// Arguments
/// ---------
/// * `elongation`: Sun–Moon angular separation seen by the observer.
/// * `distance`: Moon–observer distance (AU).
pub fn moon_magnitude(elongation: Radian, distance: f64) -> Magnitude {
    // The 1e-6 keeps the log finite at zero elongation (new moon).
    let lit = PI / 2.0 * (1.0 + 1e-6 - elongation.cos());
    MOON_FULL_VMAG
        + 2.5 * (PI.log10() - lit.log10())
        + 5.0 * (distance.max(f64::MIN_POSITIVE) / MOON_REFERENCE_DISTANCE).log10()
}

/// Base magnitude and phase-law coefficients `[V(1,0), c1, c2, c3]`, the phase angle
/// being counted in units of 100°.
fn visual_coefficients(planet: Planet) -> [f64; 4] {
    match planet {
        Planet::Mercury => [-0.36, 3.80, -2.73, 2.00],
        Planet::Venus => [-4.29, 0.09, 2.39, -0.65],
        Planet::Mars => [-1.52, 1.60, 0.0, 0.0],
        Planet::Jupiter => [-9.25, 0.50, 0.0, 0.0],
        Planet::Saturn => [-8.88, 4.40, 0.0, 0.0],
        Planet::Uranus => [-7.19, 0.28, 0.0, 0.0],
        Planet::Neptune => [-6.87, 0.0, 0.0, 0.0],
    }
}

/// Apparent magnitude of a major planet, ring contribution excluded.
///
/// `V(1,0) + 5·log10(r·Δ) + i·(c1 + i·(c2 + i·c3))` with `i` the phase angle in
/// units of 100°.
///
/// Arguments
/// ---------
/// * `planet`: the planet.
/// * `heliocentric_distance`: `r`, Sun–planet distance (AU).
/// * `observer_distance`: `Δ`, observer–planet distance (AU).
/// * `phase`: phase angle (radians).
pub fn planet_magnitude(
    planet: Planet,
    heliocentric_distance: f64,
    observer_distance: f64,
    phase: Radian,
) -> Magnitude {
    let [base, c1, c2, c3] = visual_coefficients(planet);
    let i = phase / RADEG / 100.0;
    base + distance_modulus(heliocentric_distance, observer_distance)
        + i * (c1 + i * (c2 + i * c3))
}

/// Tilt of Saturn's ring plane as seen from the Earth and from the Sun.
///
/// Ring-plane inclination and node on the ecliptic and equinox of date follow the
/// secular expressions of Harris (*Explanatory Supplement*, 1961), with `t` in
/// Julian millennia from J2000.
///
/// Arguments
/// ---------
/// * `saturn`: heliocentric ecliptic `(longitude, latitude, distance)` of Saturn.
/// * `earth`: heliocentric ecliptic `(longitude, distance)` of the Earth.
/// * `jd`: Julian date.
///
/// Return
/// ------
/// * `(earth_tilt, sun_tilt)`: saturnicentric latitudes of the Earth and of the Sun
///   referred to the ring plane (radians).
pub fn saturn_ring_tilt(saturn: (f64, f64, f64), earth: (f64, f64), jd: f64) -> (Radian, Radian) {
    let (sl, sb, sr) = saturn;
    let (el, er) = earth;

    let t = (jd - 2_451_545.0) / 365_250.0;
    let incl = (28.04922 - 0.13 * t + 0.0004 * t * t) * RADEG;
    let node = (169.53 + 13.826 * t + 0.04 * t * t) * RADEG;

    // Saturn seen from the Earth.
    let x = sr * sb.cos() * sl.cos() - er * el.cos();
    let y = sr * sb.cos() * sl.sin() - er * el.sin();
    let z = sr * sb.sin();
    let la = y.atan2(x);
    let be = z.atan2(x.hypot(y));

    let tilt = |lon: f64, lat: f64| {
        (incl.sin() * lat.cos() * (lon - node).sin() - incl.cos() * lat.sin())
            .clamp(-1.0, 1.0)
            .asin()
    };
    (tilt(la, be), tilt(sl, sb))
}

/// Magnitude contribution of Saturn's rings for a given Earth ring tilt.
///
/// `(−2.60 + 1.25·sin|B|)·sin|B|`, zero when the rings are seen edge-on.
pub fn saturn_rings_magnitude(earth_tilt: Radian) -> Magnitude {
    let s = earth_tilt.abs().sin();
    (-2.60 + 1.25 * s) * s
}

/// Apparent magnitude of a body known only by its albedo and size.
///
/// The absolute magnitude follows the asteroid relation
/// `D = 1329 km / √p · 10^(−H/5)`.
///
/// Arguments
/// ---------
/// * `albedo`: geometric albedo `p`.
/// * `radius_m`: physical radius (meters).
/// * `heliocentric_distance`, `observer_distance`: as in [`planet_magnitude`].
pub fn generic_magnitude(
    albedo: f64,
    radius_m: f64,
    heliocentric_distance: f64,
    observer_distance: f64,
) -> Magnitude {
    let diameter_km = (2.0 * radius_m / 1000.0).max(MIN_DIAMETER_KM);
    let absolute = -5.0 * (albedo.max(MIN_ALBEDO).sqrt() * diameter_km / 1329.0).log10();
    absolute + distance_modulus(heliocentric_distance, observer_distance)
}
