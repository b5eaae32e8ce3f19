//! # Osculating elements from a state vector
//!
//! Inverse of [`crate::kepler::propagate`]: turns a parent-relative position and
//! velocity into the classical elliptic elements. Only bound (elliptic) states are
//! accepted; moons and planets never produce anything else.
use nalgebra::Vector3;

use crate::{
    constants::MJD, kepler::principal_angle, keplerian_element::KeplerianElements,
    planetes_errors::PlanetesError, ref_system::rotmt,
};

/// Threshold below which the inclination or eccentricity is treated as zero.
const DEGENERACY_EPS: f64 = 1e-12;

/// Derive the classical orbital elements from a relative state vector.
///
/// The state is first expressed in the "orbital frame" whose X axis points toward
/// the ascending node and whose Z axis is the angular momentum. Elements are then
/// read off the planar motion.
///
/// Arguments
/// ---------
/// * `epoch`: epoch of the state (MJD TT), stored in the returned elements.
/// * `position`: position relative to the central body (AU).
/// * `velocity`: velocity relative to the central body (AU/day).
/// * `mu`: gravitational parameter of the central body (AU³/day²).
///
/// Return
/// ------
/// * The osculating [`KeplerianElements`], angles in `[0, 2π)`.
///
/// Degenerate cases
/// ----------------
/// * Equatorial orbit (`i ≈ 0` or `π`): the node is undefined and set to 0, the
///   argument of periapsis is then measured from the X axis.
/// * Circular orbit (`e ≈ 0`): the periapsis is undefined and set to the node,
///   the mean anomaly is then the argument of latitude.
///
/// Errors
/// ------
/// * [`PlanetesError::InvalidOrbit`] if `mu ≤ 0`, the angular momentum vanishes
///   (rectilinear motion) or the state is not bound.
///
/// See also
/// ------------
/// * [`crate::kepler::propagate`] – forward conversion.
pub fn derive_elements(
    epoch: MJD,
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    mu: f64,
) -> Result<KeplerianElements, PlanetesError> {
    if !(mu > 0.0) {
        return Err(PlanetesError::InvalidOrbit(format!(
            "gravitational parameter must be positive, got {mu}"
        )));
    }

    let ang_mom = position.cross(velocity);
    let ang_mom_norm = ang_mom.norm();
    let rs = position.norm();
    if ang_mom_norm == 0.0 || rs == 0.0 {
        return Err(PlanetesError::InvalidOrbit(
            "null angular momentum, cannot define an orbital plane".into(),
        ));
    }
    let elv = ang_mom / ang_mom_norm;

    // Orbital inclination and longitude of the node
    let sini = (elv.x * elv.x + elv.y * elv.y).sqrt();
    let inclination = sini.atan2(elv.z);
    let node = if sini < DEGENERACY_EPS {
        0.0
    } else {
        principal_angle(elv.x.atan2(-elv.y))
    };

    // Coordinates in the orbital frame (X axis along the line of nodes)
    let rot = rotmt(inclination, 0) * rotmt(node, 2);
    let xorb = rot * position;
    let vorb = rot * velocity;

    let rv = xorb.x * vorb.x + xorb.y * vorb.y;
    let v2 = vorb.x * vorb.x + vorb.y * vorb.y;

    // Reciprocal semimajor axis
    let reca = 2.0 / rs - v2 / mu;
    if reca <= 0.0 {
        return Err(PlanetesError::InvalidOrbit(format!(
            "state is not bound (1/a = {reca})"
        )));
    }

    let sma = 1.0 / reca;
    let mean_motion = (mu / sma.powi(3)).sqrt();

    // Eccentricity
    let esine = rv / (mean_motion * sma * sma);
    let ecose = v2 * rs / mu - 1.0;
    let ecc = (esine * esine + ecose * ecose).sqrt();
    if ecc >= 1.0 {
        return Err(PlanetesError::InvalidOrbit(format!(
            "state is not elliptic (e = {ecc})"
        )));
    }

    let arg_latitude = xorb.y.atan2(xorb.x);
    let (periapsis, mean_anomaly) = if ecc < DEGENERACY_EPS {
        (0.0, arg_latitude)
    } else {
        let ecc_anom = esine.atan2(ecose);
        let mean_anom = ecc_anom - ecc * ecc_anom.sin();

        // Argument of pericenter
        let x1 = ecc_anom.cos() - ecc;
        let x2 = (1.0 - ecc * ecc).sqrt() * ecc_anom.sin();
        let xm = (x1 * x1 + x2 * x2).sqrt();
        let (x1, x2) = (x1 / xm, x2 / xm);
        let sinper = x1 * xorb.y - x2 * xorb.x;
        let cosper = x1 * xorb.x + x2 * xorb.y;
        (sinper.atan2(cosper), mean_anom)
    };

    Ok(KeplerianElements {
        reference_epoch: epoch,
        semi_major_axis: sma,
        eccentricity: ecc,
        inclination,
        ascending_node_longitude: node,
        periapsis_argument: principal_angle(periapsis),
        mean_anomaly: principal_angle(mean_anomaly),
        mean_motion,
    })
}
