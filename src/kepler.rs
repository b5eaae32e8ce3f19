//! # Two-body Kepler propagation
//!
//! Elliptic Kepler solver and the mean-anomaly → Cartesian state conversion used by
//! every body that moves on fixed osculating elements (generic minor bodies, and the
//! mean-element planetary series).
//!
//! The orbital plane is oriented with the classical 3-1-3 sequence
//! `R_z(Ω) · R_x(i) · R_z(ω)` applied to perifocal coordinates, so the output frame
//! is whatever frame the elements are referred to (ICRF for catalog bodies, J2000
//! ecliptic for the planetary series).
use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::{constants::DPI, planetes_errors::PlanetesError, ref_system::rotmt};

/// Maximum number of Newton iterations for [`solve_kepler_equation`].
const KEPLER_MAX_ITER: usize = 50;

/// Principal value of an angle, in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    let r = a.rem_euclid(DPI);
    // rem_euclid may round up to exactly 2π for tiny negative inputs
    if r >= DPI {
        0.0
    } else {
        r
    }
}

/// Principal difference `a - b` between two angles, in `[-π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let a = principal_angle(a);
    let b = principal_angle(b);

    let mut diff = a - b;

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Solve Kepler's equation `E − e·sin(E) = M` for the eccentric anomaly.
///
/// Newton–Raphson iteration started from `M + e·sin(M)` (or `π` for very eccentric
/// orbits, where the first-order guess overshoots). Converges for `e ∈ [0, 1)`
/// within [`KEPLER_MAX_ITER`] iterations; the interval of practical interest is
/// `[0, 0.95)`.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly `M` (radians, any range).
/// * `eccentricity`: eccentricity `e` in `[0, 1)`.
///
/// Return
/// ------
/// * The eccentric anomaly `E` in radians, on the same revolution as
///   `principal_angle(M)` reduced to `[-π, π]`.
///
/// Errors
/// ------
/// * [`PlanetesError::InvalidOrbit`] if `e` is outside `[0, 1)` or not finite.
/// * [`PlanetesError::KeplerNoConvergence`] if the iteration budget is exhausted.
pub fn solve_kepler_equation(mean_anomaly: f64, eccentricity: f64) -> Result<f64, PlanetesError> {
    if !(0.0..1.0).contains(&eccentricity) || !mean_anomaly.is_finite() {
        return Err(PlanetesError::InvalidOrbit(format!(
            "elliptic Kepler solver needs 0 <= e < 1 and a finite mean anomaly (e = {eccentricity}, M = {mean_anomaly})"
        )));
    }

    let m = angle_diff(mean_anomaly, 0.0);
    if eccentricity == 0.0 {
        return Ok(m);
    }

    let contr = 100.0 * f64::EPSILON;
    let mut ecc_anom = if eccentricity < 0.8 {
        m + eccentricity * m.sin()
    } else if m >= 0.0 {
        PI
    } else {
        -PI
    };

    for _ in 0..KEPLER_MAX_ITER {
        let (sin_e, cos_e) = ecc_anom.sin_cos();
        let delta = (ecc_anom - eccentricity * sin_e - m) / (1.0 - eccentricity * cos_e);
        ecc_anom -= delta;
        if delta.abs() <= contr * (1.0 + ecc_anom.abs()) {
            return Ok(ecc_anom);
        }
    }

    Err(PlanetesError::KeplerNoConvergence {
        eccentricity,
        mean_anomaly,
    })
}

/// Propagate a two-body elliptic orbit to `time`.
///
/// The mean anomaly is advanced linearly, `M(t) = M₀ + n·(t − epoch)`, Kepler's
/// equation is solved, and the perifocal state is rotated into the reference frame
/// of the elements.
///
/// Arguments
/// ---------
/// * `epoch`: reference epoch of the elements (MJD).
/// * `time`: target time (MJD, same scale as `epoch`).
/// * `inclination`, `ascending_node`, `arg_periapsis`: orientation angles (radians).
/// * `semi_major_axis`: `a` (AU).
/// * `mean_motion`: `n` (radians/day).
/// * `eccentricity`: `e` in `[0, 1)`.
/// * `mean_anomaly0`: `M₀` at `epoch` (radians).
///
/// Return
/// ------
/// * `(position, velocity)` in AU and AU/day.
#[allow(clippy::too_many_arguments)]
pub fn propagate(
    epoch: f64,
    time: f64,
    inclination: f64,
    ascending_node: f64,
    arg_periapsis: f64,
    semi_major_axis: f64,
    mean_motion: f64,
    eccentricity: f64,
    mean_anomaly0: f64,
) -> Result<(Vector3<f64>, Vector3<f64>), PlanetesError> {
    let mean_anomaly = mean_anomaly0 + mean_motion * (time - epoch);
    let ecc_anom = solve_kepler_equation(mean_anomaly, eccentricity)?;

    let (sin_e, cos_e) = ecc_anom.sin_cos();
    let sqrt_one_minus_e2 = (1.0 - eccentricity * eccentricity).sqrt();

    // Perifocal frame: x toward periapsis, z along the angular momentum.
    let position_pf = Vector3::new(
        semi_major_axis * (cos_e - eccentricity),
        semi_major_axis * sqrt_one_minus_e2 * sin_e,
        0.0,
    );

    let ecc_anom_rate = mean_motion / (1.0 - eccentricity * cos_e);
    let velocity_pf = Vector3::new(
        -semi_major_axis * sin_e * ecc_anom_rate,
        semi_major_axis * sqrt_one_minus_e2 * cos_e * ecc_anom_rate,
        0.0,
    );

    // Active rotation by +angle is the change of basis by −angle.
    let rot = rotmt(-ascending_node, 2) * rotmt(-inclination, 0) * rotmt(-arg_periapsis, 2);

    Ok((rot * position_pf, rot * velocity_pf))
}
