//! # Reference systems and frame rotations
//!
//! Mean equatorial (`Equm`, ICRF-aligned at J2000) and mean ecliptic (`Eclm`) systems,
//! either at J2000 or at an arbitrary date, plus the elementary rotations used to
//! move between them:
//!
//! - [`obleq`] – IAU 1976 mean obliquity of the ecliptic,
//! - [`rotmt`] – elementary axis rotation (coordinate transform convention),
//! - [`prec`] – IAU 1976 precession matrix J2000 → of-date,
//! - [`rotpn`] – composite rotation between two systems/epochs.
//!
//! Nutation is not modelled: the engine works in mean systems only.
use nalgebra::{Matrix3, Vector3};

use crate::constants::{Radian, DAYS_PER_CENTURY, EPS, RADEG, RADSEC, T2000};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefEpoch {
    J2000,
    Epoch(f64),
}

impl RefEpoch {
    pub fn date(&self) -> f64 {
        match *self {
            RefEpoch::J2000 => T2000,
            RefEpoch::Epoch(d) => d,
        }
    }

    fn is_j2000(&self) -> bool {
        (self.date() - T2000).abs() <= EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefSystem {
    // Equatorial mean: equator and mean equinox at the given epoch
    // (precession only, no nutation). Equm(J2000) is the ICRF orientation.
    Equm(RefEpoch),
    // Ecliptic mean: ecliptic and mean equinox at the given epoch.
    Eclm(RefEpoch),
}

impl RefSystem {
    pub fn epoch(&self) -> RefEpoch {
        match *self {
            RefSystem::Equm(e) => e,
            RefSystem::Eclm(e) => e,
        }
    }
}

/// Compute the rotation matrix between two reference systems and epochs.
///
/// The returned matrix `rot` satisfies `x₂ = rot · x₁`, where `x₁` is a vector expressed
/// in `ref_sys1` and `x₂` the same vector expressed in `ref_sys2`.
///
/// The path always goes through the mean equator of each epoch:
///
/// ```text
/// sys1(date1) → Equm(date1) → Equm(J2000) → Equm(date2) → sys2(date2)
/// ```
///
/// Precession steps are skipped when the epochs are both J2000 or equal.
///
/// # See also
/// * [`prec`] – IAU 1976 precession matrix
/// * [`obleq`] – mean obliquity of the ecliptic
pub fn rotpn(ref_sys1: &RefSystem, ref_sys2: &RefSystem) -> Matrix3<f64> {
    let date1 = ref_sys1.epoch().date();
    let date2 = ref_sys2.epoch().date();

    let mut rot = Matrix3::identity();

    if let RefSystem::Eclm(_) = ref_sys1 {
        rot = rotmt(-obleq(date1), 0) * rot;
    }

    if (date1 - date2).abs() > EPS {
        if !ref_sys1.epoch().is_j2000() {
            rot = prec(date1).transpose() * rot;
        }
        if !ref_sys2.epoch().is_j2000() {
            rot = prec(date2) * rot;
        }
    }

    if let RefSystem::Eclm(_) = ref_sys2 {
        rot = rotmt(obleq(date2), 0) * rot;
    }

    rot
}

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// The obliquity is a cubic polynomial in Julian centuries `T` since J2000,
/// evaluated with Horner's scheme.
pub fn obleq(tjm: f64) -> Radian {
    // Obliquity coefficients
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Rotation of the coordinate axes by `alpha` around one of the principal axes.
///
/// This is a **change of basis**: if the axes are rotated by `alpha` (direct sense),
/// the coordinates of a fixed vector transform as `x' = R · x`.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `k` - Index of the axis of rotation: `0` → X, `1` → Y, `2` → Z. Any other
///   value is clamped to Z.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let (s, c) = alpha.sin_cos();
    match k {
        0 => Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c),
        1 => Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c),
        _ => Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0),
    }
}

/// Compute the IAU 1976 precession matrix from J2000 to the mean equator of `tjm`.
///
/// ```text
/// ζ(T)     = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T)     = (0.5567530 − 0.0001185·T − 0.0000116·T²) · T  [deg]
/// z(T)     = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// P        = R_z(−z) · R_y(θ) · R_z(−ζ)
/// ```
pub fn prec(tjm: f64) -> Matrix3<f64> {
    // Precession polynomial coefficients (in radians)
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    rotmt(-z, 2) * rotmt(theta, 1) * rotmt(-zeta, 2)
}

/// Angular separation between two direction vectors (radians, in `[0, π]`).
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate for nearly parallel and
/// nearly opposite vectors. Returns `0.0` if either vector is null.
pub fn angular_separation(a: &Vector3<f64>, b: &Vector3<f64>) -> Radian {
    let cross = a.cross(b).norm();
    let dot = a.dot(b);
    if cross == 0.0 && dot == 0.0 {
        return 0.0;
    }
    cross.atan2(dot)
}

/// Convert a Cartesian vector to spherical coordinates `(longitude, latitude, distance)`.
///
/// The longitude is normalized to `[0, 2π)`, the latitude lies in `[-π/2, π/2]`.
/// A null vector maps to `(0, 0, 0)`.
pub fn cartesian_to_spherical(position: &Vector3<f64>) -> (Radian, Radian, f64) {
    let rho = position.norm();
    if rho == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let d = (position.x * position.x + position.y * position.y).sqrt();
    let lon = if d == 0.0 {
        0.0
    } else {
        crate::kepler::principal_angle(position.y.atan2(position.x))
    };
    let lat = position.z.atan2(d);
    (lon, lat, rho)
}

/// Convert spherical coordinates `(longitude, latitude, distance)` to a Cartesian vector.
pub fn spherical_to_cartesian(lon: Radian, lat: Radian, distance: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vector3::new(
        distance * cos_lat * cos_lon,
        distance * cos_lat * sin_lon,
        distance * sin_lat,
    )
}
