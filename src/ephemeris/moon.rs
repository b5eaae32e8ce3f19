//! # Lunar position
//!
//! Truncated ELP-2000/82 theory as tabulated by Meeus (*Astronomical Algorithms*,
//! chapter 47): the 60 principal periodic terms in longitude and distance, the 60
//! in latitude, the Earth-eccentricity factor `E` on terms involving the solar
//! anomaly, and the additive planetary terms `A1`, `A2`, `A3`. Accuracy is about 10"
//! in longitude and 4" in latitude.
//!
//! The series yields geometric geocentric coordinates referred to the mean ecliptic
//! and equinox of date; [`geocentric_position`] rotates them to ICRF.
use nalgebra::Vector3;

use crate::{
    constants::{AU, MJD, RADEG},
    planetes_errors::PlanetesError,
    ref_system::{rotpn, spherical_to_cartesian, RefEpoch, RefSystem},
    state_vector::StateVector,
    time::centuries_since_j2000,
};

/// Mean Earth–Moon distance of the series (km).
const MEAN_DISTANCE_KM: f64 = 385_000.56;

/// `(D, M, M', F, Σl coefficient, Σr coefficient)`, units 1e-6 deg and 1e-3 km.
#[rustfmt::skip]
const LONGITUDE_DISTANCE_TERMS: [(i8, i8, i8, i8, f64, f64); 60] = [
    (0, 0, 1, 0, 6288774.0, -20905355.0),
    (2, 0, -1, 0, 1274027.0, -3699111.0),
    (2, 0, 0, 0, 658314.0, -2955968.0),
    (0, 0, 2, 0, 213618.0, -569925.0),
    (0, 1, 0, 0, -185116.0, 48888.0),
    (0, 0, 0, 2, -114332.0, -3149.0),
    (2, 0, -2, 0, 58793.0, 246158.0),
    (2, -1, -1, 0, 57066.0, -152138.0),
    (2, 0, 1, 0, 53322.0, -170733.0),
    (2, -1, 0, 0, 45758.0, -204586.0),
    (0, 1, -1, 0, -40923.0, -129620.0),
    (1, 0, 0, 0, -34720.0, 108743.0),
    (0, 1, 1, 0, -30383.0, 104755.0),
    (2, 0, 0, -2, 15327.0, 10321.0),
    (0, 0, 1, 2, -12528.0, 0.0),
    (0, 0, 1, -2, 10980.0, 79661.0),
    (4, 0, -1, 0, 10675.0, -34782.0),
    (0, 0, 3, 0, 10034.0, -23210.0),
    (4, 0, -2, 0, 8548.0, -21636.0),
    (2, 1, -1, 0, -7888.0, 24208.0),
    (2, 1, 0, 0, -6766.0, 30824.0),
    (1, 0, -1, 0, -5163.0, -8379.0),
    (1, 1, 0, 0, 4987.0, -16675.0),
    (2, -1, 1, 0, 4036.0, -12831.0),
    (2, 0, 2, 0, 3994.0, -10445.0),
    (4, 0, 0, 0, 3861.0, -11650.0),
    (2, 0, -3, 0, 3665.0, 14403.0),
    (0, 1, -2, 0, -2689.0, -7003.0),
    (2, 0, -1, 2, -2602.0, 0.0),
    (2, -1, -2, 0, 2390.0, 10056.0),
    (1, 0, 1, 0, -2348.0, 6322.0),
    (2, -2, 0, 0, 2236.0, -9884.0),
    (0, 1, 2, 0, -2120.0, 5751.0),
    (0, 2, 0, 0, -2069.0, 0.0),
    (2, -2, -1, 0, 2048.0, -4950.0),
    (2, 0, 1, -2, -1773.0, 4130.0),
    (2, 0, 0, 2, -1595.0, 0.0),
    (4, -1, -1, 0, 1215.0, -3958.0),
    (0, 0, 2, 2, -1110.0, 0.0),
    (3, 0, -1, 0, -892.0, 3258.0),
    (2, 1, 1, 0, -810.0, 2616.0),
    (4, -1, -2, 0, 759.0, -1897.0),
    (0, 2, -1, 0, -713.0, -2117.0),
    (2, 2, -1, 0, -700.0, 2354.0),
    (2, 1, -2, 0, 691.0, 0.0),
    (2, -1, 0, -2, 596.0, 0.0),
    (4, 0, 1, 0, 549.0, -1423.0),
    (0, 0, 4, 0, 537.0, -1117.0),
    (4, -1, 0, 0, 520.0, -1571.0),
    (1, 0, -2, 0, -487.0, -1739.0),
    (2, 1, 0, -2, -399.0, 0.0),
    (0, 0, 2, -2, -381.0, -4421.0),
    (1, 1, 1, 0, 351.0, 0.0),
    (3, 0, -2, 0, -340.0, 0.0),
    (4, 0, -3, 0, 330.0, 0.0),
    (2, -1, 2, 0, 327.0, 0.0),
    (0, 2, 1, 0, -323.0, 1165.0),
    (1, 1, -1, 0, 299.0, 0.0),
    (2, 0, 3, 0, 294.0, 0.0),
    (2, 0, -1, -2, 0.0, 8752.0),
];

/// `(D, M, M', F, Σb coefficient)`, unit 1e-6 deg.
#[rustfmt::skip]
const LATITUDE_TERMS: [(i8, i8, i8, i8, f64); 60] = [
    (0, 0, 0, 1, 5128122.0),
    (0, 0, 1, 1, 280602.0),
    (0, 0, 1, -1, 277693.0),
    (2, 0, 0, -1, 173237.0),
    (2, 0, -1, 1, 55413.0),
    (2, 0, -1, -1, 46271.0),
    (2, 0, 0, 1, 32573.0),
    (0, 0, 2, 1, 17198.0),
    (2, 0, 1, -1, 9266.0),
    (0, 0, 2, -1, 8822.0),
    (2, -1, 0, -1, 8216.0),
    (2, 0, -2, -1, 4324.0),
    (2, 0, 1, 1, 4200.0),
    (2, 1, 0, -1, -3359.0),
    (2, -1, -1, 1, 2463.0),
    (2, -1, 0, 1, 2211.0),
    (2, -1, -1, -1, 2065.0),
    (0, 1, -1, -1, -1870.0),
    (4, 0, -1, -1, 1828.0),
    (0, 1, 0, 1, -1794.0),
    (0, 0, 0, 3, -1749.0),
    (0, 1, -1, 1, -1565.0),
    (1, 0, 0, 1, -1491.0),
    (0, 1, 1, 1, -1475.0),
    (0, 1, 1, -1, -1410.0),
    (0, 1, 0, -1, -1344.0),
    (1, 0, 0, -1, -1335.0),
    (0, 0, 3, 1, 1107.0),
    (4, 0, 0, -1, 1021.0),
    (4, 0, -1, 1, 833.0),
    (0, 0, 1, -3, 777.0),
    (4, 0, -2, 1, 671.0),
    (2, 0, 0, -3, 607.0),
    (2, 0, 2, -1, 596.0),
    (2, -1, 1, -1, 491.0),
    (2, 0, -2, 1, -451.0),
    (0, 0, 3, -1, 439.0),
    (2, 0, 2, 1, 422.0),
    (2, 0, -3, -1, 421.0),
    (2, 1, -1, 1, -366.0),
    (2, 1, 0, 1, -351.0),
    (4, 0, 0, 1, 331.0),
    (2, -1, 1, 1, 315.0),
    (2, -2, 0, -1, 302.0),
    (0, 0, 1, 3, -283.0),
    (2, 1, 1, -1, -229.0),
    (1, 1, 0, -1, 223.0),
    (1, 1, 0, 1, 223.0),
    (0, 1, -2, -1, -220.0),
    (2, 1, -1, -1, -220.0),
    (1, 0, 1, 1, -185.0),
    (2, -1, -2, -1, 181.0),
    (0, 1, 2, 1, -177.0),
    (4, 0, -2, -1, 176.0),
    (4, -1, -1, -1, 166.0),
    (1, 0, 1, -1, -164.0),
    (4, 0, 1, -1, 132.0),
    (1, 0, -1, -1, -119.0),
    (4, -1, 0, -1, 115.0),
    (2, -2, 0, 1, 107.0),
];

/// Geocentric ecliptic coordinates of the Moon, mean ecliptic and equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarCoordinates {
    /// Longitude λ (radians, `[0, 2π)`).
    pub longitude: f64,
    /// Latitude β (radians).
    pub latitude: f64,
    /// Distance Δ between the centres of the Earth and the Moon (km).
    pub distance_km: f64,
}

/// Evaluate the lunar series at `tt` (MJD TT).
pub fn ecliptic_coordinates(tt: MJD) -> LunarCoordinates {
    let t = centuries_since_j2000(tt);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    // Fundamental arguments (degrees)
    let lp = 218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538841.0
        - t4 / 65194000.0;
    let d = 297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545868.0
        - t4 / 113065000.0;
    let m = 357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24490000.0;
    let mp = 134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69699.0
        - t4 / 14712000.0;
    let f = 93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3526000.0
        + t4 / 863310000.0;

    let a1 = (119.75 + 131.849 * t) * RADEG;
    let a2 = (53.09 + 479264.290 * t) * RADEG;
    let a3 = (313.45 + 481266.484 * t) * RADEG;

    // Decreasing eccentricity of the Earth's orbit
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let e_factor = |m_mult: i8| match m_mult.abs() {
        0 => 1.0,
        1 => e,
        _ => e * e,
    };

    let (lp, d, m, mp, f) = (lp * RADEG, d * RADEG, m * RADEG, mp * RADEG, f * RADEG);
    let argument = |cd: i8, cm: i8, cmp: i8, cf: i8| {
        f64::from(cd) * d + f64::from(cm) * m + f64::from(cmp) * mp + f64::from(cf) * f
    };

    let (mut sum_l, mut sum_r) = (0.0, 0.0);
    for &(cd, cm, cmp, cf, coef_l, coef_r) in LONGITUDE_DISTANCE_TERMS.iter() {
        let (sin_arg, cos_arg) = argument(cd, cm, cmp, cf).sin_cos();
        let factor = e_factor(cm);
        sum_l += factor * coef_l * sin_arg;
        sum_r += factor * coef_r * cos_arg;
    }

    let mut sum_b = LATITUDE_TERMS
        .iter()
        .map(|&(cd, cm, cmp, cf, coef_b)| e_factor(cm) * coef_b * argument(cd, cm, cmp, cf).sin())
        .sum::<f64>();

    // Venus, Jupiter and flattening of the Earth
    sum_l += 3958.0 * a1.sin() + 1962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * lp.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - mp).sin()
        - 115.0 * (lp + mp).sin();

    LunarCoordinates {
        longitude: crate::kepler::principal_angle(lp + sum_l * 1e-6 * RADEG),
        latitude: sum_b * 1e-6 * RADEG,
        distance_km: MEAN_DISTANCE_KM + sum_r / 1000.0,
    }
}

/// Geocentric ICRF position of the Moon at `tt` (AU).
pub fn geocentric_position(tt: MJD) -> Vector3<f64> {
    let coords = ecliptic_coordinates(tt);
    let ecliptic = spherical_to_cartesian(coords.longitude, coords.latitude, coords.distance_km / AU);
    rotpn(
        &RefSystem::Eclm(RefEpoch::Epoch(tt)),
        &RefSystem::Equm(RefEpoch::J2000),
    ) * ecliptic
}

/// Geocentric ICRF state of the Moon at `tt`.
///
/// The velocity is the forward difference of the position over `step_days`.
pub fn geocentric_state(tt: MJD, step_days: f64) -> Result<StateVector, PlanetesError> {
    if !(step_days > 0.0) {
        return Err(PlanetesError::InvalidEngineParameter(format!(
            "lunar velocity step must be > 0, got {step_days}"
        )));
    }
    let position = geocentric_position(tt);
    let ahead = geocentric_position(tt + step_days);
    Ok(StateVector::new(position, (ahead - position) / step_days))
}
