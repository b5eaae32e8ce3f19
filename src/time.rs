use hifitime::{Epoch, TimeScale};
use std::str::FromStr;

use crate::{
    constants::{DAYS_PER_CENTURY, JDTOMJD, MJD, T2000},
    planetes_errors::PlanetesError,
};

/// Transformation from an ISO-8601 date (`YYYY-MM-ddTHH:mm:ss`, UTC unless a time scale
/// suffix such as `TT` or `TAI` is given) to modified julian date in the TT scale.
///
/// Argument
/// --------
/// * `date`: the date string
///
/// Return
/// ------
/// * the MJD (TT) of the date, or [`PlanetesError::InvalidDate`]
pub fn date_to_mjd_tt(date: &str) -> Result<MJD, PlanetesError> {
    Epoch::from_str(date)
        .map(|epoch| epoch.to_mjd_tt_days())
        .map_err(|e| PlanetesError::InvalidDate(format!("{date}: {e}")))
}

/// MJD (TT) of an hifitime [`Epoch`], whatever its native time scale.
pub fn epoch_to_mjd_tt(epoch: &Epoch) -> MJD {
    epoch.to_mjd_tt_days()
}

/// hifitime [`Epoch`] for an MJD expressed in the TT scale.
pub fn mjd_tt_to_epoch(mjd: MJD) -> Epoch {
    Epoch::from_mjd_in_time_scale(mjd, TimeScale::TT)
}

/// Transformation from modified julian date (MJD) to julian date (JD), same time scale.
pub fn mjd_to_jd(mjd: MJD) -> f64 {
    mjd + JDTOMJD
}

/// Transformation from julian date (JD) to modified julian date (MJD), same time scale.
pub fn jd_to_mjd(jd: f64) -> MJD {
    jd - JDTOMJD
}

/// Days elapsed since J2000.0 (MJD 51544.5).
#[inline]
pub fn days_since_j2000(mjd: MJD) -> f64 {
    mjd - T2000
}

/// Julian centuries elapsed since J2000.0, the time argument of every series.
#[inline]
pub fn centuries_since_j2000(mjd: MJD) -> f64 {
    days_since_j2000(mjd) / DAYS_PER_CENTURY
}
