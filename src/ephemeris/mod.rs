//! # Analytical ephemerides
//!
//! The position models behind [`SolarSystem::get_heliocentric`](crate::solar_system::SolarSystem::get_heliocentric),
//! one per body class:
//!
//! - [`planets`] – mean orbital elements of the major planets (heliocentric),
//! - [`moon`] – truncated ELP-2000/82 lunar series (geocentric),
//! - [`galilean`] – Galilean satellites (jovicentric).
//!
//! Every model returns ICRF states in AU and AU/day for a TT date given as MJD.
//! Bodies outside these classes are propagated with [`crate::kepler`].
pub mod galilean;
pub mod moon;
pub mod planets;
