//! # Constants and type definitions for Planetes
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `planetes` library.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, speed of light, Gaussian gravitational constant)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, meters ↔ AU)
//! - Core type aliases used across the crate
//!
//! ## Units
//!
//! The engine works in a single set of units everywhere:
//!
//! - Lengths: **AU** (physical body radii are stored in meters and converted with [`DAU`])
//! - Angles: **radians**
//! - Time: **days**, epochs as **MJD in the TT scale**
//! - Velocities: **AU/day**

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Astronomical Unit in meters (IAU 2012)
pub const DAU: f64 = AU * 1000.0;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-6;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Gaussian gravitational constant k (used in classical orbit dynamics)
pub const GAUSS_GRAV: f64 = 0.01720209895;

/// k², the heliocentric gravitational parameter in AU³/day²
pub const GAUSS_GRAV_SQUARED: f64 = GAUSS_GRAV * GAUSS_GRAV;

/// Newtonian constant of gravitation (m³ kg⁻¹ s⁻²)
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Speed of light in astronomical units per day
pub const VLIGHT_AU: f64 = VLIGHT / AU * SECONDS_PER_DAY;

/// Photospheric radius of the Sun, in meters
pub const SUN_RADIUS_M: f64 = 695_508_000.0;

/// Absolute visual magnitude of the Sun
pub const SUN_ABSOLUTE_VMAG: f64 = 4.83;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Visual magnitude (logarithmic scale)
pub type Magnitude = f64;

/// Modified Julian Date (days)
pub type MJD = f64;

/// Convert a length in meters to astronomical units.
#[inline]
pub fn meters_to_au(length: Meter) -> AstronomicalUnit {
    length / DAU
}
