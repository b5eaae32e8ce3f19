//! # Body descriptors
//!
//! A [`Body`] is the immutable description of one node of the solar-system tree:
//! identity, physical constants, rotation model and the position model selected by
//! its [`BodyKind`]. The mutable ephemeris caches live next to it in a separate
//! [`BodyCache`], owned by [`SolarSystem`](crate::solar_system::SolarSystem), so a
//! descriptor can be shared freely while queries mutate only the caches.
//!
//! ## Units
//!
//! - Physical radii: **meters** (see [`Body::radius_au`] for the AU value).
//! - Angles: **radians**, rotation periods: **days**.
//! - Masses: **kg**, `0.0` when unknown.
pub mod catalog;

use crate::{
    constants::{meters_to_au, MJD, T2000},
    ephemeris::{galilean::GalileanMoon, planets::Planet},
    keplerian_element::KeplerianElements,
    state_vector::StateVector,
};

/// Index of a body in the solar-system arena.
pub type BodyIndex = usize;

/// Stable JPL HORIZONS identifier of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub i32);

impl BodyId {
    pub const SUN: BodyId = BodyId(10);
    pub const MERCURY: BodyId = BodyId(199);
    pub const VENUS: BodyId = BodyId(299);
    pub const MOON: BodyId = BodyId(301);
    pub const EARTH: BodyId = BodyId(399);
    pub const MARS: BodyId = BodyId(499);
    pub const IO: BodyId = BodyId(501);
    pub const EUROPA: BodyId = BodyId(502);
    pub const GANYMEDE: BodyId = BodyId(503);
    pub const CALLISTO: BodyId = BodyId(504);
    pub const JUPITER: BodyId = BodyId(599);
    pub const SATURN: BodyId = BodyId(699);
    pub const URANUS: BodyId = BodyId(799);
    pub const NEPTUNE: BodyId = BodyId(899);
}

/// Position model of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Origin of the heliocentric frame.
    Sun,
    /// State supplied by the observer snapshot.
    Earth,
    /// Lunar series, relative to the Earth.
    Moon,
    /// Mean-element series.
    MajorPlanet(Planet),
    /// Satellite theory, relative to Jupiter.
    GalileanMoon(GalileanMoon),
    /// Two-body orbit relative to the parent body (ICRF-oriented elements).
    Generic(KeplerianElements),
}

impl BodyKind {
    /// Model implied by a HORIZONS identifier, `None` for bodies needing elements.
    pub fn from_id(id: BodyId) -> Option<BodyKind> {
        match id {
            BodyId::SUN => Some(BodyKind::Sun),
            BodyId::EARTH => Some(BodyKind::Earth),
            BodyId::MOON => Some(BodyKind::Moon),
            BodyId(n) => Planet::from_horizons_id(n)
                .map(BodyKind::MajorPlanet)
                .or_else(|| GalileanMoon::from_horizons_id(n).map(BodyKind::GalileanMoon)),
        }
    }

    /// Parent required by the model, `None` when any parent (or none, for the Sun)
    /// is acceptable.
    pub fn expected_parent(&self) -> Option<BodyId> {
        match self {
            BodyKind::Earth | BodyKind::MajorPlanet(_) => Some(BodyId::SUN),
            BodyKind::Moon => Some(BodyId::EARTH),
            BodyKind::GalileanMoon(_) => Some(BodyId::JUPITER),
            BodyKind::Sun | BodyKind::Generic(_) => None,
        }
    }
}

/// Orientation of the spin axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationAxis {
    /// Tilt of the equator on the orbital plane.
    Obliquity(f64),
    /// ICRF direction of the north pole.
    Pole { ra: f64, dec: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub axis: RotationAxis,
    /// Sidereal rotation period (days), `None` when unknown.
    pub period: Option<f64>,
    /// Rotation angle at J2000 (radians).
    pub offset: f64,
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation {
            axis: RotationAxis::Obliquity(0.0),
            period: None,
            offset: 0.0,
        }
    }
}

impl Rotation {
    /// Rotation angle around the spin axis at `tt`, `0.0` if the period is unknown.
    ///
    /// `angle = (tt − J2000) / period · 2π + offset`, not wrapped.
    pub fn angle(&self, tt: MJD) -> f64 {
        match self.period {
            Some(period) if period != 0.0 => {
                (tt - T2000) / period * std::f64::consts::TAU + self.offset
            }
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rings {
    pub inner_radius_m: f64,
    pub outer_radius_m: f64,
}

/// Immutable description of a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    /// Four-letter object type code, empty when not given.
    pub object_type: String,
    /// `None` only for the Sun.
    pub parent: Option<BodyIndex>,
    pub kind: BodyKind,
    pub radius_m: f64,
    pub mass_kg: f64,
    pub albedo: f64,
    pub color: [f64; 3],
    pub rotation: Rotation,
    pub rings: Option<Rings>,
}

impl Body {
    /// Minimal descriptor, every optional attribute left to its default.
    pub fn new(id: BodyId, name: impl Into<String>, parent: Option<BodyIndex>, kind: BodyKind) -> Self {
        Body {
            id,
            name: name.into(),
            object_type: String::new(),
            parent,
            kind,
            radius_m: 0.0,
            mass_kg: 0.0,
            albedo: 0.0,
            color: [1.0, 1.0, 1.0],
            rotation: Rotation::default(),
            rings: None,
        }
    }

    pub fn with_radius_m(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_mass_kg(mut self, mass_kg: f64) -> Self {
        self.mass_kg = mass_kg;
        self
    }

    pub fn with_albedo(mut self, albedo: f64) -> Self {
        self.albedo = albedo;
        self
    }

    pub fn radius_au(&self) -> f64 {
        meters_to_au(self.radius_m)
    }
}

/// Mutable per-body ephemeris state.
///
/// * `heliocentric` holds the last full evaluation and its epoch; within
///   `refresh_window` days of that epoch it is extrapolated instead of recomputed.
/// * `observer_relative` holds the last light-time-corrected observer-relative state
///   and the fingerprint of the observer it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCache {
    pub refresh_window: f64,
    pub heliocentric: Option<(MJD, StateVector)>,
    pub observer_relative: Option<(u64, StateVector)>,
}

impl BodyCache {
    pub fn new(refresh_window: f64) -> Self {
        BodyCache {
            refresh_window,
            heliocentric: None,
            observer_relative: None,
        }
    }

    /// Cached heliocentric state extrapolated to `tt`, if still fresh.
    pub fn fresh_heliocentric(&self, tt: MJD) -> Option<StateVector> {
        let (epoch, state) = self.heliocentric?;
        let dt = tt - epoch;
        (dt.abs() < self.refresh_window).then(|| state.extrapolate(dt))
    }

    pub fn clear(&mut self) {
        self.heliocentric = None;
        self.observer_relative = None;
    }
}
