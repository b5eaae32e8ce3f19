//! # Solar system engine
//!
//! [`SolarSystem`] owns the body tree (an arena of immutable [`Body`] descriptors,
//! each referring to its parent by index), the per-body ephemeris caches and the
//! [`EngineConfig`]. Every query takes the [`Observer`] snapshot explicitly and
//! `&mut self`, since a query may refresh the caches of the body and of its
//! ancestors.
//!
//! ## Position pipeline
//!
//! 1. [`SolarSystem::get_heliocentric`]: heliocentric ICRF state, linearly
//!    extrapolated from the cache while it is fresh, otherwise recomputed from the
//!    body model (planet series, lunar series, Galilean theory or Kepler orbit) and
//!    composed with the parent's state.
//! 2. [`SolarSystem::get_observer_relative`]: `pvh + sun_pvo`, optionally corrected
//!    for light time with a single re-evaluation at `tt − Δ/c`. The corrected state is
//!    memoized against the observer fingerprint.
//!
//! Photometry ([`SolarSystem::apparent_magnitude`], [`SolarSystem::phase_angle`]) and
//! shadow geometry ([`SolarSystem::eclipse_factor`],
//! [`SolarSystem::shadow_candidates`]) are built on these two operations.
//!
//! ## Example
//!
//! ```rust,no_run
//! use planetes::{
//!     bodies::catalog::BodyRecord, config::EngineConfig, observer::Observer,
//!     solar_system::SolarSystem,
//! };
//!
//! let records = vec![
//!     BodyRecord::new("sun").with("horizons_id", "10").with("radius", "695508 km"),
//!     BodyRecord::new("earth").with("horizons_id", "399").with("parent", "sun"),
//!     BodyRecord::new("mars").with("horizons_id", "499").with("parent", "sun"),
//! ];
//! let mut system = SolarSystem::from_records(&records, EngineConfig::default()).unwrap();
//!
//! let obs = Observer::approximate_geocentric(60000.0).unwrap();
//! let mars = system.find_by_name("Mars").unwrap();
//! let vmag = system.apparent_magnitude(mars, &obs).unwrap();
//! ```
use itertools::Itertools;

use crate::{
    bodies::{Body, BodyCache, BodyId, BodyIndex, BodyKind},
    config::EngineConfig,
    constants::{Magnitude, Radian, DAU, GRAVITATIONAL_CONSTANT, MJD, SECONDS_PER_DAY, VLIGHT_AU},
    ephemeris::{galilean, moon, planets, planets::Planet},
    keplerian_element::KeplerianElements,
    observer::Observer,
    photometry,
    planetes_errors::PlanetesError,
    ref_system::{angular_separation, cartesian_to_spherical},
    shadow::{self, ShadowCandidates, ShadowList, ShadowSphere},
    state_vector::StateVector,
    time::mjd_to_jd,
};

/// Quantities exposed to the renderer through [`SolarSystem::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Info {
    /// Light-time corrected observer-relative state.
    Pvo,
    /// Apparent visual magnitude.
    Vmag,
    /// Illuminated fraction of the disk (NaN for the Sun and the Earth).
    Phase,
    /// Angular radius (radians).
    Radius,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InfoValue {
    State(StateVector),
    Number(f64),
}

/// Angular radius of a sphere, `radius / distance` (small-angle form).
fn angular_radius_at(radius: f64, distance: f64) -> Radian {
    radius / distance.max(f64::MIN_POSITIVE)
}

#[derive(Debug, Clone)]
pub struct SolarSystem {
    bodies: Vec<Body>,
    caches: Vec<BodyCache>,
    config: EngineConfig,
    sun: BodyIndex,
    earth: BodyIndex,
}

impl SolarSystem {
    /// Build the engine from an arena of descriptors.
    ///
    /// Each body must come after its parent, which makes the tree acyclic by
    /// construction. Every body gets its own cache refresh window drawn from
    /// `config` (see [`EngineConfig::draw_refresh_windows`]).
    ///
    /// Errors
    /// ------
    /// * [`PlanetesError::MissingRequiredBody`] if there is no Sun or no Earth.
    /// * [`PlanetesError::MissingParent`] if a body other than the Sun has no parent.
    /// * [`PlanetesError::InvalidTree`] if a parent index does not precede its child,
    ///   if the Sun has a parent or appears twice, or if a body model is attached to
    ///   the wrong parent (e.g. a Galilean moon not orbiting Jupiter).
    pub fn new(bodies: Vec<Body>, config: EngineConfig) -> Result<SolarSystem, PlanetesError> {
        let mut sun = None;
        let mut earth = None;

        for (index, body) in bodies.iter().enumerate() {
            match (body.kind, body.parent) {
                (BodyKind::Sun, None) if sun.is_none() => sun = Some(index),
                (BodyKind::Sun, None) => {
                    return Err(PlanetesError::InvalidTree(format!(
                        "second Sun '{}'",
                        body.name
                    )))
                }
                (BodyKind::Sun, Some(_)) => {
                    return Err(PlanetesError::InvalidTree(format!(
                        "the Sun '{}' cannot have a parent",
                        body.name
                    )))
                }
                (_, None) => return Err(PlanetesError::MissingParent(body.name.clone())),
                (kind, Some(parent)) => {
                    if parent >= index {
                        return Err(PlanetesError::InvalidTree(format!(
                            "'{}' is listed before its parent",
                            body.name
                        )));
                    }
                    if kind
                        .expected_parent()
                        .is_some_and(|id| id != bodies[parent].id)
                    {
                        return Err(PlanetesError::InvalidTree(format!(
                            "'{}' cannot orbit '{}'",
                            body.name, bodies[parent].name
                        )));
                    }
                    if kind == BodyKind::Earth && earth.is_none() {
                        earth = Some(index);
                    }
                }
            }
        }

        let sun = sun.ok_or(PlanetesError::MissingRequiredBody("Sun"))?;
        let earth = earth.ok_or(PlanetesError::MissingRequiredBody("Earth"))?;
        let caches = config
            .draw_refresh_windows(bodies.len())
            .into_iter()
            .map(BodyCache::new)
            .collect();

        Ok(SolarSystem {
            bodies,
            caches,
            config,
            sun,
            earth,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: BodyIndex) -> &Body {
        &self.bodies[index]
    }

    pub fn cache(&self, index: BodyIndex) -> &BodyCache {
        &self.caches[index]
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn sun(&self) -> BodyIndex {
        self.sun
    }

    pub fn earth(&self) -> BodyIndex {
        self.earth
    }

    /// Drop every cached state, e.g. after a discontinuous time jump.
    pub fn clear_caches(&mut self) {
        self.caches.iter_mut().for_each(BodyCache::clear);
    }

    /// Index of the body with this name, compared case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<BodyIndex> {
        self.bodies
            .iter()
            .position(|b| b.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn find_by_id(&self, id: BodyId) -> Option<BodyIndex> {
        self.bodies.iter().position(|b| b.id == id)
    }

    // ---------------------------------------------------------------------------------------------
    // Positions
    // ---------------------------------------------------------------------------------------------

    /// Heliocentric ICRF state of a body at the observer time.
    ///
    /// See [`SolarSystem::get_heliocentric_at`].
    pub fn get_heliocentric(
        &mut self,
        body: BodyIndex,
        obs: &Observer,
    ) -> Result<StateVector, PlanetesError> {
        self.get_heliocentric_at(body, obs, obs.tt())
    }

    /// Heliocentric ICRF state of a body at an arbitrary time (AU, AU/day).
    ///
    /// The Sun is the origin and the Earth state comes from the observer snapshot
    /// (extrapolated linearly when `tt` differs from the snapshot time); neither is
    /// cached. Any other body is served from its cache when the cached epoch is
    /// within the body's refresh window of `tt`, the cached state being extrapolated
    /// at constant velocity. Otherwise the body model is evaluated, composed with
    /// the parent's state when the model is parent-relative, and cached.
    ///
    /// Arguments
    /// ---------
    /// * `body`: arena index.
    /// * `obs`: observer snapshot, provides the Earth state.
    /// * `tt`: time (MJD TT).
    ///
    /// Errors
    /// ------
    /// * [`PlanetesError::KeplerNoConvergence`] / [`PlanetesError::InvalidOrbit`]
    ///   from the Kepler solver.
    pub fn get_heliocentric_at(
        &mut self,
        body: BodyIndex,
        obs: &Observer,
        tt: MJD,
    ) -> Result<StateVector, PlanetesError> {
        match self.bodies[body].kind {
            BodyKind::Sun => return Ok(StateVector::zeros()),
            BodyKind::Earth => return Ok(obs.earth_pvh().extrapolate(tt - obs.tt())),
            _ => {}
        }

        if let Some(state) = self.caches[body].fresh_heliocentric(tt) {
            return Ok(state);
        }

        let state = self.compute_heliocentric(body, obs, tt)?;
        self.caches[body].heliocentric = Some((tt, state));
        Ok(state)
    }

    fn compute_heliocentric(
        &mut self,
        body: BodyIndex,
        obs: &Observer,
        tt: MJD,
    ) -> Result<StateVector, PlanetesError> {
        match self.bodies[body].kind {
            BodyKind::Sun => Ok(StateVector::zeros()),
            BodyKind::Earth => Ok(obs.earth_pvh().extrapolate(tt - obs.tt())),
            BodyKind::MajorPlanet(planet) => planets::heliocentric_state(planet, tt),
            BodyKind::Moon => {
                let geocentric = moon::geocentric_state(tt, self.config.moon_velocity_step_days)?;
                Ok(geocentric + self.parent_heliocentric(body, obs, tt)?)
            }
            BodyKind::GalileanMoon(satellite) => {
                let jovicentric = galilean::jovicentric_state(satellite, tt);
                Ok(jovicentric + self.parent_heliocentric(body, obs, tt)?)
            }
            BodyKind::Generic(elements) => {
                let relative = elements.propagate(tt)?;
                Ok(relative + self.parent_heliocentric(body, obs, tt)?)
            }
        }
    }

    fn parent_heliocentric(
        &mut self,
        body: BodyIndex,
        obs: &Observer,
        tt: MJD,
    ) -> Result<StateVector, PlanetesError> {
        let Some(parent) = self.bodies[body].parent else {
            debug_assert!(false, "'{}' has no parent", self.bodies[body].name);
            return Ok(StateVector::zeros());
        };
        self.get_heliocentric_at(parent, obs, tt)
    }

    /// State of a body relative to the observer (ICRF, AU, AU/day).
    ///
    /// The first pass is `pvh(tt) + sun_pvo`. With `apply_light_time`, the light time
    /// `Δ/c` of that first pass is computed once and the heliocentric state is
    /// re-evaluated at `tt − Δ/c` (no further iteration). Only the corrected result is
    /// memoized, keyed by [`Observer::fingerprint`], and a call with the same
    /// observer returns it without any computation.
    ///
    /// Arguments
    /// ---------
    /// * `body`: arena index.
    /// * `obs`: observer snapshot.
    /// * `apply_light_time`: apply the light-time correction.
    ///
    /// Return
    /// ------
    /// * The observer-relative state. With light-time correction the velocity is the
    ///   heliocentric velocity at the retarded time plus the observer-relative Sun
    ///   velocity, not the derivative of the apparent position.
    pub fn get_observer_relative(
        &mut self,
        body: BodyIndex,
        obs: &Observer,
        apply_light_time: bool,
    ) -> Result<StateVector, PlanetesError> {
        let fingerprint = obs.fingerprint();
        if apply_light_time {
            if let Some((key, state)) = self.caches[body].observer_relative {
                if key == fingerprint {
                    return Ok(state);
                }
            }
        }

        let pvo = self.get_heliocentric_at(body, obs, obs.tt())? + obs.sun_pvo();
        if !apply_light_time {
            return Ok(pvo);
        }

        let light_time = pvo.distance() / VLIGHT_AU;
        let pvo = self.get_heliocentric_at(body, obs, obs.tt() - light_time)? + obs.sun_pvo();
        self.caches[body].observer_relative = Some((fingerprint, pvo));
        Ok(pvo)
    }

    /// Body indices from the farthest to the nearest body (painter's order).
    pub fn sorted_by_distance(&mut self, obs: &Observer) -> Result<Vec<BodyIndex>, PlanetesError> {
        let distances: Vec<f64> = (0..self.bodies.len())
            .map(|i| self.get_observer_relative(i, obs, true).map(|pvo| pvo.distance()))
            .collect::<Result<_, _>>()?;
        Ok((0..self.bodies.len())
            .sorted_by(|&a, &b| distances[b].total_cmp(&distances[a]))
            .collect())
    }

    // ---------------------------------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------------------------------

    /// Rotation angle of a body around its spin axis at `tt` (radians, not wrapped).
    pub fn rotation_angle(&self, body: BodyIndex, tt: MJD) -> Radian {
        self.bodies[body].rotation.angle(tt)
    }

    /// Apparent angular radius of a body (radians, small-angle form).
    pub fn angular_radius(&mut self, body: BodyIndex, obs: &Observer) -> Result<Radian, PlanetesError> {
        let distance = self.get_observer_relative(body, obs, true)?.distance();
        Ok(angular_radius_at(self.bodies[body].radius_au(), distance))
    }

    /// Osculating elements of a body relative to its parent at the observer time.
    ///
    /// The gravitational parameter is `G·M_parent`, converted to AU³/day².
    ///
    /// Errors
    /// ------
    /// * [`PlanetesError::MissingParent`] for the Sun.
    /// * [`PlanetesError::InvalidOrbit`] if the parent mass is unknown or the relative
    ///   state is not a bound orbit.
    pub fn osculating_elements(
        &mut self,
        body: BodyIndex,
        obs: &Observer,
    ) -> Result<KeplerianElements, PlanetesError> {
        let parent = self.bodies[body]
            .parent
            .ok_or_else(|| PlanetesError::MissingParent(self.bodies[body].name.clone()))?;

        let relative = self.get_heliocentric(body, obs)? - self.get_heliocentric(parent, obs)?;
        let mu = GRAVITATIONAL_CONSTANT * self.bodies[parent].mass_kg / DAU.powi(3)
            * SECONDS_PER_DAY.powi(2);
        KeplerianElements::from_state(obs.tt(), &relative, mu)
    }

    // ---------------------------------------------------------------------------------------------
    // Photometry
    // ---------------------------------------------------------------------------------------------

    /// Phase angle of a body, NaN for the Sun and the Earth.
    pub fn phase_angle(&mut self, body: BodyIndex, obs: &Observer) -> Result<Radian, PlanetesError> {
        if matches!(self.bodies[body].kind, BodyKind::Sun | BodyKind::Earth) {
            return Ok(f64::NAN);
        }
        let pvh = self.get_heliocentric(body, obs)?;
        let pvo = self.get_observer_relative(body, obs, true)?;
        Ok(photometry::phase_angle(&pvh.position, &pvo.position))
    }

    /// Illuminated fraction of the disk, NaN for the Sun and the Earth.
    pub fn illuminated_fraction(&mut self, body: BodyIndex, obs: &Observer) -> Result<f64, PlanetesError> {
        Ok(photometry::illuminated_fraction(self.phase_angle(body, obs)?))
    }

    /// Apparent visual magnitude of a body.
    ///
    /// Dispatches on the body class: eclipse-attenuated solar magnitude for the Sun,
    /// elongation law for the Moon, tabulated phase laws for the major planets (plus
    /// the ring term for Saturn) and the albedo/diameter relation for every other
    /// body, the Earth included.
    ///
    /// See also
    /// --------
    /// * [`crate::photometry`] – the individual models.
    pub fn apparent_magnitude(&mut self, body: BodyIndex, obs: &Observer) -> Result<Magnitude, PlanetesError> {
        match self.bodies[body].kind {
            BodyKind::Sun => {
                let factor = self.eclipse_factor(body, obs)?;
                let distance = self.get_observer_relative(body, obs, true)?.distance();
                Ok(photometry::sun_magnitude(
                    distance,
                    factor,
                    self.config.eclipse_factor_floor,
                ))
            }
            BodyKind::Moon => {
                let pvo = self.get_observer_relative(body, obs, true)?;
                let elongation = angular_separation(&pvo.position, &obs.sun_pvo().position);
                Ok(photometry::moon_magnitude(elongation, pvo.distance()))
            }
            BodyKind::MajorPlanet(planet) => {
                let pvh = self.get_heliocentric(body, obs)?;
                let pvo = self.get_observer_relative(body, obs, true)?;
                let phase = photometry::phase_angle(&pvh.position, &pvo.position);
                let mut vmag =
                    photometry::planet_magnitude(planet, pvh.distance(), pvo.distance(), phase);
                if planet == Planet::Saturn {
                    vmag += self.saturn_rings_magnitude(&pvh, obs);
                }
                Ok(vmag)
            }
            BodyKind::Earth | BodyKind::GalileanMoon(_) | BodyKind::Generic(_) => {
                let pvh = self.get_heliocentric(body, obs)?;
                let pvo = self.get_observer_relative(body, obs, true)?;
                let b = &self.bodies[body];
                Ok(photometry::generic_magnitude(
                    b.albedo,
                    b.radius_m,
                    pvh.distance(),
                    pvo.distance(),
                ))
            }
        }
    }

    fn saturn_rings_magnitude(&self, saturn_pvh: &StateVector, obs: &Observer) -> Magnitude {
        let saturn = cartesian_to_spherical(&(obs.ri2e() * saturn_pvh.position));
        let (earth_lon, _, earth_r) = cartesian_to_spherical(&(obs.ri2e() * obs.earth_pvh().position));
        let (earth_tilt, _) = photometry::saturn_ring_tilt(saturn, (earth_lon, earth_r), mjd_to_jd(obs.tt()));
        photometry::saturn_rings_magnitude(earth_tilt)
    }

    // ---------------------------------------------------------------------------------------------
    // Shadows
    // ---------------------------------------------------------------------------------------------

    /// Unobstructed fraction of a light source's disk seen by the observer.
    ///
    /// The only occluder taken into account is the Moon; the first Moon found
    /// decides the factor.
    ///
    /// Arguments
    /// ---------
    /// * `source`: the light source (normally the Sun).
    /// * `obs`: observer snapshot.
    ///
    /// Return
    /// ------
    /// * A value in `[0, 1]`, see [`shadow::eclipse_factor`].
    pub fn eclipse_factor(&mut self, source: BodyIndex, obs: &Observer) -> Result<f64, PlanetesError> {
        let source_pvo = self.get_observer_relative(source, obs, true)?;
        let source_radius = angular_radius_at(self.bodies[source].radius_au(), source_pvo.distance());

        let occluder = (0..self.bodies.len())
            .find(|&i| i != source && self.bodies[i].kind == BodyKind::Moon);
        let Some(occluder) = occluder else {
            return Ok(1.0);
        };

        let pvo = self.get_observer_relative(occluder, obs, true)?;
        let occluder_radius = angular_radius_at(self.bodies[occluder].radius_au(), pvo.distance());
        let separation = angular_separation(&source_pvo.position, &pvo.position);
        Ok(shadow::eclipse_factor(source_radius, occluder_radius, separation))
    }

    fn in_jovian_system(&self, body: BodyIndex) -> bool {
        let b = &self.bodies[body];
        b.id == BodyId::JUPITER || b.parent.is_some_and(|p| self.bodies[p].id == BodyId::JUPITER)
    }

    /// Whether any body is allowed to shadow `target`: the Moon and the bodies of the
    /// Jovian system (Jupiter and its satellites).
    pub fn may_be_shadowed(&self, target: BodyIndex) -> bool {
        self.bodies[target].kind == BodyKind::Moon || self.in_jovian_system(target)
    }

    /// Whether `caster` can project its shadow onto `target`.
    ///
    /// Only the Earth shadows the Moon, and only Jovian bodies shadow each other.
    /// For an allowed pair the penumbral cone test of [`shadow::penumbra_reaches`]
    /// is applied to the heliocentric positions.
    pub fn could_cast_shadow(
        &mut self,
        caster: BodyIndex,
        target: BodyIndex,
        obs: &Observer,
    ) -> Result<bool, PlanetesError> {
        if caster == target || !self.may_be_shadowed(target) {
            return Ok(false);
        }
        if self.in_jovian_system(target) && !self.in_jovian_system(caster) {
            return Ok(false);
        }
        if self.bodies[target].kind == BodyKind::Moon && self.bodies[caster].kind != BodyKind::Earth {
            return Ok(false);
        }

        let caster_pvh = self.get_heliocentric(caster, obs)?;
        let target_pvh = self.get_heliocentric(target, obs)?;
        Ok(shadow::penumbra_reaches(
            &caster_pvh.position,
            self.bodies[caster].radius_au(),
            &target_pvh.position,
            self.bodies[target].radius_au(),
        ))
    }

    /// Bodies whose shadow may fall on `body`, largest first, at most `max_count`.
    ///
    /// Each entry holds the light-time corrected observer-relative position of the
    /// occluder and its radius (AU). When the list is full, a new occluder evicts the
    /// smallest entry if it is at least as large.
    pub fn shadow_candidates(
        &mut self,
        body: BodyIndex,
        obs: &Observer,
        max_count: usize,
    ) -> Result<ShadowList, PlanetesError> {
        let mut candidates = ShadowCandidates::new(max_count);
        if !self.may_be_shadowed(body) {
            return Ok(candidates.into_spheres());
        }

        for other in 0..self.bodies.len() {
            let radius = self.bodies[other].radius_au();
            if !candidates.accepts(radius) || !self.could_cast_shadow(other, body, obs)? {
                continue;
            }
            let position = self.get_observer_relative(other, obs, true)?.position;
            candidates.insert(ShadowSphere { position, radius });
        }
        Ok(candidates.into_spheres())
    }

    /// [`SolarSystem::shadow_candidates`] bounded by the configured
    /// `max_shadow_spheres`.
    pub fn shadow_spheres(&mut self, body: BodyIndex, obs: &Observer) -> Result<ShadowList, PlanetesError> {
        self.shadow_candidates(body, obs, self.config.max_shadow_spheres)
    }

    /// Renderer query surface.
    pub fn info(&mut self, body: BodyIndex, obs: &Observer, info: Info) -> Result<InfoValue, PlanetesError> {
        Ok(match info {
            Info::Pvo => InfoValue::State(self.get_observer_relative(body, obs, true)?),
            Info::Vmag => InfoValue::Number(self.apparent_magnitude(body, obs)?),
            Info::Phase => InfoValue::Number(self.illuminated_fraction(body, obs)?),
            Info::Radius => InfoValue::Number(self.angular_radius(body, obs)?),
        })
    }
}
