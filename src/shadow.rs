//! # Shadow geometry
//!
//! Two closed-form pieces used by the renderer to shade bodies:
//!
//! * [`eclipse_factor`]: unobstructed fraction of a light-source disk partially
//!   covered by an occluding disk, from the two angular radii and their separation.
//! * [`penumbra_reaches`] and [`ShadowCandidates`]: the geometric test telling whether
//!   a body's penumbral cone can reach another one, and the bounded list of the
//!   largest occluders kept for one draw call.
//!
//! Which bodies are allowed to shadow which is a property of the body tree and is
//! decided by [`SolarSystem`](crate::solar_system::SolarSystem).
use std::f64::consts::PI;

use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::constants::{meters_to_au, SUN_RADIUS_M};

/// A sphere that may cast a shadow: observer-relative position and radius (AU).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSphere {
    pub position: Vector3<f64>,
    pub radius: f64,
}

/// Shadow spheres of one body, largest first.
pub type ShadowList = SmallVec<[ShadowSphere; 4]>;

/// Fraction of a light-source disk left uncovered by an occluding disk.
///
/// Arguments
/// ---------
/// * `source_radius`: angular radius of the light source (radians).
/// * `occluder_radius`: angular radius of the occluder (radians).
/// * `separation`: angular distance between the two centers (radians).
///
/// Return
/// ------
/// * `1.0` when the disks do not overlap, `0.0` when the occluder covers the whole
///   source, `1 − (r/R)²` when the occluder lies inside the source, and one minus the
///   lens-shaped overlap area over the source area otherwise. The result is
///   continuous and non-decreasing in `separation`.
pub fn eclipse_factor(source_radius: f64, occluder_radius: f64, separation: f64) -> f64 {
    let (big_r, r, d) = (source_radius, occluder_radius, separation);

    if d >= big_r + r {
        return 1.0;
    }
    if d <= r - big_r {
        return 0.0;
    }
    if d <= big_r - r {
        return 1.0 - r * r / (big_r * big_r);
    }

    // |R − r| < d < R + r, hence d > 0 and both radii > 0.
    let x = (big_r * big_r + d * d - r * r) / (2.0 * d);
    let alpha = (x / big_r).clamp(-1.0, 1.0).acos();
    let beta = ((d - x) / r).clamp(-1.0, 1.0).acos();
    let source_segment = big_r * big_r * (alpha - 0.5 * (2.0 * alpha).sin());
    let occluder_segment = r * r * (beta - 0.5 * (2.0 * beta).sin());

    (1.0 - (source_segment + occluder_segment) / (PI * big_r * big_r)).clamp(0.0, 1.0)
}

/// Whether the penumbral cone cast by a body, lit by the Sun, can reach another body.
///
/// Both positions are heliocentric (AU). The caster must be closer to the Sun than
/// the target, and the Sun → caster line, at the target's distance along it, must
/// pass within `penumbra radius + target radius` of the target center.
///
/// Arguments
/// ---------
/// * `caster`: heliocentric position of the occluding body.
/// * `caster_radius`: its radius (AU).
/// * `target`: heliocentric position of the shaded body.
/// * `target_radius`: its radius (AU).
pub fn penumbra_reaches(
    caster: &Vector3<f64>,
    caster_radius: f64,
    target: &Vector3<f64>,
    target_radius: f64,
) -> bool {
    let sun_radius = meters_to_au(SUN_RADIUS_M);

    if caster.norm_squared() > target.norm_squared() {
        return false;
    }
    let Some(axis) = caster.try_normalize(0.0) else {
        return false;
    };
    let shadow_distance = axis.dot(target);
    // Distance from the caster to the apex of the penumbral cone, behind the Sun.
    let apex = caster.norm() / (caster_radius / sun_radius + 1.0);
    let penumbra_radius = (shadow_distance - apex) / apex * sun_radius;

    (axis * shadow_distance - target).norm() < penumbra_radius + target_radius
}

/// Bounded list of shadow spheres ordered by decreasing radius.
///
/// Once the list is full, a new sphere replaces the last (smallest) entry only if it
/// is strictly larger. On equal radii the entry already present is kept, so the
/// result does not depend on the enumeration order of ties. Callers check [`ShadowCandidates::accepts`] before
/// computing the position of a candidate, so rejected bodies cost nothing.
#[derive(Debug, Clone)]
pub struct ShadowCandidates {
    max_count: usize,
    spheres: ShadowList,
}

impl ShadowCandidates {
    pub fn new(max_count: usize) -> Self {
        ShadowCandidates {
            max_count,
            spheres: SmallVec::new(),
        }
    }

    /// Whether a sphere of this radius would enter the list.
    pub fn accepts(&self, radius: f64) -> bool {
        match self.spheres.last() {
            _ if self.max_count == 0 => false,
            Some(smallest) if self.spheres.len() >= self.max_count => radius > smallest.radius,
            _ => true,
        }
    }

    pub fn insert(&mut self, sphere: ShadowSphere) {
        if !self.accepts(sphere.radius) {
            return;
        }
        if self.spheres.len() >= self.max_count {
            self.spheres.pop();
        }
        self.spheres.push(sphere);
        self.spheres.sort_by(|a, b| b.radius.total_cmp(&a.radius));
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    pub fn into_spheres(self) -> ShadowList {
        self.spheres
    }
}
