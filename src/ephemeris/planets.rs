//! # Major planets from mean orbital elements
//!
//! Keplerian mean elements of the eight planets (the Earth through the Earth–Moon
//! barycentre) with their secular rates, referred to the mean ecliptic and equinox
//! of J2000 and fitted over 1800–2050 (Standish, *Keplerian Elements for
//! Approximate Positions of the Major Planets*, JPL).
//!
//! The elements at the requested date are propagated as a two-body orbit with
//! [`crate::kepler::propagate`] and the result is rotated to ICRF. Typical errors
//! are a few arc-minutes for the inner planets and up to ~10' for Saturn, which is
//! the accuracy class a sky renderer needs.
use crate::{
    constants::{DAYS_PER_CENTURY, MJD, RADEG},
    kepler::propagate,
    planetes_errors::PlanetesError,
    ref_system::{rotpn, RefEpoch, RefSystem},
    state_vector::StateVector,
    time::centuries_since_j2000,
};

/// The seven planets besides the Earth, in order of distance to the Sun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planet {
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    pub const ALL: [Planet; 7] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    /// JPL HORIZONS identifier of the planet body (not of its barycentre).
    pub fn horizons_id(self) -> i32 {
        match self {
            Planet::Mercury => 199,
            Planet::Venus => 299,
            Planet::Mars => 499,
            Planet::Jupiter => 599,
            Planet::Saturn => 699,
            Planet::Uranus => 799,
            Planet::Neptune => 899,
        }
    }

    pub fn from_horizons_id(id: i32) -> Option<Planet> {
        Planet::ALL.into_iter().find(|p| p.horizons_id() == id)
    }

    fn elements(self) -> &'static MeanElements {
        match self {
            Planet::Mercury => &MEAN_ELEMENTS[0],
            Planet::Venus => &MEAN_ELEMENTS[1],
            Planet::Mars => &MEAN_ELEMENTS[3],
            Planet::Jupiter => &MEAN_ELEMENTS[4],
            Planet::Saturn => &MEAN_ELEMENTS[5],
            Planet::Uranus => &MEAN_ELEMENTS[6],
            Planet::Neptune => &MEAN_ELEMENTS[7],
        }
    }
}

/// Mean elements at J2000 and their rates per Julian century.
///
/// `[a (AU), e, I (deg), L (deg), ϖ (deg), Ω (deg)]`
struct MeanElements {
    at_j2000: [f64; 6],
    rate: [f64; 6],
}

const MEAN_ELEMENTS: [MeanElements; 8] = [
    // Mercury
    MeanElements {
        at_j2000: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
        rate: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
    },
    // Venus
    MeanElements {
        at_j2000: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
        rate: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
    },
    // Earth-Moon barycentre
    MeanElements {
        at_j2000: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
        rate: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
    },
    // Mars
    MeanElements {
        at_j2000: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
        rate: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
    },
    // Jupiter
    MeanElements {
        at_j2000: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
        rate: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
    },
    // Saturn
    MeanElements {
        at_j2000: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
        rate: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
    },
    // Uranus
    MeanElements {
        at_j2000: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
        rate: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
    },
    // Neptune
    MeanElements {
        at_j2000: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
        rate: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
    },
];

const EARTH_MOON_BARYCENTER: usize = 2;

fn mean_element_state(elements: &MeanElements, tt: MJD) -> Result<StateVector, PlanetesError> {
    let t = centuries_since_j2000(tt);
    let [a, e, incl, mean_lon, peri_lon, node] = std::array::from_fn::<f64, 6, _>(|k| {
        elements.at_j2000[k] + elements.rate[k] * t
    });

    let (pos, vel) = propagate(
        tt,
        tt,
        incl * RADEG,
        node * RADEG,
        (peri_lon - node) * RADEG,
        a,
        elements.rate[3] * RADEG / DAYS_PER_CENTURY,
        e,
        (mean_lon - peri_lon) * RADEG,
    )?;

    let ecl_to_icrf = rotpn(
        &RefSystem::Eclm(RefEpoch::J2000),
        &RefSystem::Equm(RefEpoch::J2000),
    );
    Ok(StateVector::new(ecl_to_icrf * pos, ecl_to_icrf * vel))
}

/// Heliocentric ICRF state of a planet at `tt` (MJD TT).
pub fn heliocentric_state(planet: Planet, tt: MJD) -> Result<StateVector, PlanetesError> {
    mean_element_state(planet.elements(), tt)
}

/// Heliocentric ICRF state of the Earth–Moon barycentre at `tt`.
///
/// Used as the Earth state of observers built without an external ephemeris; the
/// ~4700 km offset between the barycentre and the geocentre is ignored.
pub fn approximate_earth_state(tt: MJD) -> Result<StateVector, PlanetesError> {
    mean_element_state(&MEAN_ELEMENTS[EARTH_MOON_BARYCENTER], tt)
}
