#![allow(dead_code)]

use approx::assert_relative_eq;
use planetes::bodies::catalog::BodyRecord;
use planetes::config::EngineConfig;
use planetes::kepler::angle_diff;
use planetes::keplerian_element::KeplerianElements;
use planetes::solar_system::SolarSystem;

pub const PHOBOS_ORBIT: &str = "horizons:2458849.5, A.D. 2020-Jan-01 00:00:00.0000, \
    1.510E-02, 9.235E+03, 2.607E+01, 8.335E+01, 1.512E+02, 2458849.61, \
    1.3066E-02, 3.412E+02, 3.402E+02, 9.376E+03, 9.517E+03, 2.7553E+04";

fn record(name: &str, attributes: &[(&str, &str)]) -> BodyRecord {
    attributes
        .iter()
        .fold(BodyRecord::new(name), |r, (k, v)| r.with(k, *v))
}

/// The bodies of a typical sky-rendering catalog, parents first.
pub fn catalog() -> Vec<BodyRecord> {
    vec![
        record(
            "sun",
            &[
                ("horizons_id", "10"),
                ("type", "Sun"),
                ("radius", "695508 km"),
                ("mass", "1.98847e30 kg"),
                ("color", "1.0, 0.95, 0.85"),
            ],
        ),
        record(
            "mercury",
            &[
                ("horizons_id", "199"),
                ("parent", "sun"),
                ("radius", "2439.7 km"),
                ("mass", "3.3011e23 kg"),
                ("albedo", "0.142"),
                ("rot_period", "1407.6 h"),
                ("rot_pole_ra", "281.01"),
                ("rot_pole_de", "61.45"),
            ],
        ),
        record(
            "venus",
            &[
                ("horizons_id", "299"),
                ("parent", "sun"),
                ("radius", "6051.8 km"),
                ("mass", "4.8675e24 kg"),
                ("albedo", "0.689"),
                ("rot_period", "-5832.5 h"),
            ],
        ),
        record(
            "earth",
            &[
                ("horizons_id", "399"),
                ("parent", "sun"),
                ("radius", "6371 km"),
                ("mass", "5.97237e24 kg"),
                ("albedo", "0.434"),
                ("rot_obliquity", "23.44 deg"),
                ("rot_period", "23.9345 h"),
            ],
        ),
        record(
            "moon",
            &[
                ("horizons_id", "301"),
                ("parent", "earth"),
                ("radius", "1737.4 km"),
                ("mass", "7.342e22 kg"),
                ("albedo", "0.12"),
                ("rot_period", "27.321661 d"),
            ],
        ),
        record(
            "mars",
            &[
                ("horizons_id", "499"),
                ("parent", "sun"),
                ("radius", "3389.5 km"),
                ("mass", "6.4171e23 kg"),
                ("albedo", "0.170"),
                ("rot_period", "24.6229 h"),
            ],
        ),
        record(
            "phobos",
            &[
                ("horizons_id", "401"),
                ("parent", "mars"),
                ("radius", "11.1 km"),
                ("albedo", "0.071"),
                ("orbit", PHOBOS_ORBIT),
            ],
        ),
        record(
            "jupiter",
            &[
                ("horizons_id", "599"),
                ("parent", "sun"),
                ("radius", "69911 km"),
                ("mass", "1.8982e27 kg"),
                ("albedo", "0.538"),
                ("rot_period", "9.925 h"),
                ("rot_pole_ra", "268.057"),
                ("rot_pole_de", "64.495"),
            ],
        ),
        record(
            "io",
            &[
                ("horizons_id", "501"),
                ("parent", "jupiter"),
                ("radius", "1821.6 km"),
                ("albedo", "0.63"),
            ],
        ),
        record(
            "europa",
            &[
                ("horizons_id", "502"),
                ("parent", "jupiter"),
                ("radius", "1560.8 km"),
                ("albedo", "0.67"),
            ],
        ),
        record(
            "ganymede",
            &[
                ("horizons_id", "503"),
                ("parent", "jupiter"),
                ("radius", "2634.1 km"),
                ("albedo", "0.43"),
            ],
        ),
        record(
            "callisto",
            &[
                ("horizons_id", "504"),
                ("parent", "jupiter"),
                ("radius", "2410.3 km"),
                ("albedo", "0.22"),
            ],
        ),
        record(
            "saturn",
            &[
                ("horizons_id", "699"),
                ("parent", "sun"),
                ("radius", "58232 km"),
                ("mass", "5.6834e26 kg"),
                ("albedo", "0.499"),
                ("rot_period", "10.656 h"),
                ("rot_pole_ra", "40.589"),
                ("rot_pole_de", "83.537"),
                ("rings_inner_radius", "74500 km"),
                ("rings_outer_radius", "140220 km"),
            ],
        ),
        record(
            "uranus",
            &[
                ("horizons_id", "799"),
                ("parent", "sun"),
                ("radius", "25362 km"),
                ("mass", "8.681e25 kg"),
                ("albedo", "0.488"),
            ],
        ),
        record(
            "neptune",
            &[
                ("horizons_id", "899"),
                ("parent", "sun"),
                ("radius", "24622 km"),
                ("mass", "1.02413e26 kg"),
                ("albedo", "0.442"),
            ],
        ),
    ]
}

pub fn solar_system() -> SolarSystem {
    SolarSystem::from_records(&catalog(), EngineConfig::default()).unwrap()
}

pub fn assert_orbit_close(actual: &KeplerianElements, expected: &KeplerianElements, epsilon: f64) {
    assert_relative_eq!(
        actual.reference_epoch,
        expected.reference_epoch,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.semi_major_axis,
        expected.semi_major_axis,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.eccentricity,
        expected.eccentricity,
        epsilon = epsilon
    );
    assert_relative_eq!(actual.inclination, expected.inclination, epsilon = epsilon);
    for (a, e) in [
        (actual.ascending_node_longitude, expected.ascending_node_longitude),
        (actual.periapsis_argument, expected.periapsis_argument),
        (actual.mean_anomaly, expected.mean_anomaly),
    ] {
        assert!(angle_diff(a, e).abs() < epsilon, "{a} != {e} (mod 2π)");
    }
}
