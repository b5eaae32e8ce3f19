use approx::assert_relative_eq;
use planetes::constants::{DPI, GAUSS_GRAV_SQUARED};
use planetes::kepler::{angle_diff, principal_angle, solve_kepler_equation};
use planetes::keplerian_element::KeplerianElements;
use planetes::state_vector::StateVector;
use rand::{rngs::StdRng, Rng, SeedableRng};

mod common;

#[test]
fn test_state_round_trip() {
    let mut rng = StdRng::seed_from_u64(20240408);
    let mu = GAUSS_GRAV_SQUARED;

    for _ in 0..500 {
        let a: f64 = rng.random_range(0.3..40.0);
        let elements = KeplerianElements {
            reference_epoch: 60000.0,
            semi_major_axis: a,
            eccentricity: rng.random_range(0.05..0.9),
            inclination: rng.random_range(0.1..3.0),
            ascending_node_longitude: rng.random_range(0.0..DPI),
            periapsis_argument: rng.random_range(0.0..DPI),
            mean_anomaly: rng.random_range(0.0..DPI),
            mean_motion: (mu / a.powi(3)).sqrt(),
        };
        let time = elements.reference_epoch + rng.random_range(-3000.0..3000.0);

        let state = elements.propagate(time).unwrap();
        let derived = KeplerianElements::from_state(time, &state, mu).unwrap();

        let expected = KeplerianElements {
            reference_epoch: time,
            mean_anomaly: elements.mean_anomaly_at(time),
            ..elements
        };
        common::assert_orbit_close(&derived, &expected, 1e-8);
        assert_relative_eq!(derived.mean_motion, elements.mean_motion, max_relative = 1e-10);
    }
}

#[test]
fn test_circular_equatorial_orbit() {
    let a = 2.5;
    let elements = KeplerianElements {
        reference_epoch: 60000.0,
        semi_major_axis: a,
        eccentricity: 0.0,
        inclination: 0.0,
        ascending_node_longitude: 0.0,
        periapsis_argument: 0.0,
        mean_anomaly: 0.0,
        mean_motion: (GAUSS_GRAV_SQUARED / a.powi(3)).sqrt(),
    };

    let start = elements.propagate(60000.0).unwrap();
    assert_relative_eq!(start.position.x, a, epsilon = 1e-14);
    assert_relative_eq!(start.position.y, 0.0, epsilon = 1e-14);
    assert_relative_eq!(start.position.z, 0.0, epsilon = 1e-14);

    for dt in [0.5, 17.0, 365.25, -1234.5] {
        let state = elements.propagate(60000.0 + dt).unwrap();
        let m = elements.mean_anomaly_at(60000.0 + dt);
        assert_relative_eq!(state.distance(), a, epsilon = 1e-12);
        assert_relative_eq!(state.position.x, a * m.cos(), epsilon = 1e-12);
        assert_relative_eq!(state.position.y, a * m.sin(), epsilon = 1e-12);
        assert_relative_eq!(state.velocity.norm(), a * elements.mean_motion, epsilon = 1e-14);
        assert_eq!(state.position.z, 0.0);

        let derived = KeplerianElements::from_state(60000.0 + dt, &state, GAUSS_GRAV_SQUARED).unwrap();
        assert!(derived.eccentricity < 1e-10);
        assert_eq!(derived.ascending_node_longitude, 0.0);
        assert_relative_eq!(
            principal_angle(derived.periapsis_argument + derived.mean_anomaly),
            m,
            epsilon = 1e-10
        );
    }
}

#[test]
fn test_kepler_equation_residual() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10_000 {
        let e: f64 = rng.random_range(0.0..0.99);
        let m: f64 = rng.random_range(-20.0..20.0);
        let ecc_anom = solve_kepler_equation(m, e).unwrap();
        assert_relative_eq!(ecc_anom - e * ecc_anom.sin(), angle_diff(m, 0.0), epsilon = 1e-10);
    }
}

fn elements(e: f64, i: f64, node: f64, peri: f64, m: f64) -> KeplerianElements {
    let a = 1.5_f64;
    KeplerianElements {
        reference_epoch: 60000.0,
        semi_major_axis: a,
        eccentricity: e,
        inclination: i,
        ascending_node_longitude: node,
        periapsis_argument: peri,
        mean_anomaly: m,
        mean_motion: (GAUSS_GRAV_SQUARED / a.powi(3)).sqrt(),
    }
}

/// Elements derived from `state` at `time` propagate back onto the original orbit.
fn assert_reproduces(original: &KeplerianElements, derived: &KeplerianElements, time: f64) {
    for dt in [0.0, 3.5, 200.0, -90.0] {
        let expected: StateVector = original.propagate(time + dt).unwrap();
        let actual = derived.propagate(time + dt).unwrap();
        assert_relative_eq!(actual.position, expected.position, epsilon = 1e-10);
        assert_relative_eq!(actual.velocity, expected.velocity, epsilon = 1e-12);
    }
}

#[test]
fn test_equatorial_eccentric_orbit() {
    // Undefined node: the periapsis is measured from the X axis.
    let original = elements(0.3, 0.0, 1.1, 0.7, 2.0);
    let time = 60010.0;
    let state = original.propagate(time).unwrap();
    let derived = KeplerianElements::from_state(time, &state, GAUSS_GRAV_SQUARED).unwrap();

    assert_eq!(derived.inclination, 0.0);
    assert_eq!(derived.ascending_node_longitude, 0.0);
    assert_relative_eq!(derived.eccentricity, 0.3, epsilon = 1e-12);
    assert_relative_eq!(angle_diff(derived.periapsis_argument, 1.8), 0.0, epsilon = 1e-10);
    assert_relative_eq!(
        angle_diff(derived.mean_anomaly, original.mean_anomaly_at(time)),
        0.0,
        epsilon = 1e-10
    );
    assert_reproduces(&original, &derived, time);
}

#[test]
fn test_inclined_circular_orbit() {
    // Undefined periapsis: the anomaly is counted from the ascending node.
    let original = elements(0.0, 0.5, 1.1, 0.7, 2.0);
    let time = 60010.0;
    let state = original.propagate(time).unwrap();
    let derived = KeplerianElements::from_state(time, &state, GAUSS_GRAV_SQUARED).unwrap();

    assert!(derived.eccentricity < 1e-12);
    assert_eq!(derived.periapsis_argument, 0.0);
    assert_relative_eq!(derived.inclination, 0.5, epsilon = 1e-12);
    assert_relative_eq!(angle_diff(derived.ascending_node_longitude, 1.1), 0.0, epsilon = 1e-12);
    assert_relative_eq!(
        angle_diff(derived.mean_anomaly, 0.7 + original.mean_anomaly_at(time)),
        0.0,
        epsilon = 1e-10
    );
    assert_reproduces(&original, &derived, time);
}

#[test]
fn test_retrograde_orbit() {
    let original = elements(0.4, 3.1, 4.0, 5.5, 0.3);
    let time = 59990.0;
    let state = original.propagate(time).unwrap();
    let derived = KeplerianElements::from_state(time, &state, GAUSS_GRAV_SQUARED).unwrap();

    let expected = KeplerianElements {
        reference_epoch: time,
        mean_anomaly: original.mean_anomaly_at(time),
        ..original
    };
    common::assert_orbit_close(&derived, &expected, 1e-8);
    assert_reproduces(&original, &derived, time);
}
