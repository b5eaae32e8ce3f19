use approx::assert_relative_eq;
use planetes::bodies::catalog::BodyRecord;
use planetes::bodies::{BodyId, BodyKind, RotationAxis};
use planetes::config::EngineConfig;
use planetes::constants::{DAU, RADEG};
use planetes::observer::Observer;
use planetes::planetes_errors::PlanetesError;
use planetes::solar_system::SolarSystem;

mod common;

#[test]
fn test_load_full_catalog() {
    let system = common::solar_system();
    assert_eq!(system.len(), 15);
    assert_eq!(system.body(system.sun()).name, "Sun");
    assert_eq!(system.body(system.earth()).name, "Earth");

    let mars = system.find_by_name("mars").unwrap();
    let phobos = system.find_by_name("Phobos").unwrap();
    assert_eq!(system.body(phobos).parent, Some(mars));
    assert!(matches!(system.body(phobos).kind, BodyKind::Generic(_)));
    assert_relative_eq!(system.body(phobos).radius_m, 11_100.0);

    let saturn = system.find_by_id(BodyId::SATURN).unwrap();
    let rings = system.body(saturn).rings.unwrap();
    assert_eq!(rings.inner_radius_m, 74_500_000.0);
    assert_eq!(rings.outer_radius_m, 140_220_000.0);
    assert!(matches!(
        system.body(saturn).rotation.axis,
        RotationAxis::Pole { .. }
    ));

    let earth = system.body(system.earth());
    assert_relative_eq!(earth.rotation.period.unwrap(), 23.9345 / 24.0);
    assert_eq!(earth.rotation.axis, RotationAxis::Obliquity(23.44 * RADEG));

    // Every body has its parent before it.
    for (index, body) in system.bodies().iter().enumerate() {
        if let Some(parent) = body.parent {
            assert!(parent < index, "{}", body.name);
        }
    }
}

#[test]
fn test_malformed_records_are_skipped() {
    let mut records = common::catalog();
    records.push(BodyRecord::new("Earth").with("horizons_id", "398").with("parent", "sun"));
    records.push(BodyRecord::new("terra").with("horizons_id", "399").with("parent", "sun"));
    records.push(BodyRecord::new("vulcan").with("horizons_id", "1001").with("parent", "vulcanus"));
    records.push(BodyRecord::new("ceres").with("horizons_id", "2000001").with("parent", "sun"));
    records.push(
        BodyRecord::new("deimos")
            .with("horizons_id", "402")
            .with("parent", "mars")
            .with("orbit", "horizons:2458849.5, A.D. 2020-Jan-01 00:00:00.0000, 1, 2, 3"),
    );
    records.push(BodyRecord::new("  ").with("horizons_id", "1002"));
    records.insert(
        1,
        BodyRecord::new("amalthea").with("horizons_id", "505").with("parent", "jupiter"),
    );

    let system = SolarSystem::from_records(&records, EngineConfig::default()).unwrap();
    assert_eq!(system.len(), 15);
    for name in ["terra", "vulcan", "ceres", "deimos", "amalthea"] {
        assert_eq!(system.find_by_name(name), None, "{name}");
    }
    assert_eq!(system.body(system.earth()).id, BodyId::EARTH);
}

#[test]
fn test_missing_required_bodies() {
    let without_earth: Vec<BodyRecord> = common::catalog()
        .into_iter()
        .filter(|r| r.name != "earth")
        .collect();
    assert_eq!(
        SolarSystem::from_records(&without_earth, EngineConfig::default()).unwrap_err(),
        PlanetesError::MissingRequiredBody("Earth")
    );

    let without_sun: Vec<BodyRecord> = common::catalog().into_iter().skip(1).collect();
    assert_eq!(
        SolarSystem::from_records(&without_sun, EngineConfig::default()).unwrap_err(),
        PlanetesError::MissingRequiredBody("Sun")
    );

    assert_eq!(
        SolarSystem::from_records(&[], EngineConfig::default()).unwrap_err(),
        PlanetesError::MissingRequiredBody("Sun")
    );
}

#[test]
fn test_records_from_json() {
    let json = r#"[
        {"name": "sun", "horizons_id": "10", "type": "Star", "radius": "695508 km"},
        {"name": "earth", "horizons_id": "399", "parent": "sun", "radius": "6371 km",
         "rot_period": "23.9345 h", "rot_obliquity": "23.44 deg"},
        {"name": "moon", "horizons_id": "301", "parent": "earth", "radius": "1737.4"}
    ]"#;
    let records: Vec<BodyRecord> = serde_json::from_str(json).unwrap();
    assert_eq!(records[0].object_type.as_deref(), Some("Star"));
    assert_eq!(records[1].mass, None);

    let system = SolarSystem::from_records(&records, EngineConfig::default()).unwrap();
    assert_eq!(system.len(), 3);
    assert_eq!(system.body(0).object_type, "Star");
    assert_eq!(system.body(2).radius_m, 1_737_400.0);
}

#[test]
fn test_generic_body_elements() {
    let mut system = common::solar_system();
    let phobos = system.find_by_name("phobos").unwrap();
    let obs = Observer::approximate_geocentric(58849.0).unwrap();

    let elements = system.osculating_elements(phobos, &obs).unwrap();
    let BodyKind::Generic(catalog) = system.body(phobos).kind else {
        panic!("Phobos should be a generic body");
    };

    // The catalog mean motion and G·M(Mars) agree to better than 0.1%.
    assert_relative_eq!(elements.semi_major_axis, 9376e3 / DAU, max_relative = 1e-2);
    assert_relative_eq!(elements.eccentricity, catalog.eccentricity, epsilon = 2e-3);
    assert_relative_eq!(elements.inclination, catalog.inclination, epsilon = 1e-9);
    assert_relative_eq!(
        elements.ascending_node_longitude,
        catalog.ascending_node_longitude,
        epsilon = 1e-9
    );
    assert_relative_eq!(elements.period(), catalog.period(), max_relative = 1e-2);

    let sun = system.sun();
    assert_eq!(
        system.osculating_elements(sun, &obs).unwrap_err(),
        PlanetesError::MissingParent("Sun".into())
    );
}
