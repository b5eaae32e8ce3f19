//! # Catalog records
//!
//! Validation layer between an external catalog loader and the engine. A loader
//! (INI file, JSON document, hard-coded table…) produces one [`BodyRecord`] per body
//! with the attribute values still as text, exactly as they appear in the catalog:
//!
//! ```text
//! [mars]
//! horizons_id = 499
//! radius = 3389.5 km
//! rot_period = 24.6229 h
//! mass = 6.4171e23 kg
//! parent = sun
//! ```
//!
//! [`SolarSystem::from_records`] parses and converts every attribute, resolves the
//! parents and assembles the arena. A malformed record is logged with
//! [`log::warn!`] and skipped; the load only fails when the Sun or the Earth is
//! missing at the end.
//!
//! ## Attributes
//!
//! | attribute            | format                      | stored as                 |
//! |----------------------|-----------------------------|---------------------------|
//! | `horizons_id`        | integer                     | [`BodyId`]                |
//! | `type`               | text (4 chars kept)         | `object_type`             |
//! | `radius`             | `N km`                      | meters                    |
//! | `parent`             | body name                   | arena index               |
//! | `color`              | `r, g, b`                   | `[f64; 3]`                |
//! | `albedo`             | number                      | unitless                  |
//! | `mass`               | `N kg`                      | kg                        |
//! | `rot_obliquity`      | `N deg`                     | radians                   |
//! | `rot_period`         | `N h` or `N d`              | days                      |
//! | `rot_offset`         | degrees                     | radians                   |
//! | `rot_pole_ra/de`     | degrees                     | radians                   |
//! | `rings_*_radius`     | `N km`                      | meters                    |
//! | `orbit`              | HORIZONS element line       | [`KeplerianElements`]     |
//!
//! The `orbit` line is the comma-separated output of a HORIZONS osculating-element
//! query, prefixed with `horizons:`:
//!
//! ```text
//! horizons:JDTDB, A.D. date time, EC, QR, IN, OM, W, Tp, N, MA, TA, A, AD, PR
//! ```
use std::collections::HashMap;

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Body, BodyId, BodyIndex, BodyKind, Rings, RotationAxis};
use crate::{
    config::EngineConfig,
    constants::{DAU, DAYS_PER_CENTURY, RADEG, SECONDS_PER_DAY, T2000},
    keplerian_element::KeplerianElements,
    planetes_errors::PlanetesError,
    solar_system::SolarSystem,
    time::jd_to_mjd,
};

/// Raw attributes of one catalog entry.
///
/// Every attribute is optional text; `name` is the catalog section name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyRecord {
    pub name: String,
    pub horizons_id: Option<String>,
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub radius: Option<String>,
    pub parent: Option<String>,
    pub color: Option<String>,
    pub albedo: Option<String>,
    pub mass: Option<String>,
    pub rot_obliquity: Option<String>,
    pub rot_period: Option<String>,
    pub rot_offset: Option<String>,
    pub rot_pole_ra: Option<String>,
    pub rot_pole_de: Option<String>,
    pub rings_inner_radius: Option<String>,
    pub rings_outer_radius: Option<String>,
    pub orbit: Option<String>,
}

impl BodyRecord {
    pub fn new(name: impl Into<String>) -> Self {
        BodyRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set an attribute from its catalog key, for line-oriented loaders.
    ///
    /// Return
    /// ------
    /// * `false` if the key is not a known attribute (the value is dropped).
    pub fn set(&mut self, attribute: &str, value: impl Into<String>) -> bool {
        let slot = match attribute {
            "horizons_id" => &mut self.horizons_id,
            "type" => &mut self.object_type,
            "radius" => &mut self.radius,
            "parent" => &mut self.parent,
            "color" => &mut self.color,
            "albedo" => &mut self.albedo,
            "mass" => &mut self.mass,
            "rot_obliquity" => &mut self.rot_obliquity,
            "rot_period" => &mut self.rot_period,
            "rot_offset" => &mut self.rot_offset,
            "rot_pole_ra" => &mut self.rot_pole_ra,
            "rot_pole_de" => &mut self.rot_pole_de,
            "rings_inner_radius" => &mut self.rings_inner_radius,
            "rings_outer_radius" => &mut self.rings_outer_radius,
            "orbit" => &mut self.orbit,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }

    /// Fluent variant of [`BodyRecord::set`]; unknown keys are ignored.
    pub fn with(mut self, attribute: &str, value: impl Into<String>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Display name: the section name with its first letter capitalized.
    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Compiled patterns shared by all the attribute parsers.
pub struct RecordParser {
    quantity: Regex,
    orbit: Regex,
}

impl RecordParser {
    pub fn new() -> Result<Self, PlanetesError> {
        Ok(RecordParser {
            quantity: Regex::new(
                r"^\s*([-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?)\s*([A-Za-z]*)\s*$",
            )?,
            orbit: Regex::new(
                r"^\s*horizons:\s*([-+]?[0-9.]+(?:[eE][-+]?\d+)?)\s*,\s*A\.D\.\s+\S+\s+[^,\s]+\s*,?(.*)$",
            )?,
        })
    }

    /// Split `"<number> <unit>"` into its value and (possibly empty) unit.
    fn quantity<'a>(&self, value: &'a str) -> Option<(f64, &'a str)> {
        let caps = self.quantity.captures(value)?;
        let number = caps.get(1)?.as_str().parse().ok()?;
        let unit = caps.get(2).map_or("", |m| m.as_str());
        Some((number, unit))
    }

    /// Parse a HORIZONS osculating-element line into elements referred to the parent.
    ///
    /// Conversions: JD → MJD, degrees → radians, km → AU, degrees/s → radians/day.
    ///
    /// Errors
    /// ------
    /// * [`PlanetesError::InvalidOrbitLine`] if the line does not hold the 13 numbers.
    /// * [`PlanetesError::ImplausibleOrbitEpoch`] if the epoch is more than a century
    ///   from J2000 once converted (typically a JD given where an MJD is expected).
    /// * [`PlanetesError::InvalidOrbit`] if the elements do not describe an ellipse.
    pub fn orbit(&self, line: &str) -> Result<KeplerianElements, PlanetesError> {
        let invalid = || PlanetesError::InvalidOrbitLine(line.to_string());

        let caps = self.orbit.captures(line).ok_or_else(invalid)?;
        let jd: f64 = caps[1].parse().map_err(|_| invalid())?;

        let mut fields: Vec<&str> = caps[2].split(',').map(str::trim).collect();
        if fields.last() == Some(&"") {
            fields.pop();
        }
        let numbers: Vec<f64> = fields
            .iter()
            .map(|f| f.parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| invalid())?;
        let [ec, _qr, inc, om, w, _tp, n, ma, _ta, a, _ad, _pr] =
            <[f64; 12]>::try_from(numbers).map_err(|_| invalid())?;

        let mjd = jd_to_mjd(jd);
        if (mjd - T2000).abs() >= DAYS_PER_CENTURY {
            return Err(PlanetesError::ImplausibleOrbitEpoch(mjd));
        }

        let elements = KeplerianElements {
            reference_epoch: mjd,
            semi_major_axis: a * 1000.0 / DAU,
            eccentricity: ec,
            inclination: inc * RADEG,
            ascending_node_longitude: om * RADEG,
            periapsis_argument: w * RADEG,
            mean_anomaly: ma * RADEG,
            mean_motion: n * RADEG * SECONDS_PER_DAY,
        };
        elements.validate()?;
        Ok(elements)
    }
}

/// Parse every attribute of a record into a body, its parent being resolved with
/// `lookup` among the bodies accepted so far.
fn build_body(
    record: &BodyRecord,
    parser: &RecordParser,
    lookup: impl Fn(&str) -> Option<(BodyIndex, BodyId)>,
) -> Result<Body, PlanetesError> {
    let name = record.display_name();
    let invalid = |attribute: &str, value: &str| PlanetesError::InvalidAttribute {
        body: name.clone(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    };

    let number = |attribute: &str, value: &Option<String>| -> Result<Option<f64>, PlanetesError> {
        value
            .as_deref()
            .map(|v| match parser.quantity(v) {
                Some((x, "")) => Ok(x),
                _ => Err(invalid(attribute, v)),
            })
            .transpose()
    };
    // The unit may be omitted, any other unit is an error.
    let with_unit = |attribute: &str, value: &Option<String>, unit: &str| {
        value
            .as_deref()
            .map(|v| match parser.quantity(v) {
                Some((x, u)) if u.is_empty() || u == unit => Ok(x),
                _ => Err(invalid(attribute, v)),
            })
            .transpose()
    };

    let id_text = record.horizons_id.as_deref().unwrap_or("");
    let id = id_text
        .trim()
        .parse::<i32>()
        .map(BodyId)
        .map_err(|_| invalid("horizons_id", id_text))?;

    let kind = match (BodyKind::from_id(id), record.orbit.as_deref()) {
        (Some(kind), _) => kind,
        (None, Some(line)) => BodyKind::Generic(parser.orbit(line)?),
        (None, None) => return Err(PlanetesError::MissingOrbit(name.clone())),
    };

    let parent = match (kind, record.parent.as_deref()) {
        (BodyKind::Sun, None) => None,
        (BodyKind::Sun, Some(p)) => return Err(invalid("parent", p)),
        (_, None) => return Err(PlanetesError::MissingParent(name.clone())),
        (_, Some(p)) => {
            let (index, parent_id) = lookup(p.trim()).ok_or_else(|| PlanetesError::UnknownParent {
                body: name.clone(),
                parent: p.to_string(),
            })?;
            if kind.expected_parent().is_some_and(|e| e != parent_id) {
                return Err(invalid("parent", p));
            }
            Some(index)
        }
    };

    let mut body = Body::new(id, name.clone(), parent, kind);

    if let Some(t) = record.object_type.as_deref() {
        body.object_type = t.trim().chars().take(4).collect();
    }
    if let Some(km) = with_unit("radius", &record.radius, "km")? {
        body.radius_m = km * 1000.0;
    }
    if let Some(v) = record.color.as_deref() {
        let rgb: Vec<f64> = v
            .split(',')
            .map(|c| c.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| invalid("color", v))?;
        body.color = <[f64; 3]>::try_from(rgb).map_err(|_| invalid("color", v))?;
    }
    if let Some(albedo) = number("albedo", &record.albedo)? {
        body.albedo = albedo;
    }
    if let Some(kg) = with_unit("mass", &record.mass, "kg")? {
        body.mass_kg = kg;
    }

    if let Some(v) = record.rot_period.as_deref() {
        body.rotation.period = match parser.quantity(v) {
            Some((hours, "h")) => Some(hours / 24.0),
            Some((days, "d")) => Some(days),
            _ => return Err(invalid("rot_period", v)),
        };
    }
    if let Some(offset) = number("rot_offset", &record.rot_offset)? {
        body.rotation.offset = offset * RADEG;
    }
    let pole_ra = number("rot_pole_ra", &record.rot_pole_ra)?;
    let pole_de = number("rot_pole_de", &record.rot_pole_de)?;
    let obliquity = match record.rot_obliquity.as_deref() {
        Some(v) => match parser.quantity(v) {
            Some((deg, "deg")) => Some(deg * RADEG),
            _ => return Err(invalid("rot_obliquity", v)),
        },
        None => None,
    };
    body.rotation.axis = match (pole_ra, pole_de, obliquity) {
        (Some(ra), Some(dec), _) => RotationAxis::Pole {
            ra: ra * RADEG,
            dec: dec * RADEG,
        },
        (Some(_), None, _) => return Err(invalid("rot_pole_de", "")),
        (None, Some(_), _) => return Err(invalid("rot_pole_ra", "")),
        (None, None, obliquity) => RotationAxis::Obliquity(obliquity.unwrap_or(0.0)),
    };

    let inner = with_unit("rings_inner_radius", &record.rings_inner_radius, "km")?;
    let outer = with_unit("rings_outer_radius", &record.rings_outer_radius, "km")?;
    body.rings = match (inner, outer) {
        (None, None) => None,
        (Some(inner), Some(outer)) if 0.0 <= inner && inner < outer => Some(Rings {
            inner_radius_m: inner * 1000.0,
            outer_radius_m: outer * 1000.0,
        }),
        _ => {
            let value = record
                .rings_inner_radius
                .iter()
                .chain(record.rings_outer_radius.iter())
                .join(" / ");
            return Err(invalid("rings_radius", &value));
        }
    };

    Ok(body)
}

impl SolarSystem {
    /// Assemble a solar system from raw catalog records.
    ///
    /// Records are taken in order, so a parent must appear before its children.
    /// A record that cannot be parsed, whose name or id is already used, or whose
    /// parent is unknown is logged and skipped.
    ///
    /// Arguments
    /// ---------
    /// * `records`: catalog entries, parents first.
    /// * `config`: engine configuration (refresh windows, shadow bound, …).
    ///
    /// Return
    /// ------
    /// * The assembled [`SolarSystem`], or [`PlanetesError::MissingRequiredBody`] if
    ///   no valid Sun or Earth record was found.
    pub fn from_records(
        records: &[BodyRecord],
        config: EngineConfig,
    ) -> Result<SolarSystem, PlanetesError> {
        let parser = RecordParser::new()?;
        let mut bodies: Vec<Body> = Vec::with_capacity(records.len());
        let mut by_name: HashMap<String, BodyIndex> = HashMap::with_capacity(records.len());

        for record in records {
            let key = record.name.trim().to_lowercase();
            if key.is_empty() {
                log::warn!("Skipping catalog record without name");
                continue;
            }
            if by_name.contains_key(&key) {
                log::warn!("{}", PlanetesError::DuplicateBody(record.display_name()));
                continue;
            }

            let built = build_body(record, &parser, |name| {
                by_name
                    .get(&name.to_lowercase())
                    .map(|&i| (i, bodies[i].id))
            });
            let body = match built {
                Ok(body) => body,
                Err(err) => {
                    log::warn!("Skipping body '{}': {err}", record.display_name());
                    continue;
                }
            };
            if bodies.iter().any(|b| b.id == body.id) {
                log::warn!("Skipping body '{}': {}", body.name, PlanetesError::DuplicateId(body.id.0));
                continue;
            }

            log::debug!("Loaded body '{}' ({}) as {:?}", body.name, body.id.0, body.kind);
            by_name.insert(key, bodies.len());
            bodies.push(body);
        }

        if !bodies.iter().any(|b| b.kind == BodyKind::Sun) {
            return Err(PlanetesError::MissingRequiredBody("Sun"));
        }
        if !bodies.iter().any(|b| b.kind == BodyKind::Earth) {
            return Err(PlanetesError::MissingRequiredBody("Earth"));
        }
        SolarSystem::new(bodies, config)
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;
    use approx::assert_relative_eq;

    const PHOBOS_ORBIT: &str = "horizons:2458849.5, A.D. 2020-Jan-01 00:00:00.0000, \
        1.510E-02, 9.235E+03, 2.607E+01, 8.335E+01, 1.512E+02, 2458849.61, \
        1.3066E-02, 3.412E+02, 3.402E+02, 9.376E+03, 9.517E+03, 2.7553E+04";

    #[test]
    fn test_quantity() {
        let parser = RecordParser::new().unwrap();
        assert_eq!(parser.quantity("6371 km"), Some((6371.0, "km")));
        assert_eq!(parser.quantity(" 5.97e24 kg "), Some((5.97e24, "kg")));
        assert_eq!(parser.quantity("-0.5"), Some((-0.5, "")));
        assert_eq!(parser.quantity("10h"), Some((10.0, "h")));
        assert_eq!(parser.quantity("km"), None);
        assert_eq!(parser.quantity("1 2 km"), None);
    }

    #[test]
    fn test_parse_orbit() {
        let parser = RecordParser::new().unwrap();
        let orbit = parser.orbit(PHOBOS_ORBIT).unwrap();

        assert_eq!(orbit.reference_epoch, 58849.0);
        assert_eq!(orbit.eccentricity, 1.510E-02);
        assert_relative_eq!(orbit.inclination, 26.07 * RADEG);
        assert_relative_eq!(orbit.ascending_node_longitude, 83.35 * RADEG);
        assert_relative_eq!(orbit.periapsis_argument, 151.2 * RADEG);
        assert_relative_eq!(orbit.mean_anomaly, 341.2 * RADEG);
        assert_relative_eq!(orbit.semi_major_axis, 9376.0 / 149_597_870.7);
        // 0.013066°/s is one revolution in 7.65 h
        assert_relative_eq!(orbit.period(), 0.31889, epsilon = 1e-4);
    }

    #[test]
    fn test_parse_orbit_errors() {
        let parser = RecordParser::new().unwrap();

        let truncated = "horizons:2458849.5, A.D. 2020-Jan-01 00:00:00.0000, 1.5E-02, 9.2E+03";
        assert_eq!(
            parser.orbit(truncated),
            Err(PlanetesError::InvalidOrbitLine(truncated.to_string()))
        );
        assert!(parser.orbit("keplerian:1, 2, 3").is_err());

        // Epoch given as JD + 2400000.5 by mistake
        let shifted = PHOBOS_ORBIT.replace("2458849.5", "4858849.5");
        assert!(matches!(
            parser.orbit(&shifted),
            Err(PlanetesError::ImplausibleOrbitEpoch(_))
        ));

        let hyperbolic = PHOBOS_ORBIT.replace("1.510E-02", "1.2");
        assert!(matches!(parser.orbit(&hyperbolic), Err(PlanetesError::InvalidOrbit(_))));
    }

    #[test]
    fn test_record_set_and_name() {
        let mut record = BodyRecord::new("jupiter");
        assert!(record.set("horizons_id", "599"));
        assert!(record.set("type", "Pla"));
        assert!(!record.set("texture", "jupiter.png"));
        assert_eq!(record.horizons_id.as_deref(), Some("599"));
        assert_eq!(record.object_type.as_deref(), Some("Pla"));
        assert_eq!(record.display_name(), "Jupiter");
        assert_eq!(BodyRecord::new("").display_name(), "");
    }

    fn lookup(name: &str) -> Option<(BodyIndex, BodyId)> {
        match name.to_lowercase().as_str() {
            "sun" => Some((0, BodyId::SUN)),
            "earth" => Some((1, BodyId::EARTH)),
            "mars" => Some((2, BodyId::MARS)),
            _ => None,
        }
    }

    #[test]
    fn test_build_body_attributes() {
        let parser = RecordParser::new().unwrap();
        let record = BodyRecord::new("saturn")
            .with("horizons_id", "699")
            .with("type", "Planet")
            .with("parent", "Sun")
            .with("radius", "58232 km")
            .with("color", "0.89, 0.84, 0.68")
            .with("albedo", "0.499")
            .with("mass", "5.6834e26 kg")
            .with("rot_period", "10.656 h")
            .with("rot_offset", "38.9")
            .with("rot_pole_ra", "40.589")
            .with("rot_pole_de", "83.537")
            .with("rings_inner_radius", "74500 km")
            .with("rings_outer_radius", "140220 km");

        let body = build_body(&record, &parser, lookup).unwrap();
        assert_eq!(body.name, "Saturn");
        assert_eq!(body.id, BodyId::SATURN);
        assert_eq!(body.object_type, "Plan");
        assert_eq!(body.parent, Some(0));
        assert_eq!(body.radius_m, 58_232_000.0);
        assert_eq!(body.color, [0.89, 0.84, 0.68]);
        assert_eq!(body.albedo, 0.499);
        assert_eq!(body.mass_kg, 5.6834e26);
        assert_relative_eq!(body.rotation.period.unwrap(), 10.656 / 24.0);
        assert_relative_eq!(body.rotation.offset, 38.9 * RADEG);
        assert_eq!(
            body.rotation.axis,
            RotationAxis::Pole {
                ra: 40.589 * RADEG,
                dec: 83.537 * RADEG
            }
        );
        assert_eq!(
            body.rings,
            Some(Rings {
                inner_radius_m: 74_500_000.0,
                outer_radius_m: 140_220_000.0
            })
        );
    }

    #[test]
    fn test_build_generic_body() {
        let parser = RecordParser::new().unwrap();
        let record = BodyRecord::new("phobos")
            .with("horizons_id", "401")
            .with("parent", "mars")
            .with("radius", "11.1")
            .with("rot_obliquity", "0.3 deg")
            .with("rot_period", "0.31891 d")
            .with("orbit", PHOBOS_ORBIT);

        let body = build_body(&record, &parser, lookup).unwrap();
        assert_eq!(body.parent, Some(2));
        assert_relative_eq!(body.radius_m, 11_100.0);
        assert_eq!(body.rotation.period, Some(0.31891));
        assert_relative_eq!(
            match body.rotation.axis {
                RotationAxis::Obliquity(o) => o,
                RotationAxis::Pole { .. } => f64::NAN,
            },
            0.3 * RADEG
        );
        assert!(matches!(body.kind, BodyKind::Generic(e) if e.reference_epoch == 58849.0));
    }

    #[test]
    fn test_build_body_errors() {
        let parser = RecordParser::new().unwrap();
        let base = BodyRecord::new("mars").with("horizons_id", "499").with("parent", "sun");
        assert!(build_body(&base, &parser, lookup).is_ok());

        let attribute_error = |attr: &str, value: &str| {
            let record = base.clone().with(attr, value);
            match build_body(&record, &parser, lookup) {
                Err(PlanetesError::InvalidAttribute { attribute, .. }) => attribute,
                other => panic!("{attr} = {value}: {other:?}"),
            }
        };
        assert_eq!(attribute_error("rot_obliquity", "25.19"), "rot_obliquity");
        assert_eq!(attribute_error("rot_period", "24.6"), "rot_period");
        assert_eq!(attribute_error("rot_period", "24.6 min"), "rot_period");
        assert_eq!(attribute_error("radius", "3389 mi"), "radius");
        assert_eq!(attribute_error("color", "1, 0"), "color");
        assert_eq!(attribute_error("albedo", "bright"), "albedo");
        assert_eq!(attribute_error("rot_pole_ra", "317.7"), "rot_pole_de");
        assert_eq!(attribute_error("rings_inner_radius", "10 km"), "rings_radius");
        assert_eq!(attribute_error("horizons_id", "mars"), "horizons_id");
        // A planet must orbit the Sun.
        assert_eq!(attribute_error("parent", "earth"), "parent");

        let orphan = BodyRecord::new("mars").with("horizons_id", "499");
        assert_eq!(
            build_body(&orphan, &parser, lookup),
            Err(PlanetesError::MissingParent("Mars".into()))
        );
        let lost = base.clone().with("parent", "vulcan");
        assert!(matches!(
            build_body(&lost, &parser, lookup),
            Err(PlanetesError::UnknownParent { .. })
        ));
        let comet = BodyRecord::new("halley").with("horizons_id", "90000030").with("parent", "sun");
        assert_eq!(
            build_body(&comet, &parser, lookup),
            Err(PlanetesError::MissingOrbit("Halley".into()))
        );
    }
}
