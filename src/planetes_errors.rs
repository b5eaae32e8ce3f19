use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanetesError {
    #[error("Invalid engine parameter: {0}")]
    InvalidEngineParameter(String),

    #[error("Cannot parse body attribute: [{body}] {attribute} = {value}")]
    InvalidAttribute {
        body: String,
        attribute: String,
        value: String,
    },

    #[error("Cannot parse orbit line '{0}'")]
    InvalidOrbitLine(String),

    #[error("Orbit epoch {0} is not a plausible MJD (JD given instead?)")]
    ImplausibleOrbitEpoch(f64),

    #[error("Body '{body}' references unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },

    #[error("Body '{0}' has no parent and is not the Sun")]
    MissingParent(String),

    #[error("Duplicate body name: {0}")]
    DuplicateBody(String),

    #[error("Duplicate HORIZONS id: {0}")]
    DuplicateId(i32),

    #[error("Catalog has no '{0}' body")]
    MissingRequiredBody(&'static str),

    #[error("Body '{0}' needs orbital elements relative to its parent")]
    MissingOrbit(String),

    #[error("Invalid orbit: {0}")]
    InvalidOrbit(String),

    #[error("Kepler equation did not converge (e = {eccentricity}, M = {mean_anomaly})")]
    KeplerNoConvergence {
        eccentricity: f64,
        mean_anomaly: f64,
    },

    #[error("Unable to parse date: {0}")]
    InvalidDate(String),

    #[error("Invalid body tree: {0}")]
    InvalidTree(String),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}
