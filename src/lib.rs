pub mod bodies;
pub mod config;
pub mod constants;
pub mod ephemeris;
pub mod kepler;
pub mod keplerian_element;
pub mod observer;
pub mod orb_elem;
pub mod photometry;
pub mod planetes_errors;
pub mod ref_system;
pub mod shadow;
pub mod solar_system;
pub mod state_vector;
pub mod time;
