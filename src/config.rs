//! # Engine configuration
//!
//! [`EngineConfig`] gathers the few tunables of the ephemeris engine: the heliocentric
//! cache refresh policy, the shadow-candidate bound used by the renderer, and the
//! numerical guards of the photometric models.
//!
//! Build it with the fluent [`EngineConfigBuilder`], which validates every field:
//!
//! ```rust
//! use planetes::config::EngineConfig;
//!
//! let config = EngineConfig::builder()
//!     .refresh_interval_s(2.0)
//!     .refresh_jitter_s(0.0)
//!     .max_shadow_spheres(2)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_shadow_spheres, 2);
//! ```
use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{constants::SECONDS_PER_DAY, planetes_errors::PlanetesError};

/// Tunable parameters of the ephemeris engine.
///
/// Units
/// -----
/// * `refresh_interval_s`, `refresh_jitter_s`: seconds
/// * `moon_velocity_step_days`: days
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base validity window of a cached heliocentric state.
    pub refresh_interval_s: f64,
    /// Upper bound of the random spread added to each body's window, so that all
    /// bodies do not expire on the same frame.
    pub refresh_jitter_s: f64,
    /// Seed of the generator drawing the per-body jitter.
    pub rng_seed: u64,
    /// Default number of occluders kept by the shadow-candidate search.
    pub max_shadow_spheres: usize,
    /// Smallest eclipse factor used in the solar magnitude (avoids `log10(0)`).
    pub eclipse_factor_floor: f64,
    /// Finite-difference step of the lunar velocity.
    pub moon_velocity_step_days: f64,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`EngineConfigBuilder`] initialized with the defaults.
    ///
    /// # See also
    /// * [`EngineConfigBuilder::build`] – validation rules.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Draw one refresh window per body, in days.
    ///
    /// Each window is `refresh_interval_s + U[0, 1)·refresh_jitter_s` seconds, with
    /// the uniform deviates taken from a generator seeded with `rng_seed`, so the
    /// same configuration always yields the same windows.
    pub fn draw_refresh_windows(&self, count: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(self.rng_seed);
        (0..count)
            .map(|_| {
                let jitter: f64 = rng.random();
                (self.refresh_interval_s + jitter * self.refresh_jitter_s) / SECONDS_PER_DAY
            })
            .collect()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            refresh_interval_s: 1.0,
            refresh_jitter_s: 1.0,
            rng_seed: 0x5EED,
            max_shadow_spheres: 4,
            eclipse_factor_floor: 0.000128,
            moon_velocity_step_days: 1.0,
        }
    }
}

/// Builder for [`EngineConfig`], with validation.
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    params: EngineConfig,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            params: EngineConfig::default(),
        }
    }

    pub fn refresh_interval_s(mut self, v: f64) -> Self {
        self.params.refresh_interval_s = v;
        self
    }
    pub fn refresh_jitter_s(mut self, v: f64) -> Self {
        self.params.refresh_jitter_s = v;
        self
    }
    pub fn rng_seed(mut self, v: u64) -> Self {
        self.params.rng_seed = v;
        self
    }
    pub fn max_shadow_spheres(mut self, v: usize) -> Self {
        self.params.max_shadow_spheres = v;
        self
    }
    pub fn eclipse_factor_floor(mut self, v: f64) -> Self {
        self.params.eclipse_factor_floor = v;
        self
    }
    pub fn moon_velocity_step_days(mut self, v: f64) -> Self {
        self.params.moon_velocity_step_days = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Return true iff a <= b and comparable (i.e., not NaN).
    #[inline]
    fn le(a: f64, b: f64) -> bool {
        matches!(a.partial_cmp(&b), Some(Less) | Some(Equal))
    }

    /// Finalize the builder and produce an [`EngineConfig`].
    ///
    /// Validation
    /// ----------
    /// * `refresh_interval_s`, `refresh_jitter_s` ≥ 0 and finite,
    /// * `0 < eclipse_factor_floor ≤ 1`,
    /// * `max_shadow_spheres` ≥ 1,
    /// * `moon_velocity_step_days` > 0.
    ///
    /// Errors
    /// ------
    /// * [`PlanetesError::InvalidEngineParameter`] naming the offending field.
    pub fn build(self) -> Result<EngineConfig, PlanetesError> {
        let p = &self.params;

        if !Self::ge0(p.refresh_interval_s) || !p.refresh_interval_s.is_finite() {
            return Err(PlanetesError::InvalidEngineParameter(
                "refresh_interval_s must be finite and >= 0".into(),
            ));
        }
        if !Self::ge0(p.refresh_jitter_s) || !p.refresh_jitter_s.is_finite() {
            return Err(PlanetesError::InvalidEngineParameter(
                "refresh_jitter_s must be finite and >= 0".into(),
            ));
        }
        if !(Self::gt0(p.eclipse_factor_floor) && Self::le(p.eclipse_factor_floor, 1.0)) {
            return Err(PlanetesError::InvalidEngineParameter(
                "require 0 < eclipse_factor_floor <= 1".into(),
            ));
        }
        if p.max_shadow_spheres == 0 {
            return Err(PlanetesError::InvalidEngineParameter(
                "max_shadow_spheres must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.moon_velocity_step_days) {
            return Err(PlanetesError::InvalidEngineParameter(
                "moon_velocity_step_days must be > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 44;
            writeln!(f, "Ephemeris Engine Parameters")?;
            writeln!(f, "---------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Heliocentric cache]")?;
            line!(
                "refresh_interval_s      = {:.3} s",
                self.refresh_interval_s,
                "Base cache validity window"
            )?;
            line!(
                "refresh_jitter_s        = {:.3} s",
                self.refresh_jitter_s,
                "Random spread added per body"
            )?;
            line!("rng_seed                = {}", self.rng_seed, "Jitter generator seed")?;

            writeln!(f, "\n[Shadows / photometry]")?;
            line!(
                "max_shadow_spheres      = {}",
                self.max_shadow_spheres,
                "Occluders kept per body"
            )?;
            line!(
                "eclipse_factor_floor    = {:.1e}",
                self.eclipse_factor_floor,
                "Floor of the solar eclipse factor"
            )?;
            line!(
                "moon_velocity_step_days = {:.3} d",
                self.moon_velocity_step_days,
                "Lunar velocity finite-difference step"
            )?;

            Ok(())
        } else {
            write!(
                f,
                "EngineConfig(refresh={:.2}s+{:.2}s, seed={}, max_shadow_spheres={}, eclipse_floor={:.1e}, moon_step={:.2}d)",
                self.refresh_interval_s,
                self.refresh_jitter_s,
                self.rng_seed,
                self.max_shadow_spheres,
                self.eclipse_factor_floor,
                self.moon_velocity_step_days,
            )
        }
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let built = EngineConfig::builder().build().unwrap();
        assert_eq!(built, EngineConfig::default());
        assert_eq!(built.max_shadow_spheres, 4);
        assert_eq!(built.eclipse_factor_floor, 0.000128);
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(EngineConfig::builder().refresh_interval_s(-1.0).build().is_err());
        assert!(EngineConfig::builder().refresh_jitter_s(f64::NAN).build().is_err());
        assert!(EngineConfig::builder().eclipse_factor_floor(0.0).build().is_err());
        assert!(EngineConfig::builder().eclipse_factor_floor(1.5).build().is_err());
        assert!(EngineConfig::builder().max_shadow_spheres(0).build().is_err());
        assert!(matches!(
            EngineConfig::builder().moon_velocity_step_days(0.0).build(),
            Err(PlanetesError::InvalidEngineParameter(_))
        ));
    }

    #[test]
    fn test_refresh_windows() {
        let config = EngineConfig::default();
        let windows = config.draw_refresh_windows(32);
        assert_eq!(windows.len(), 32);
        for w in &windows {
            assert!(*w >= 1.0 / SECONDS_PER_DAY && *w < 2.0 / SECONDS_PER_DAY);
        }
        assert_eq!(windows, config.draw_refresh_windows(32));

        let fixed = EngineConfig::builder().refresh_jitter_s(0.0).build().unwrap();
        assert!(fixed
            .draw_refresh_windows(3)
            .iter()
            .all(|w| *w == 1.0 / SECONDS_PER_DAY));
    }

    #[test]
    fn test_display() {
        let config = EngineConfig::default();
        assert!(config.to_string().starts_with("EngineConfig("));
        let table = format!("{config:#}");
        assert!(table.contains("max_shadow_spheres"));
        assert!(table.contains("[Heliocentric cache]"));
    }
}
