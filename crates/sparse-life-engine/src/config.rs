//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the builder-input for a [`Controller`](crate::Controller).
//! [`validate()`](SimulationConfig::validate) checks structural invariants
//! up front so that nothing downstream has to.

use serde::{Deserialize, Serialize};
use sparse_life_core::PatternError;
use sparse_life_space::{BoundaryPolicy, SpaceError};
use thiserror::Error;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulationConfig::validate()`] or when
/// applying a configuration to a running controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The boundary policy has an invalid extent.
    #[error("boundary: {0}")]
    Space(#[from] SpaceError),
    /// `generations_per_second` is NaN, infinite, zero, or negative.
    #[error("generations_per_second must be finite and positive, got {value}")]
    InvalidGenerationRate {
        /// The invalid value.
        value: f64,
    },
    /// The stability window must hold at least one sample.
    #[error("stability_window must be at least 1")]
    StabilityWindowZero,
    /// The registered initial pattern does not fit the new boundary.
    #[error("initial pattern: {0}")]
    InitialPattern(#[from] PatternError),
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for a simulation controller.
///
/// Every field has a default, so a partial JSON or TOML document
/// deserializes into a usable config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Edge handling and grid extent. Default: 100x100 clipped.
    pub boundary: BoundaryPolicy,
    /// Target autonomous stepping rate. Default: 60.
    pub generations_per_second: f64,
    /// Number of population samples that must agree before the board is
    /// considered stable. Default: 10.
    pub stability_window: usize,
    /// Pause autonomous stepping once the board is stable. Default: true.
    pub auto_pause_on_stable: bool,
    /// Run the population-period detector after each step. Default: false.
    pub period_detection: bool,
    /// Pause autonomous stepping at this generation. Default: none.
    pub max_generations: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryPolicy::Clip {
                width: 100,
                height: 100,
            },
            generations_per_second: 60.0,
            stability_window: 10,
            auto_pause_on_stable: true,
            period_detection: false,
            max_generations: None,
        }
    }
}

impl SimulationConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Boundary extent.
        self.boundary.validate()?;
        // 2. Rate must be finite and positive, and so must its reciprocal
        //    (subnormals give an infinite interval).
        validate_rate(self.generations_per_second)?;
        // 3. Stability needs at least one sample.
        if self.stability_window == 0 {
            return Err(ConfigError::StabilityWindowZero);
        }
        Ok(())
    }
}

pub(crate) fn validate_rate(gps: f64) -> Result<(), ConfigError> {
    if !gps.is_finite() || gps <= 0.0 || !(1.0 / gps).is_finite() {
        return Err(ConfigError::InvalidGenerationRate { value: gps });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.boundary.extent(), Some((100, 100)));
        assert_eq!(config.stability_window, 10);
        assert!(config.auto_pause_on_stable);
        assert!(!config.period_detection);
    }

    #[test]
    fn rejects_bad_rates() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-310] {
            let config = SimulationConfig {
                generations_per_second: value,
                ..SimulationConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidGenerationRate { .. })),
                "{value} accepted"
            );
        }
    }

    #[test]
    fn rejects_zero_window() {
        let config = SimulationConfig {
            stability_window: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::StabilityWindowZero));
    }

    #[test]
    fn rejects_narrow_torus() {
        let config = SimulationConfig {
            boundary: BoundaryPolicy::Wrap {
                width: 2,
                height: 50,
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Space(SpaceError::WrapTooSmall { .. }))
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{"boundary":{"kind":"wrap","width":40,"height":30},"period_detection":true}"#,
        )
        .unwrap();
        assert_eq!(
            config.boundary,
            BoundaryPolicy::Wrap {
                width: 40,
                height: 30
            }
        );
        assert!(config.period_detection);
        assert_eq!(config.generations_per_second, 60.0);
        assert_eq!(config.max_generations, None);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::InvalidGenerationRate { value: -2.0 }.to_string(),
            "generations_per_second must be finite and positive, got -2"
        );
        assert_eq!(
            ConfigError::from(SpaceError::EmptySpace).to_string(),
            "boundary: space must have at least one cell"
        );
    }
}
