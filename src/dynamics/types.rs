use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Reactive parameters derived from one frequency frame.
///
/// A plain `Copy` snapshot: every consumer gets its own value, and the
/// extractor is free to move on to the next frame as soon as it is returned.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dynamics {
    /// Power-law loudness, boosted (0.0 for silence, `intensity_boost` at full scale)
    pub intensity: f64,

    /// Concave-shaped spread of the bins around their mean
    pub variance: f64,

    /// Concave-shaped mean absolute difference from the previous frame
    pub change: f64,

    /// Onset flag: energy jumped above the rolling average and the floor
    pub is_peak: bool,
}

/// Tunable constants for dynamics extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Number of magnitude bins per frame
    pub frame_length: usize,

    /// Largest allowed magnitude sample (255 for byte spectra)
    pub max_magnitude: f64,

    /// Number of energy values in the rolling window
    pub history_capacity: usize,

    /// Exponent applied to normalized average magnitude (convex, > 1)
    pub energy_exponent: f64,

    /// Current energy must exceed the rolling mean times this ratio to peak
    pub peak_ratio: f64,

    /// Current energy must also exceed this absolute floor to peak
    pub peak_floor: f64,

    /// Multiplier turning energy into intensity
    pub intensity_boost: f64,

    /// Exponent applied to normalized variance (concave, < 1)
    pub variance_exponent: f64,

    /// Exponent applied to normalized frame-to-frame change (concave, < 1)
    pub change_exponent: f64,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            frame_length: 32, // frequency bins of a 64-point analyser
            max_magnitude: 255.0,
            history_capacity: 10,
            energy_exponent: 1.4,
            peak_ratio: 1.35,
            peak_floor: 0.54,
            intensity_boost: 1.1,
            variance_exponent: 0.63,
            change_exponent: 0.45,
        }
    }
}

impl DynamicsConfig {
    /// The tuning the visualizer ships with
    pub fn reference() -> Self {
        Self::default()
    }

    /// Reference tuning with a different bin count
    pub fn with_frame_length(frame_length: usize) -> Self {
        Self {
            frame_length,
            ..Default::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_length == 0 {
            return Err(invalid("dynamics.frame_length", self.frame_length));
        }

        if self.history_capacity == 0 {
            return Err(invalid("dynamics.history_capacity", self.history_capacity));
        }

        if !self.max_magnitude.is_finite() || self.max_magnitude <= 0.0 {
            return Err(invalid("dynamics.max_magnitude", self.max_magnitude));
        }

        let exponents = [
            ("dynamics.energy_exponent", self.energy_exponent),
            ("dynamics.variance_exponent", self.variance_exponent),
            ("dynamics.change_exponent", self.change_exponent),
        ];
        for (key, value) in exponents {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(key, value));
            }
        }

        let factors = [
            ("dynamics.peak_ratio", self.peak_ratio),
            ("dynamics.peak_floor", self.peak_floor),
            ("dynamics.intensity_boost", self.intensity_boost),
        ];
        for (key, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(key, value));
            }
        }

        Ok(())
    }
}

fn invalid<V: ToString>(key: &str, value: V) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
