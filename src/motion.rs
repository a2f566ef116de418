//! Consumer-side motion state.
//!
//! The extractor only reports how the music behaves; this module turns those
//! reports into the slowly accumulating animation state the scene is drawn
//! from (ring rotation, pulse, hue, animation clock). Extra shaping such as
//! the `intensity^1.5` effect lives here, never in the extractor.

use serde::{Deserialize, Serialize};

use crate::dynamics::Dynamics;
use crate::error::ConfigError;

/// Rates that map dynamics onto motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Ring rotation per tick at zero intensity (radians)
    pub rotation_rate: f64,

    /// How strongly intensity speeds up rotation
    pub rotation_intensity_gain: f64,

    /// Extra rotation on a peak tick (radians)
    pub peak_rotation_kick: f64,

    /// Pulse phase advance per tick at zero intensity
    pub pulse_rate: f64,

    /// Animation clock advance per tick at zero intensity
    pub time_rate: f64,

    /// How strongly intensity speeds up the animation clock
    pub time_intensity_gain: f64,

    /// Amplitude of the resting ring pulse
    pub pulse_swing: f64,

    /// Ring growth per unit of intensity
    pub pulse_intensity_gain: f64,

    /// Amplitude of the extra wobble on peak ticks
    pub peak_pulse_swing: f64,

    /// Angular frequency of the peak wobble against the animation clock
    pub peak_pulse_frequency: f64,

    /// Background fade alpha at zero change
    pub fade_base: f64,

    /// Background fade added per unit of change
    pub fade_change_gain: f64,

    /// Hue drift per tick in degrees at zero change
    pub hue_drift: f64,

    /// How strongly change speeds up the hue drift
    pub hue_change_gain: f64,

    /// Exponent of the background intensity effect
    pub intensity_effect_exponent: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            rotation_rate: 0.011,
            rotation_intensity_gain: 2.2,
            peak_rotation_kick: 0.055,
            pulse_rate: 0.033,
            time_rate: 0.011,
            time_intensity_gain: 1.1,
            pulse_swing: 0.22,
            pulse_intensity_gain: 0.44,
            peak_pulse_swing: 0.22,
            peak_pulse_frequency: 8.8,
            fade_base: 0.3,
            fade_change_gain: 0.2,
            hue_drift: 0.55,
            hue_change_gain: 2.2,
            intensity_effect_exponent: 1.5,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("motion.rotation_rate", self.rotation_rate),
            ("motion.rotation_intensity_gain", self.rotation_intensity_gain),
            ("motion.peak_rotation_kick", self.peak_rotation_kick),
            ("motion.pulse_rate", self.pulse_rate),
            ("motion.time_rate", self.time_rate),
            ("motion.time_intensity_gain", self.time_intensity_gain),
            ("motion.pulse_swing", self.pulse_swing),
            ("motion.pulse_intensity_gain", self.pulse_intensity_gain),
            ("motion.peak_pulse_swing", self.peak_pulse_swing),
            ("motion.peak_pulse_frequency", self.peak_pulse_frequency),
            ("motion.fade_base", self.fade_base),
            ("motion.fade_change_gain", self.fade_change_gain),
            ("motion.hue_drift", self.hue_drift),
            ("motion.hue_change_gain", self.hue_change_gain),
            ("motion.intensity_effect_exponent", self.intensity_effect_exponent),
        ];

        for (key, value) in rates {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Snapshot of the scene parameters after one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MotionFrame {
    /// Global rotation of the character ring (radians)
    pub ring_rotation: f64,

    /// Radius multiplier of the ring (1.0 = resting size)
    pub ring_pulse: f64,

    /// Hue offset in degrees, 0..360
    pub hue: f64,

    /// Animation clock
    pub time: f64,

    /// Extra-convex intensity for background layers
    pub intensity_effect: f64,

    /// Alpha of the fade applied to the previous frame
    pub background_fade: f64,
}

/// Accumulated animation state driven by [`Dynamics`]
#[derive(Debug, Clone, Default)]
pub struct MotionState {
    config: MotionConfig,
    ring_rotation: f64,
    pulse_phase: f64,
    time: f64,
    hue: f64,
}

impl MotionState {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance one tick
    pub fn advance(&mut self, dynamics: &Dynamics) -> MotionFrame {
        let c = &self.config;
        let intensity = dynamics.intensity;

        self.ring_rotation += c.rotation_rate * (1.0 + intensity * c.rotation_intensity_gain);
        self.pulse_phase += c.pulse_rate * (1.0 + intensity);
        if dynamics.is_peak {
            self.ring_rotation += c.peak_rotation_kick;
        }

        let base_pulse = self.pulse_phase.sin() * c.pulse_swing;
        let dynamic_pulse = intensity * c.pulse_intensity_gain;
        let peak_pulse = if dynamics.is_peak {
            (self.time * c.peak_pulse_frequency).sin() * c.peak_pulse_swing
        } else {
            0.0
        };

        let frame = MotionFrame {
            ring_rotation: self.ring_rotation,
            ring_pulse: 1.0 + base_pulse + dynamic_pulse + peak_pulse,
            hue: self.hue,
            time: self.time,
            intensity_effect: intensity.powf(c.intensity_effect_exponent),
            background_fade: c.fade_base + dynamics.change * c.fade_change_gain,
        };

        // Clock and colour move after drawing, ready for the next tick
        self.time += c.time_rate * (1.0 + intensity * c.time_intensity_gain);
        self.hue = (self.hue + c.hue_drift + dynamics.change * c.hue_change_gain) % 360.0;

        frame
    }

    pub fn ring_rotation(&self) -> f64 {
        self.ring_rotation
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}
