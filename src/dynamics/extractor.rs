use crate::dynamics::history::EnergyHistory;
use crate::dynamics::types::{Dynamics, DynamicsConfig};
use crate::error::{InvalidInputError, Result};

/// Stateful transformer from frequency frames to [`Dynamics`].
///
/// Keeps the previous frame (for `change`) and a rolling window of recent
/// energy values (for peak detection). Each call to
/// [`compute_dynamics`](Self::compute_dynamics) advances both exactly once.
#[derive(Debug, Clone)]
pub struct DynamicsExtractor {
    config: DynamicsConfig,
    history: EnergyHistory,
    previous: Vec<f64>,
}

impl DynamicsExtractor {
    /// Create an extractor with the reference tuning for `frame_length` bins
    pub fn with_frame_length(frame_length: usize) -> Result<Self> {
        Self::new(DynamicsConfig::with_frame_length(frame_length))
    }

    /// Create an extractor with custom configuration
    pub fn new(config: DynamicsConfig) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            "Dynamics extractor: {} bins, max magnitude {}, history {}",
            config.frame_length,
            config.max_magnitude,
            config.history_capacity
        );

        Ok(Self {
            history: EnergyHistory::new(config.history_capacity)?,
            previous: vec![0.0; config.frame_length],
            config,
        })
    }

    /// Derive the dynamics of one frame and advance the rolling state.
    ///
    /// The frame is fully validated before any state changes, so a rejected
    /// frame leaves the extractor exactly as it was.
    pub fn compute_dynamics(&mut self, frame: &[f64]) -> Result<Dynamics> {
        self.validate_frame(frame)?;

        let len = frame.len() as f64;
        let max = self.config.max_magnitude;

        // Every term is scaled into [0, 1] before summing so that large
        // magnitude ranges cannot overflow the accumulators
        let level = frame.iter().map(|&x| x / max).sum::<f64>() / len;
        let spread = frame
            .iter()
            .map(|&x| {
                let deviation = x / max - level;
                deviation * deviation
            })
            .sum::<f64>()
            / len;
        let change = frame
            .iter()
            .zip(self.previous.iter())
            .map(|(&curr, &prev)| (curr - prev).abs() / max)
            .sum::<f64>()
            / len;

        self.previous.copy_from_slice(frame);

        let energy = level.powf(self.config.energy_exponent);
        self.history.push(energy);

        let current_energy = self.history.latest();
        let average_energy = self.history.mean();
        let is_peak = current_energy > average_energy * self.config.peak_ratio
            && current_energy > self.config.peak_floor;

        let dynamics = Dynamics {
            intensity: energy * self.config.intensity_boost,
            variance: spread.powf(self.config.variance_exponent),
            change: change.powf(self.config.change_exponent),
            is_peak,
        };

        if is_peak {
            tracing::debug!(
                "Peak: energy {:.3} vs rolling mean {:.3}",
                current_energy,
                average_energy
            );
        }
        tracing::trace!(?dynamics, "dynamics computed");

        Ok(dynamics)
    }

    /// Byte-spectrum entry point (0-255 bins, as analysers usually deliver)
    pub fn compute_dynamics_bytes(&mut self, frame: &[u8]) -> Result<Dynamics> {
        let samples: Vec<f64> = frame.iter().map(|&b| f64::from(b)).collect();
        self.compute_dynamics(&samples)
    }

    /// Forget all history, as if freshly constructed
    pub fn reset(&mut self) {
        self.history.clear();
        self.previous.iter_mut().for_each(|v| *v = 0.0);
    }

    pub fn config(&self) -> &DynamicsConfig {
        &self.config
    }

    pub fn frame_length(&self) -> usize {
        self.config.frame_length
    }

    /// Rolling energy window
    pub fn history(&self) -> &EnergyHistory {
        &self.history
    }

    /// Copy of the last accepted frame (zeros before the first call)
    pub fn previous_frame(&self) -> &[f64] {
        &self.previous
    }

    fn validate_frame(&self, frame: &[f64]) -> Result<()> {
        if frame.len() != self.config.frame_length {
            return Err(InvalidInputError::FrameLength {
                expected: self.config.frame_length,
                actual: frame.len(),
            }
            .into());
        }

        let max = self.config.max_magnitude;
        if let Some((index, &value)) = frame
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=max).contains(*v))
        {
            return Err(InvalidInputError::SampleOutOfRange { index, value, max }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisualizerError;

    fn extractor(frame_length: usize) -> DynamicsExtractor {
        DynamicsExtractor::with_frame_length(frame_length).unwrap()
    }

    #[test]
    fn test_silence_is_neutral() {
        let mut ex = extractor(4);
        let dynamics = ex.compute_dynamics(&[0.0; 4]).unwrap();

        assert_eq!(
            dynamics,
            Dynamics {
                intensity: 0.0,
                variance: 0.0,
                change: 0.0,
                is_peak: false,
            }
        );
    }

    #[test]
    fn test_full_scale_first_frame() {
        let mut ex = extractor(4);
        let dynamics = ex.compute_dynamics(&[255.0; 4]).unwrap();

        assert_eq!(dynamics.intensity, 1.1);
        assert_eq!(dynamics.variance, 0.0);
        assert_eq!(dynamics.change, 1.0);
        assert!(dynamics.is_peak);
    }

    #[test]
    fn test_change_tracks_previous_frame() {
        let mut ex = extractor(4);
        ex.compute_dynamics(&[10.0; 4]).unwrap();
        let dynamics = ex.compute_dynamics(&[200.0; 4]).unwrap();

        assert!((dynamics.change - (190.0f64 / 255.0).powf(0.45)).abs() < 1e-12);
        // Flat frames have no internal spread, so the delta must come from tracking
        assert!(dynamics.variance < 1e-9);
    }

    #[test]
    fn test_first_call_change_is_mean_magnitude() {
        let mut ex = extractor(4);
        let frame = [0.0, 50.0, 100.0, 250.0];
        let dynamics = ex.compute_dynamics(&frame).unwrap();

        let mean_abs = 400.0 / 4.0;
        assert!((dynamics.change - (mean_abs / 255.0f64).powf(0.45)).abs() < 1e-12);
    }

    #[test]
    fn test_population_variance() {
        let mut ex = extractor(4);
        let dynamics = ex.compute_dynamics(&[0.0, 0.0, 255.0, 255.0]).unwrap();

        // mean 127.5, every deviation 127.5, so variance / 255^2 = 0.25
        let expected = 0.25f64.powf(0.63);
        assert!((dynamics.variance - expected).abs() < 1e-12);
    }

    #[test]
    fn test_peak_after_quiet_run() {
        let mut ex = extractor(4);
        for _ in 0..10 {
            let dynamics = ex.compute_dynamics(&[50.0; 4]).unwrap();
            assert!(!dynamics.is_peak, "quiet frames stay under the floor");
        }

        let dynamics = ex.compute_dynamics(&[255.0; 4]).unwrap();
        assert!(dynamics.is_peak);
    }

    #[test]
    fn test_sustained_loudness_stops_peaking() {
        let mut ex = extractor(4);
        let flags: Vec<bool> = (0..10)
            .map(|_| ex.compute_dynamics(&[255.0; 4]).unwrap().is_peak)
            .collect();

        // Rolling mean after k loud frames is k/10; the ratio test fails from k = 8
        assert_eq!(&flags[..7], &[true; 7]);
        assert_eq!(&flags[7..], &[false; 3]);
    }

    #[test]
    fn test_relative_jump_below_floor_is_not_peak() {
        let mut ex = extractor(4);
        ex.compute_dynamics(&[0.0; 4]).unwrap();
        // energy ~0.37: far above the rolling mean but under the 0.54 floor
        let dynamics = ex.compute_dynamics(&[125.0; 4]).unwrap();
        assert!(!dynamics.is_peak);
    }

    #[test]
    fn test_history_stays_at_capacity() {
        let mut ex = extractor(4);
        assert_eq!(ex.history().len(), 10);
        for i in 0..25 {
            ex.compute_dynamics(&[(i * 10) as f64; 4]).unwrap();
            assert_eq!(ex.history().len(), 10);
        }
    }

    #[test]
    fn test_wrong_length_rejected_without_side_effects() {
        let mut ex = extractor(4);
        ex.compute_dynamics(&[20.0; 4]).unwrap();
        let history_before: Vec<f64> = ex.history().iter().collect();

        let err = ex.compute_dynamics(&[20.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            VisualizerError::InvalidInput(InvalidInputError::FrameLength { expected: 4, actual: 3 })
        ));
        assert_eq!(ex.history().iter().collect::<Vec<_>>(), history_before);
        assert_eq!(ex.previous_frame(), &[20.0; 4]);
    }

    #[test]
    fn test_out_of_range_samples_rejected() {
        let mut ex = extractor(4);

        for bad in [-1.0, 256.0, f64::NAN, f64::INFINITY] {
            let err = ex.compute_dynamics(&[0.0, bad, 0.0, 0.0]).unwrap_err();
            match err {
                VisualizerError::InvalidInput(InvalidInputError::SampleOutOfRange { index, .. }) => {
                    assert_eq!(index, 1)
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(ex.previous_frame(), &[0.0; 4]);
    }

    #[test]
    fn test_byte_frames_match_float_frames() {
        let mut bytes = extractor(4);
        let mut floats = extractor(4);

        for frame in [[12u8, 200, 7, 99], [255, 0, 128, 64]] {
            let as_f64 = frame.map(f64::from);
            assert_eq!(
                bytes.compute_dynamics_bytes(&frame).unwrap(),
                floats.compute_dynamics(&as_f64).unwrap()
            );
        }
    }

    #[test]
    fn test_reset_matches_fresh_extractor() {
        let frames = [[30.0; 4], [240.0, 10.0, 240.0, 10.0], [90.0; 4]];

        let mut used = extractor(4);
        for frame in &frames {
            used.compute_dynamics(frame).unwrap();
        }
        used.reset();

        let mut fresh = extractor(4);
        for frame in &frames {
            assert_eq!(
                used.compute_dynamics(frame).unwrap(),
                fresh.compute_dynamics(frame).unwrap()
            );
        }
    }

    #[test]
    fn test_custom_tuning() {
        let config = DynamicsConfig {
            frame_length: 2,
            max_magnitude: 1.0,
            intensity_boost: 2.0,
            energy_exponent: 1.0,
            ..Default::default()
        };
        let mut ex = DynamicsExtractor::new(config).unwrap();
        let dynamics = ex.compute_dynamics(&[0.5, 0.5]).unwrap();
        assert_eq!(dynamics.intensity, 1.0);
    }

    #[test]
    fn test_huge_magnitude_range_stays_finite() {
        let config = DynamicsConfig {
            frame_length: 4,
            max_magnitude: f64::MAX,
            ..Default::default()
        };
        let mut ex = DynamicsExtractor::new(config).unwrap();

        let dynamics = ex.compute_dynamics(&[f64::MAX; 4]).unwrap();
        assert_eq!(dynamics.intensity, 1.1);
        assert_eq!(dynamics.variance, 0.0);
        assert_eq!(dynamics.change, 1.0);
        assert!(dynamics.is_peak);

        let dynamics = ex.compute_dynamics(&[0.0, f64::MAX, 0.0, f64::MAX]).unwrap();
        assert!(dynamics.intensity.is_finite());
        assert!((dynamics.variance - 0.25f64.powf(0.63)).abs() < 1e-12);
        assert!((dynamics.change - 0.5f64.powf(0.45)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = DynamicsExtractor::new(DynamicsConfig {
            history_capacity: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(VisualizerError::Config(_))));
    }
}
