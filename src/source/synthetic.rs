use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};
use crate::source::FrequencySource;

/// A source with no active audio. Every tick falls back to the filler frame.
#[derive(Debug, Clone)]
pub struct FillerSource {
    frame_length: usize,
}

impl FillerSource {
    pub fn new(frame_length: usize) -> Self {
        Self { frame_length }
    }
}

impl FrequencySource for FillerSource {
    fn name(&self) -> &str {
        "filler"
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    fn next_frame(&mut self) -> Option<Vec<f64>> {
        None
    }
}

/// Parameters for [`NoiseSource`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Centre level of every bin
    pub base_level: f64,

    /// Uniform jitter around the base level (+/-)
    pub spread: f64,

    /// Every n-th frame jumps close to full scale; 0 disables bursts
    pub burst_interval: u64,

    /// RNG seed; equal seeds give equal frame sequences
    pub seed: u64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            base_level: 60.0,
            spread: 30.0,
            burst_interval: 24,
            seed: 0x5EED,
        }
    }
}

/// Seeded pseudo-random spectra, handy for demos and benchmarks
#[derive(Debug, Clone)]
pub struct NoiseSource {
    frame_length: usize,
    max_magnitude: f64,
    params: NoiseParams,
    rng: SmallRng,
    emitted: u64,
}

impl NoiseSource {
    pub fn new(frame_length: usize, max_magnitude: f64, params: NoiseParams) -> Result<Self> {
        if frame_length == 0 {
            return Err(SourceError::InvalidParameters {
                details: "frame length must be non-zero".to_string(),
            }
            .into());
        }

        if !(0.0..=max_magnitude).contains(&params.base_level) {
            return Err(SourceError::InvalidParameters {
                details: format!(
                    "base level {} outside 0..={}",
                    params.base_level, max_magnitude
                ),
            }
            .into());
        }

        if !params.spread.is_finite() || params.spread < 0.0 {
            return Err(SourceError::InvalidParameters {
                details: format!("spread must be a non-negative number, got {}", params.spread),
            }
            .into());
        }

        Ok(Self {
            frame_length,
            max_magnitude,
            rng: SmallRng::seed_from_u64(params.seed),
            params,
            emitted: 0,
        })
    }
}

impl FrequencySource for NoiseSource {
    fn name(&self) -> &str {
        "noise"
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    fn next_frame(&mut self) -> Option<Vec<f64>> {
        self.emitted += 1;
        let burst = self.params.burst_interval > 0 && self.emitted % self.params.burst_interval == 0;
        let level = if burst {
            self.max_magnitude * 0.95
        } else {
            self.params.base_level
        };

        let frame = (0..self.frame_length)
            .map(|_| {
                let jitter = if self.params.spread > 0.0 {
                    self.rng.gen_range(-self.params.spread..=self.params.spread)
                } else {
                    0.0
                };
                (level + jitter).clamp(0.0, self.max_magnitude)
            })
            .collect();

        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filler_never_yields() {
        let mut source = FillerSource::new(32);
        assert_eq!(source.frame_length(), 32);
        assert!(source.next_frame().is_none());
        assert!(!source.is_exhausted());
    }

    #[test]
    fn test_noise_is_seeded() {
        let params = NoiseParams::default();
        let mut a = NoiseSource::new(16, 255.0, params.clone()).unwrap();
        let mut b = NoiseSource::new(16, 255.0, params).unwrap();

        for _ in 0..5 {
            assert_eq!(a.next_frame(), b.next_frame());
        }
    }

    #[test]
    fn test_noise_stays_in_range() {
        let params = NoiseParams {
            base_level: 250.0,
            spread: 40.0,
            ..Default::default()
        };
        let mut source = NoiseSource::new(8, 255.0, params).unwrap();

        for _ in 0..50 {
            let frame = source.next_frame().unwrap();
            assert_eq!(frame.len(), 8);
            assert!(frame.iter().all(|&v| (0.0..=255.0).contains(&v)));
        }
    }

    #[test]
    fn test_bursts_hit_near_full_scale() {
        let params = NoiseParams {
            base_level: 20.0,
            spread: 0.0,
            burst_interval: 3,
            seed: 1,
        };
        let mut source = NoiseSource::new(2, 255.0, params).unwrap();

        let levels: Vec<f64> = (0..6).map(|_| source.next_frame().unwrap()[0]).collect();
        let burst = 255.0 * 0.95;
        assert_eq!(levels, vec![20.0, 20.0, burst, 20.0, 20.0, burst]);
    }

    #[test]
    fn test_invalid_noise_params() {
        let params = NoiseParams {
            base_level: 300.0,
            ..Default::default()
        };
        assert!(NoiseSource::new(8, 255.0, params).is_err());
        assert!(NoiseSource::new(0, 255.0, NoiseParams::default()).is_err());
    }
}
