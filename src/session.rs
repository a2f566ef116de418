use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    dynamics::DynamicsExtractor,
    error::{ConfigError, Result, SourceError},
    motion::MotionState,
    render::{Renderer, TickReport},
    source::FrequencySource,
};

/// Driving-loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ticks per second; 0 runs unpaced
    pub fps: f64,

    /// Value of every bin in the frame used when the source has no signal
    pub filler_magnitude: f64,

    /// Skip ticks whose frame is rejected instead of stopping the session
    pub skip_invalid: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            filler_magnitude: 50.0,
            skip_invalid: false,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self, max_magnitude: f64) -> std::result::Result<(), ConfigError> {
        if !self.fps.is_finite() || self.fps < 0.0 || (self.fps > 0.0 && self.tick_period().is_none()) {
            return Err(ConfigError::InvalidValue {
                key: "session.fps".to_string(),
                value: self.fps.to_string(),
            });
        }

        if !(0.0..=max_magnitude).contains(&self.filler_magnitude) {
            return Err(ConfigError::InvalidValue {
                key: "session.filler_magnitude".to_string(),
                value: self.filler_magnitude.to_string(),
            });
        }

        Ok(())
    }

    /// Time between paced ticks; `None` when unpaced or when the rate is too
    /// small for its period to fit in a `Duration`
    pub fn tick_period(&self) -> Option<Duration> {
        if self.fps <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / self.fps)
            .ok()
            .map(|period| period.max(Duration::from_nanos(1)))
    }
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub peaks: u64,
    pub filler_ticks: u64,
    pub skipped: u64,
}

/// One visualization session: source → extractor → motion → renderer.
///
/// Every tick pulls at most one frame, computes its dynamics exactly once and
/// hands the same snapshot to the motion state and the renderer.
pub struct Session {
    config: SessionConfig,
    source: Box<dyn FrequencySource>,
    extractor: DynamicsExtractor,
    motion: MotionState,
    filler: Vec<f64>,
    ticks: u64,
}

impl Session {
    /// Create a session; the source must deliver frames of the configured length
    pub fn new(config: &Config, source: Box<dyn FrequencySource>) -> Result<Self> {
        config.validate()?;

        let extractor = DynamicsExtractor::new(config.dynamics.clone())?;
        if source.frame_length() != extractor.frame_length() {
            return Err(SourceError::LengthMismatch {
                expected: extractor.frame_length(),
                actual: source.frame_length(),
            }
            .into());
        }

        info!(
            "Session: source '{}', {} bins, {} fps",
            source.name(),
            extractor.frame_length(),
            config.session.fps
        );

        Ok(Self {
            filler: vec![config.session.filler_magnitude; extractor.frame_length()],
            config: config.session.clone(),
            motion: MotionState::new(config.motion.clone()),
            source,
            extractor,
            ticks: 0,
        })
    }

    /// Advance one tick without rendering
    pub fn tick(&mut self) -> Result<TickReport> {
        let tick = self.ticks;
        self.ticks += 1;

        let (dynamics, filler) = match self.source.next_frame() {
            Some(frame) => (self.extractor.compute_dynamics(&frame)?, false),
            None => (self.extractor.compute_dynamics(&self.filler)?, true),
        };

        let motion = self.motion.advance(&dynamics);

        Ok(TickReport {
            tick,
            filler,
            dynamics,
            motion,
        })
    }

    /// Drive the session until the source runs dry or `max_ticks` is reached.
    ///
    /// With `fps > 0` ticks are paced by a tokio interval; late ticks are
    /// skipped rather than bunched up.
    pub async fn run<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        max_ticks: Option<u64>,
    ) -> Result<SessionSummary> {
        let mut interval = self.config.tick_period().map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        let mut summary = SessionSummary::default();

        loop {
            if max_ticks.is_some_and(|max| summary.ticks + summary.skipped >= max) {
                debug!("Reached tick limit");
                break;
            }
            if self.source.is_exhausted() {
                debug!("Source '{}' exhausted", self.source.name());
                break;
            }

            if let Some(interval) = interval.as_mut() {
                interval.tick().await;
            }

            let report = match self.tick() {
                Ok(report) => report,
                Err(e) if self.config.skip_invalid && e.is_recoverable() => {
                    warn!("Skipping tick {}: {}", self.ticks - 1, e);
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            renderer.render(&report)?;

            summary.ticks += 1;
            if report.dynamics.is_peak {
                summary.peaks += 1;
            }
            if report.filler {
                summary.filler_ticks += 1;
            }
        }

        renderer.finish()?;
        info!(
            "Session finished: {} ticks, {} peaks, {} filler, {} skipped",
            summary.ticks, summary.peaks, summary.filler_ticks, summary.skipped
        );
        Ok(summary)
    }

    pub fn extractor(&self) -> &DynamicsExtractor {
        &self.extractor
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Ticks attempted so far, including skipped ones
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
