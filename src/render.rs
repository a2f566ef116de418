//! Renderer collaborators.
//!
//! A renderer receives one read-only [`TickReport`] per tick. Drawing is up
//! to the implementation; the crate ships a tracing logger and a JSON-lines
//! writer so sessions can be inspected or piped into other tools.

use std::io::Write;

use serde::Serialize;

use crate::dynamics::Dynamics;
use crate::error::{RenderError, Result};
use crate::motion::MotionFrame;

/// Everything a renderer gets for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    /// Zero-based tick counter
    pub tick: u64,

    /// True when the source had no signal and the filler frame was used
    pub filler: bool,

    pub dynamics: Dynamics,

    pub motion: MotionFrame,
}

/// Consumer of per-tick reports
pub trait Renderer {
    /// Draw (or record) one tick
    fn render(&mut self, report: &TickReport) -> Result<()>;

    /// Called once after the last tick
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Logs every tick through `tracing`
#[derive(Debug, Default)]
pub struct TraceRenderer {
    ticks: u64,
    peaks: u64,
}

impl TraceRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peaks(&self) -> u64 {
        self.peaks
    }
}

impl Renderer for TraceRenderer {
    fn render(&mut self, report: &TickReport) -> Result<()> {
        self.ticks += 1;
        let d = &report.dynamics;

        if d.is_peak {
            self.peaks += 1;
            tracing::info!(
                "tick {:>5}  PEAK  intensity {:.3}  variance {:.3}  change {:.3}  rotation {:.2}",
                report.tick,
                d.intensity,
                d.variance,
                d.change,
                report.motion.ring_rotation
            );
        } else {
            tracing::debug!(
                "tick {:>5}        intensity {:.3}  variance {:.3}  change {:.3}  pulse {:.3}",
                report.tick,
                d.intensity,
                d.variance,
                d.change,
                report.motion.ring_pulse
            );
        }

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        tracing::info!("Rendered {} ticks, {} peaks", self.ticks, self.peaks);
        Ok(())
    }
}

/// Writes one JSON object per tick
pub struct JsonLinesRenderer<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, report: &TickReport) -> Result<()> {
        let line = serde_json::to_string(report).map_err(|e| RenderError::EncodeFailed {
            tick: report.tick,
            reason: e.to_string(),
        })?;

        writeln!(self.writer, "{}", line).map_err(|e| RenderError::WriteFailed {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| RenderError::WriteFailed {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(tick: u64, is_peak: bool) -> TickReport {
        TickReport {
            tick,
            filler: false,
            dynamics: Dynamics {
                intensity: 0.5,
                variance: 0.25,
                change: 0.125,
                is_peak,
            },
            motion: MotionFrame::default(),
        }
    }

    #[test]
    fn test_json_lines() {
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        renderer.render(&report(0, false)).unwrap();
        renderer.render(&report(1, true)).unwrap();
        renderer.finish().unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["tick"], 1);
        assert_eq!(second["dynamics"]["is_peak"], true);
        assert_eq!(second["dynamics"]["intensity"], 0.5);
    }

    #[test]
    fn test_trace_renderer_counts_peaks() {
        let mut renderer = TraceRenderer::new();
        for tick in 0..4 {
            renderer.render(&report(tick, tick % 2 == 0)).unwrap();
        }
        assert_eq!(renderer.peaks(), 2);
        assert!(renderer.finish().is_ok());
    }
}
