use std::collections::VecDeque;
use std::path::Path;

use crate::error::{Result, SourceError};
use crate::source::FrequencySource;

/// Pre-computed magnitude frames read from a text file.
///
/// One frame per line, samples separated by commas and/or whitespace.
/// Blank lines are skipped and `#` starts a comment.
#[derive(Debug, Clone)]
pub struct FrameFileSource {
    frame_length: usize,
    frames: VecDeque<Vec<f64>>,
}

impl FrameFileSource {
    /// Load every frame from `path`
    pub async fn load<P: AsRef<Path>>(path: P, frame_length: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| SourceError::ReadFailed {
                path: path.display().to_string(),
            })?;

        let source = Self::parse(&content, frame_length)?;
        tracing::info!("Loaded {} frames from {}", source.remaining(), path.display());
        Ok(source)
    }

    /// Parse frames from in-memory text
    pub fn parse(content: &str, frame_length: usize) -> Result<Self> {
        let mut frames = VecDeque::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            let data = raw.split('#').next().unwrap_or("").trim();
            if data.is_empty() {
                continue;
            }

            let frame = data
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<f64>().map_err(|_| SourceError::Parse {
                        line,
                        reason: format!("'{}' is not a number", token),
                    })
                })
                .collect::<std::result::Result<Vec<f64>, _>>()?;

            if frame.len() != frame_length {
                return Err(SourceError::Parse {
                    line,
                    reason: format!("expected {} samples, found {}", frame_length, frame.len()),
                }
                .into());
            }

            frames.push_back(frame);
        }

        tracing::debug!("Parsed {} frames of {} bins", frames.len(), frame_length);
        Ok(Self {
            frame_length,
            frames,
        })
    }

    /// Frames not yet handed out
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrequencySource for FrameFileSource {
    fn name(&self) -> &str {
        "frame-file"
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    fn next_frame(&mut self) -> Option<Vec<f64>> {
        self.frames.pop_front()
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}
