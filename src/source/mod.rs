//! # Frequency Sources
//!
//! The collaborator that hands the session one magnitude frame per tick.
//! Spectral analysis itself happens upstream; sources only deliver bins.
//!
//! - [`FillerSource`]: no active signal, the session substitutes its filler frame
//! - [`NoiseSource`]: seeded pseudo-random spectra with optional bursts
//! - [`FrameFileSource`]: pre-computed frames read from a text file

pub mod frame_file;
pub mod synthetic;

pub use frame_file::FrameFileSource;
pub use synthetic::{FillerSource, NoiseSource, NoiseParams};

/// Supplier of fixed-length frequency-magnitude frames
pub trait FrequencySource: Send {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Bins per frame; must match the extractor's frame length
    fn frame_length(&self) -> usize;

    /// Next frame, or `None` when there is no active signal this tick
    fn next_frame(&mut self) -> Option<Vec<f64>>;

    /// True once the source will never produce another frame
    fn is_exhausted(&self) -> bool {
        false
    }
}
