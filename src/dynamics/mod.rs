//! # Dynamics Extraction
//!
//! Turns successive frequency-magnitude frames into the small set of
//! reactive scalars every visual element reads.
//!
//! ## Signals
//!
//! - **Intensity**: power-law loudness of the frame (convex, so quiet passages stay quiet)
//! - **Variance**: spread of the bins, concave-shaped to lift small values
//! - **Change**: mean absolute delta from the previous frame, concave-shaped
//! - **Peak**: energy above both the rolling average (by a ratio) and an absolute floor
//!
//! ## Usage
//!
//! ```rust
//! use dino_vis::dynamics::DynamicsExtractor;
//!
//! # fn main() -> dino_vis::Result<()> {
//! let mut extractor = DynamicsExtractor::with_frame_length(4)?;
//! let dynamics = extractor.compute_dynamics(&[255.0, 255.0, 255.0, 255.0])?;
//!
//! assert_eq!(dynamics.intensity, 1.1);
//! assert!(dynamics.is_peak);
//! # Ok(())
//! # }
//! ```

pub mod extractor;
pub mod history;
pub mod types;

pub use extractor::DynamicsExtractor;
pub use history::EnergyHistory;
pub use types::{Dynamics, DynamicsConfig};
