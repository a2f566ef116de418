//! # dino-vis
//!
//! Audio-reactive dynamics for a procedurally animated scene.
//!
//! Each animation tick a frequency source hands over one frame of magnitude
//! bins. The [`DynamicsExtractor`] turns that frame into four reactive
//! signals (intensity, variance, change and a peak flag) which the motion
//! state and renderer read to size, spin, colour and light the scene.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dino_vis::{
//!     config::Config,
//!     render::TraceRenderer,
//!     session::Session,
//!     source::FrameFileSource,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let source = FrameFileSource::load("spectrum.txt", config.dynamics.frame_length).await?;
//!
//! let mut session = Session::new(&config, Box::new(source))?;
//! let summary = session.run(&mut TraceRenderer::new(), None).await?;
//! println!("{} ticks, {} peaks", summary.ticks, summary.peaks);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`dynamics`] - Frame-to-dynamics extraction (the core)
//! - [`source`] - Frequency sources feeding the session
//! - [`motion`] - Scene motion accumulated from dynamics
//! - [`render`] - Renderer trait and the bundled renderers
//! - [`session`] - The per-tick driving loop
//! - [`config`] - Configuration management
//!
//! ## Custom Renderers
//!
//! Anything that draws can implement the [`Renderer`](render::Renderer) trait:
//!
//! ```rust,no_run
//! use dino_vis::render::{Renderer, TickReport};
//! use dino_vis::Result;
//!
//! struct GlowCounter(u32);
//!
//! impl Renderer for GlowCounter {
//!     fn render(&mut self, report: &TickReport) -> Result<()> {
//!         if report.dynamics.is_peak {
//!             self.0 += 1;
//!         }
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod dynamics;
pub mod error;
pub mod motion;
pub mod render;
pub mod session;
pub mod source;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    dynamics::{Dynamics, DynamicsConfig, DynamicsExtractor},
    error::{InvalidInputError, Result, VisualizerError},
    render::Renderer,
    session::Session,
};
