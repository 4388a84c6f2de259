//! Frame Presentation
//!
//! CPU-side rasters and the double buffer shared by the screens that show
//! frames produced on another thread (movie playback and the shipwalk view).
//!
//! - [`Raster`] - RGBA8 pixel buffer
//! - [`FrameSwapper`] - front/back raster pair with an exclusive swap

pub mod raster;
pub mod swapper;

pub use raster::{Raster, BYTES_PER_PIXEL};
pub use swapper::FrameSwapper;
