//! Full-motion video
//!
//! - `manifest`: movie description (frames, frame rate, subtitles)
//! - `decoder`: background frame decoder feeding a FrameSwapper
//! - `library`: index of all movies for the video library

pub mod decoder;
pub mod library;
pub mod manifest;

pub use decoder::MovieDecoder;
pub use library::{VideoEntry, VideoLibrary};
pub use manifest::MovieManifest;
