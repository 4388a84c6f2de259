//! Movie decoder
//!
//! Decodes a movie's frame images on a background thread and presents each
//! one through a shared [`FrameSwapper`] at the movie's frame rate. Pacing
//! is deadline based: frame `n` is presented no earlier than
//! `start + n * frame_duration`, so slow decodes don't accumulate drift.

use crate::frame::FrameSwapper;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Longest single sleep while waiting for a frame deadline
const STOP_POLL: Duration = Duration::from_millis(10);

/// Playback progress shared between the decoder thread and the screen
#[derive(Debug, Default)]
pub struct PlaybackState {
    frame: AtomicUsize,
    decoded: AtomicUsize,
    skipped: AtomicUsize,
    finished: AtomicBool,
    stop: AtomicBool,
}

impl PlaybackState {
    /// Index of the last frame handled
    pub fn frame(&self) -> usize {
        self.frame.load(Ordering::Acquire)
    }

    pub fn decoded(&self) -> usize {
        self.decoded.load(Ordering::Acquire)
    }

    /// Frames that failed to decode
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

pub struct MovieDecoder {
    state: Arc<PlaybackState>,
    handle: Option<JoinHandle<()>>,
}

impl MovieDecoder {
    /// Starts decoding `frames` into `swapper`
    pub fn spawn(
        frames: Vec<PathBuf>,
        frame_duration: Duration,
        swapper: Arc<FrameSwapper>,
    ) -> Self {
        let state = Arc::new(PlaybackState::default());
        let thread_state = Arc::clone(&state);

        let handle = thread::Builder::new()
            .name("movie-decoder".to_string())
            .spawn(move || decode_loop(&frames, frame_duration, &swapper, &thread_state));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("unable to start movie decoder: {}", err);
                state.finished.store(true, Ordering::Release);
                None
            }
        };

        MovieDecoder { state, handle }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Asks the thread to stop and waits for it
    pub fn stop(&mut self) {
        self.state.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("movie decoder thread panicked");
            }
        }
    }
}

impl Drop for MovieDecoder {
    fn drop(&mut self) {
        self.stop();
    }
}

fn decode_loop(
    frames: &[PathBuf],
    frame_duration: Duration,
    swapper: &FrameSwapper,
    state: &PlaybackState,
) {
    info!("decoding {} frames", frames.len());
    let start = Instant::now();

    for (index, path) in frames.iter().enumerate() {
        if state.stop_requested() {
            debug!("decoder stopped at frame {}", index);
            break;
        }

        match image::open(path) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let presented = swapper.produce(|raster| {
                    raster.blit_fitted(rgba.width(), rgba.height(), rgba.as_raw())
                });
                if !presented {
                    debug!("frame {} not presented (buffers missing or reallocated)", index);
                }
                state.decoded.fetch_add(1, Ordering::AcqRel);
            }
            Err(err) => {
                warn!("skipping frame {}: {}", path.display(), err);
                state.skipped.fetch_add(1, Ordering::AcqRel);
            }
        }
        state.frame.store(index, Ordering::Release);

        let Some(deadline) = frame_deadline(start, frame_duration, index) else {
            warn!("frame {} is past the playable range, not pacing", index);
            continue;
        };
        while !state.stop_requested() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(STOP_POLL));
        }
    }

    state.finished.store(true, Ordering::Release);
}

/// When frame `index` should leave the screen, `None` on overflow
fn frame_deadline(start: Instant, frame_duration: Duration, index: usize) -> Option<Instant> {
    let count = u32::try_from(index + 1).ok()?;
    start.checked_add(frame_duration.checked_mul(count)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::Path;

    fn write_frame(dir: &Path, name: &str, color: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(4, 4, Rgba(color)).save(&path).unwrap();
        path
    }

    fn wait_finished(decoder: &MovieDecoder) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !decoder.is_finished() {
            assert!(Instant::now() < deadline, "decoder did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_frame_deadline_overflow() {
        let start = Instant::now();
        assert_eq!(
            frame_deadline(start, Duration::from_millis(100), 1),
            Some(start + Duration::from_millis(200))
        );
        assert_eq!(frame_deadline(start, Duration::MAX, 1), None);
        assert_eq!(frame_deadline(start, Duration::from_secs(1), usize::MAX), None);
    }

    #[test]
    fn test_plays_all_frames() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![
            write_frame(dir.path(), "1.png", [255, 0, 0, 255]),
            write_frame(dir.path(), "2.png", [0, 255, 0, 255]),
            write_frame(dir.path(), "3.png", [0, 0, 255, 255]),
        ];

        let swapper = Arc::new(FrameSwapper::new());
        swapper.initialize(8, 8).unwrap();

        let decoder = MovieDecoder::spawn(frames, Duration::from_millis(1), Arc::clone(&swapper));
        wait_finished(&decoder);

        assert_eq!(decoder.state().decoded(), 3);
        assert_eq!(decoder.state().frame(), 2);
        assert_eq!(swapper.frames_presented(), 3);
        assert_eq!(swapper.current_frame().unwrap().pixel(4, 4), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_skips_unreadable_frames() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![
            write_frame(dir.path(), "1.png", [255, 0, 0, 255]),
            dir.path().join("missing.png"),
        ];

        let swapper = Arc::new(FrameSwapper::new());
        swapper.initialize(4, 4).unwrap();

        let decoder = MovieDecoder::spawn(frames, Duration::from_millis(1), Arc::clone(&swapper));
        wait_finished(&decoder);

        assert_eq!(decoder.state().decoded(), 1);
        assert_eq!(decoder.state().skipped(), 1);
        // Last good frame stays on screen
        assert_eq!(swapper.current_frame().unwrap().pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_empty_movie_finishes() {
        let swapper = Arc::new(FrameSwapper::new());
        let decoder = MovieDecoder::spawn(Vec::new(), Duration::from_millis(1), swapper);
        wait_finished(&decoder);
        assert_eq!(decoder.state().decoded(), 0);
    }

    #[test]
    fn test_stop_interrupts_pacing() {
        let dir = tempfile::tempdir().unwrap();
        let frame = write_frame(dir.path(), "1.png", [1, 2, 3, 255]);
        let frames = vec![frame; 20];

        let swapper = Arc::new(FrameSwapper::new());
        swapper.initialize(4, 4).unwrap();

        let started = Instant::now();
        let mut decoder = MovieDecoder::spawn(frames, Duration::from_secs(5), swapper);
        thread::sleep(Duration::from_millis(20));
        decoder.stop();

        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(decoder.is_finished());
        assert!(decoder.state().decoded() < 20);
    }
}
