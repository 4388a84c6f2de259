//! Double-Buffered Frame Presenter
//!
//! One producer thread writes the next frame into the back buffer while the
//! UI thread presents the front buffer. The two rasters live in a fixed
//! two-slot array; a single atomic index says which slot is the front one.
//!
//! # Locking
//!
//! - `swap_lock` is held only while the front index is read (by the
//!   consumer picking the front slot or the producer picking the back one)
//!   or flipped (by `swap`). It is never held during pixel copies.
//! - A frame written into a back buffer picked before `initialize` or
//!   `release` is never presented; the following `swap` is dropped.
//! - Each slot has its own mutex. A consumer still holding the old front
//!   slot after a swap blocks the producer from overwriting it, so a reader
//!   never observes a half-written frame.
//!
//! # Example
//!
//! ```ignore
//! let swapper = Arc::new(FrameSwapper::new());
//! swapper.initialize(640, 360)?;
//!
//! // Producer thread
//! swapper.produce(|raster| raster.fill([255, 0, 0, 255]));
//!
//! // UI thread
//! if let Some(frame) = swapper.current_frame() {
//!     texture.update(None, frame.pixels(), frame.pitch())?;
//! }
//! ```

use super::raster::Raster;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// Errors raised while (re)allocating the buffer pair
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Producer bookkeeping guarded by the swap lock
#[derive(Debug, Default)]
struct SwapState {
    /// A back buffer was handed out and not yet swapped
    picked: bool,
    /// The buffers were reallocated after that hand-out
    stale: bool,
}

/// Front/back raster pair with an exclusive swap
pub struct FrameSwapper {
    slots: [Mutex<Option<Raster>>; 2],
    front: AtomicUsize,
    swap_lock: Mutex<SwapState>,
    redraw_pending: AtomicBool,
    presented: AtomicU64,
}

impl FrameSwapper {
    /// Creates an empty swapper; nothing is drawable until `initialize`
    pub fn new() -> Self {
        FrameSwapper {
            slots: [Mutex::new(None), Mutex::new(None)],
            front: AtomicUsize::new(0),
            swap_lock: Mutex::new(SwapState::default()),
            redraw_pending: AtomicBool::new(false),
            presented: AtomicU64::new(0),
        }
    }

    /// Allocates both buffers at `width` x `height`
    ///
    /// Any previous buffers are dropped. Slot 0 becomes the front buffer.
    pub fn initialize(&self, width: u32, height: u32) -> Result<(), FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions { width, height });
        }

        let mut state = self.swap_lock.lock();
        for slot in &self.slots {
            *slot.lock() = Some(Raster::new(width, height));
        }
        state.stale = state.picked;
        self.front.store(0, Ordering::Release);
        self.redraw_pending.store(false, Ordering::Release);
        self.presented.store(0, Ordering::Release);

        log::debug!("frame buffers allocated at {}x{}", width, height);
        Ok(())
    }

    /// Frees both buffers
    pub fn release(&self) {
        let mut state = self.swap_lock.lock();
        for slot in &self.slots {
            *slot.lock() = None;
        }
        state.stale = state.picked;
        self.redraw_pending.store(false, Ordering::Release);
    }

    pub fn is_initialized(&self) -> bool {
        self.slots[0].lock().is_some()
    }

    /// Dimensions of the buffer pair, `None` before initialization
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.slots[0].lock().as_ref().map(Raster::dimensions)
    }

    /// Index of the slot currently designated front
    pub fn front_index(&self) -> usize {
        self.front.load(Ordering::Acquire)
    }

    /// The buffer the producer writes into
    ///
    /// Stable until the next `swap`. Drop the guard before calling `swap`,
    /// otherwise the next reader of that slot waits for it.
    pub fn back_buffer(&self) -> Option<MappedMutexGuard<'_, Raster>> {
        let mut state = self.swap_lock.lock();
        let back = 1 - self.front_index();
        let back = MutexGuard::try_map(self.slots[back].lock(), Option::as_mut).ok();
        if back.is_some() {
            state.picked = true;
            state.stale = false;
        }
        back
    }

    /// Exchanges the front/back designation
    ///
    /// Marks a redraw as pending so the presentation path picks the new
    /// frame up on its next tick. Returns `false` without swapping when the
    /// buffers were reallocated since the last `back_buffer`, since the
    /// fresh back slot holds nothing worth showing.
    pub fn swap(&self) -> bool {
        let mut state = self.swap_lock.lock();
        state.picked = false;
        if std::mem::take(&mut state.stale) {
            log::debug!("dropping frame written before the buffers were reallocated");
            return false;
        }
        self.front.fetch_xor(1, Ordering::AcqRel);
        self.presented.fetch_add(1, Ordering::AcqRel);
        self.redraw_pending.store(true, Ordering::Release);
        true
    }

    /// Writes the next frame through `write` and presents it
    ///
    /// Returns `false` (and skips `write`) when no buffers are allocated,
    /// and also when they were reallocated while `write` ran.
    pub fn produce<F>(&self, write: F) -> bool
    where
        F: FnOnce(&mut Raster),
    {
        match self.back_buffer() {
            Some(mut back) => {
                write(&mut back);
            }
            None => return false,
        }
        self.swap()
    }

    /// The buffer eligible for display, `None` when nothing can be drawn yet
    pub fn current_frame(&self) -> Option<MappedMutexGuard<'_, Raster>> {
        let swap = self.swap_lock.lock();
        let front = self.front_index();
        let guard = self.slots[front].lock();
        drop(swap);
        MutexGuard::try_map(guard, Option::as_mut).ok()
    }

    /// Consumes the pending-redraw flag set by `swap`
    pub fn take_redraw(&self) -> bool {
        self.redraw_pending.swap(false, Ordering::AcqRel)
    }

    /// Number of swaps since the buffers were last allocated
    pub fn frames_presented(&self) -> u64 {
        self.presented.load(Ordering::Acquire)
    }
}

impl Default for FrameSwapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_initialize_sizes_both_buffers() {
        let swapper = FrameSwapper::new();
        swapper.initialize(320, 200).unwrap();

        assert_eq!(swapper.back_buffer().unwrap().dimensions(), (320, 200));
        assert_eq!(swapper.current_frame().unwrap().dimensions(), (320, 200));
        assert_eq!(swapper.dimensions(), Some((320, 200)));
    }

    #[test]
    fn test_initialize_rejects_zero_dimensions() {
        let swapper = FrameSwapper::new();
        assert_eq!(
            swapper.initialize(0, 200),
            Err(FrameError::InvalidDimensions { width: 0, height: 200 })
        );
        assert!(swapper.initialize(320, 0).is_err());
        assert!(!swapper.is_initialized());
    }

    #[test]
    fn test_nothing_to_draw_before_initialize() {
        let swapper = FrameSwapper::new();
        assert!(swapper.current_frame().is_none());
        assert!(swapper.back_buffer().is_none());
        assert!(!swapper.produce(|_| panic!("no buffer to write")));
    }

    #[test]
    fn test_double_swap_restores_front() {
        let swapper = FrameSwapper::new();
        swapper.initialize(8, 8).unwrap();
        let original = swapper.front_index();

        swapper.swap();
        assert_ne!(swapper.front_index(), original);
        swapper.swap();
        assert_eq!(swapper.front_index(), original);
    }

    #[test]
    fn test_swap_presents_written_frame() {
        let swapper = FrameSwapper::new();
        swapper.initialize(2, 2).unwrap();

        swapper.produce(|raster| raster.fill([10, 20, 30, 255]));
        assert!(swapper.take_redraw());
        assert!(!swapper.take_redraw());
        assert_eq!(
            swapper.current_frame().unwrap().pixel(1, 1),
            Some([10, 20, 30, 255])
        );
        assert_eq!(swapper.frames_presented(), 1);
    }

    #[test]
    fn test_current_frame_stays_valid_without_writes() {
        let swapper = FrameSwapper::new();
        swapper.initialize(4, 4).unwrap();
        for _ in 0..7 {
            swapper.swap();
            assert!(swapper.current_frame().is_some());
        }
    }

    #[test]
    fn test_release_and_reinitialize() {
        let swapper = FrameSwapper::new();
        swapper.initialize(4, 4).unwrap();
        swapper.swap();
        swapper.release();
        assert!(swapper.current_frame().is_none());

        swapper.initialize(6, 2).unwrap();
        assert_eq!(swapper.front_index(), 0);
        assert_eq!(swapper.current_frame().unwrap().dimensions(), (6, 2));
    }

    #[test]
    fn test_frame_written_before_reallocation_is_dropped() {
        let swapper = FrameSwapper::new();
        swapper.initialize(2, 2).unwrap();
        swapper.back_buffer().unwrap().fill([255, 0, 0, 255]);

        // Resize lands between the write and the swap
        swapper.initialize(4, 4).unwrap();
        assert!(!swapper.swap());
        assert_eq!(swapper.front_index(), 0);
        assert_eq!(swapper.frames_presented(), 0);
        assert!(!swapper.take_redraw());

        assert!(swapper.produce(|raster| raster.fill([0, 0, 255, 255])));
        assert_eq!(swapper.front_index(), 1);
        assert_eq!(
            swapper.current_frame().unwrap().pixel(3, 3),
            Some([0, 0, 255, 255])
        );
    }

    #[test]
    fn test_release_discards_pending_frame() {
        let swapper = FrameSwapper::new();
        swapper.initialize(2, 2).unwrap();
        drop(swapper.back_buffer());
        swapper.release();
        swapper.initialize(2, 2).unwrap();
        assert!(!swapper.swap());

        // A swap without a pending back buffer is unaffected
        assert!(swapper.swap());
        assert_eq!(swapper.frames_presented(), 1);
    }

    #[test]
    fn test_reader_never_sees_torn_frame() {
        let swapper = Arc::new(FrameSwapper::new());
        swapper.initialize(64, 64).unwrap();

        let producer = {
            let swapper = Arc::clone(&swapper);
            thread::spawn(move || {
                for frame in 1..=300u32 {
                    let value = (frame % 250) as u8 + 1;
                    swapper.produce(|raster| {
                        // Write row by row so a torn read would show mixed values
                        let pitch = raster.pitch();
                        for row in raster.pixels_mut().chunks_exact_mut(pitch) {
                            row.fill(value);
                        }
                    });
                }
            })
        };

        for _ in 0..300 {
            if let Some(frame) = swapper.current_frame() {
                let first = frame.pixels()[0];
                assert!(
                    frame.pixels().iter().all(|&b| b == first),
                    "torn frame observed"
                );
            }
        }

        producer.join().unwrap();
        assert_eq!(swapper.frames_presented(), 300);
    }
}
