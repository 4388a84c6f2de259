//! Shipwalk renderer
//!
//! A producer thread that owns the panoramas and draws views into a shared
//! [`FrameSwapper`]. The UI thread only sends [`ViewCommand`]s; a burst of
//! `Look` commands (mouse drag) collapses into the latest one.

use super::deck::ShipDeck;
use super::panorama::render_panorama;
use crate::frame::{FrameSwapper, Raster};
use image::RgbaImage;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Frames per half of a walk transition
pub const FADE_FRAMES: u32 = 6;
const FADE_STEP: Duration = Duration::from_millis(25);

/// Drawn where a location's panorama cannot be loaded
pub const FALLBACK_COLOR: [u8; 4] = [28, 34, 46, 255];

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    /// Show `location` facing `yaw`
    Look { location: String, yaw: f32 },
    /// Fade out of `from`, then fade into `to`
    Walk {
        from: String,
        from_yaw: f32,
        to: String,
        to_yaw: f32,
    },
    Stop,
}

pub struct ShipwalkRenderer {
    sender: Sender<ViewCommand>,
    handle: Option<JoinHandle<()>>,
}

impl ShipwalkRenderer {
    /// Starts the render thread; panorama file names are resolved in `dir`
    pub fn spawn(deck: Arc<ShipDeck>, dir: PathBuf, swapper: Arc<FrameSwapper>) -> Self {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("shipwalk-renderer".to_string())
            .spawn(move || {
                let mut worker = Worker {
                    deck,
                    dir,
                    swapper,
                    panoramas: HashMap::new(),
                };
                worker.run(receiver);
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("unable to start shipwalk renderer: {}", err);
                None
            }
        };

        ShipwalkRenderer { sender, handle }
    }

    /// Queues a command; `false` once the thread is gone
    pub fn send(&self, command: ViewCommand) -> bool {
        self.handle.is_some() && self.sender.send(command).is_ok()
    }

    pub fn look(&self, location: &str, yaw: f32) -> bool {
        self.send(ViewCommand::Look {
            location: location.to_string(),
            yaw,
        })
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.sender.send(ViewCommand::Stop);
            if handle.join().is_err() {
                warn!("shipwalk renderer thread panicked");
            }
        }
    }
}

impl Drop for ShipwalkRenderer {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker {
    deck: Arc<ShipDeck>,
    dir: PathBuf,
    swapper: Arc<FrameSwapper>,
    /// `None` records a panorama that failed to load
    panoramas: HashMap<String, Option<RgbaImage>>,
}

impl Worker {
    fn run(&mut self, receiver: Receiver<ViewCommand>) {
        info!("shipwalk renderer started");

        while let Ok(command) = receiver.recv() {
            let mut command = command;

            // Collapse queued looks into the newest one
            while let ViewCommand::Look { .. } = command {
                match receiver.try_recv() {
                    Ok(next) => command = next,
                    Err(_) => break,
                }
            }

            match command {
                ViewCommand::Look { location, yaw } => self.present(&location, yaw, 1.0),
                ViewCommand::Walk {
                    from,
                    from_yaw,
                    to,
                    to_yaw,
                } => {
                    debug!("walking from {} to {}", from, to);
                    for step in 1..=FADE_FRAMES {
                        let brightness = 1.0 - step as f32 / FADE_FRAMES as f32;
                        self.present(&from, from_yaw, brightness);
                        thread::sleep(FADE_STEP);
                    }
                    for step in 1..=FADE_FRAMES {
                        let brightness = step as f32 / FADE_FRAMES as f32;
                        self.present(&to, to_yaw, brightness);
                        if step < FADE_FRAMES {
                            thread::sleep(FADE_STEP);
                        }
                    }
                }
                ViewCommand::Stop => break,
            }
        }

        info!("shipwalk renderer stopped");
    }

    fn present(&mut self, location: &str, yaw: f32, brightness: f32) {
        let fov = self.deck.fov;
        let swapper = Arc::clone(&self.swapper);
        let panorama = self.panorama(location);
        let presented = swapper.produce(|raster: &mut Raster| {
            match panorama {
                Some(image) => render_panorama(image, yaw, fov, raster),
                None => raster.fill(FALLBACK_COLOR),
            }
            raster.darken(brightness);
        });
        if !presented {
            debug!("view of {} not presented (buffers missing or reallocated)", location);
        }
    }

    fn panorama(&mut self, location: &str) -> Option<&RgbaImage> {
        if !self.panoramas.contains_key(location) {
            let loaded = self.load_panorama(location);
            self.panoramas.insert(location.to_string(), loaded);
        }
        self.panoramas.get(location).and_then(Option::as_ref)
    }

    fn load_panorama(&self, location: &str) -> Option<RgbaImage> {
        let Some(entry) = self.deck.location(location) else {
            warn!("unknown ship location '{}'", location);
            return None;
        };

        let path = self.dir.join(&entry.panorama);
        match image::open(&path) {
            Ok(image) => {
                debug!("loaded panorama {}", path.display());
                Some(image.to_rgba8())
            }
            Err(err) => {
                warn!("panorama {} unavailable: {}", path.display(), err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::time::Instant;

    fn deck() -> ShipDeck {
        serde_json::from_str(
            r#"{
                "start": "bridge",
                "fov": 90,
                "locations": [
                    { "id": "bridge", "name": "BRIDGE", "panorama": "bridge.png",
                      "exits": [{ "yaw": 0, "target": "hold", "label": "HOLD" }] },
                    { "id": "hold", "name": "HOLD", "panorama": "missing.png",
                      "exits": [{ "yaw": 180, "target": "bridge", "label": "BRIDGE" }] }
                ]
            }"#,
        )
        .unwrap()
    }

    fn wait_for_frames(swapper: &FrameSwapper, count: u64) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while swapper.frames_presented() < count {
            assert!(Instant::now() < deadline, "renderer produced too few frames");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn setup() -> (tempfile::TempDir, Arc<FrameSwapper>, ShipwalkRenderer) {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(8, 4, Rgba([200, 100, 50, 255]))
            .save(dir.path().join("bridge.png"))
            .unwrap();

        let swapper = Arc::new(FrameSwapper::new());
        swapper.initialize(16, 8).unwrap();
        let renderer =
            ShipwalkRenderer::spawn(Arc::new(deck()), dir.path().to_path_buf(), Arc::clone(&swapper));
        (dir, swapper, renderer)
    }

    #[test]
    fn test_look_renders_panorama() {
        let (_dir, swapper, renderer) = setup();
        assert!(renderer.look("bridge", 45.0));
        wait_for_frames(&swapper, 1);
        assert_eq!(swapper.current_frame().unwrap().pixel(3, 3), Some([200, 100, 50, 255]));
    }

    #[test]
    fn test_missing_panorama_uses_fallback() {
        let (_dir, swapper, renderer) = setup();
        renderer.look("hold", 0.0);
        wait_for_frames(&swapper, 1);
        assert_eq!(swapper.current_frame().unwrap().pixel(0, 0), Some(FALLBACK_COLOR));
    }

    #[test]
    fn test_walk_fades_through_black() {
        let (_dir, swapper, renderer) = setup();
        renderer.send(ViewCommand::Walk {
            from: "hold".to_string(),
            from_yaw: 0.0,
            to: "bridge".to_string(),
            to_yaw: 180.0,
        });
        wait_for_frames(&swapper, (FADE_FRAMES * 2) as u64);
        // Last fade-in frame is at full brightness
        assert_eq!(swapper.current_frame().unwrap().pixel(0, 0), Some([200, 100, 50, 255]));
    }

    #[test]
    fn test_stop_ends_thread() {
        let (_dir, _swapper, mut renderer) = setup();
        renderer.stop();
        assert!(!renderer.look("bridge", 0.0));
    }
}
