//! Movie manifests
//!
//! A movie is a directory holding `movie.json` and its frame images:
//!
//! ```json
//! {
//!   "title": "movie.intro",
//!   "fps": 12,
//!   "frames": ["frame_0001.png", "frame_0002.png"],
//!   "subtitles": [{ "start_ms": 0, "end_ms": 1500, "text": "sub.intro.1" }],
//!   "order": 1,
//!   "always_unlocked": false
//! }
//! ```
//!
//! When `frames` is empty every PNG/JPEG in the directory is used, sorted
//! by file name.

use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MANIFEST_FILE: &str = "movie.json";

/// Accepted frame rates
pub const FPS_RANGE: RangeInclusive<f32> = 0.1..=240.0;

#[derive(thiserror::Error, Debug)]
pub enum MovieError {
    #[error("unable to read movie manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid movie manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid frame rate {0}")]
    InvalidFrameRate(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    pub start_ms: u64,
    pub end_ms: u64,
    /// String key (or literal text when untranslated)
    pub text: String,
}

fn default_fps() -> f32 {
    12.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieManifest {
    pub title: String,
    #[serde(default = "default_fps")]
    pub fps: f32,
    #[serde(default)]
    pub frames: Vec<String>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleCue>,
    /// Position in the video library
    #[serde(default)]
    pub order: u32,
    /// Listed in the library even if never watched
    #[serde(default)]
    pub always_unlocked: bool,
}

impl MovieManifest {
    /// Reads `<dir>/movie.json`
    pub fn load(dir: &Path) -> Result<Self, MovieError> {
        let json = fs::read_to_string(dir.join(MANIFEST_FILE))?;
        let manifest: MovieManifest = serde_json::from_str(&json)?;

        if !FPS_RANGE.contains(&manifest.fps) {
            return Err(MovieError::InvalidFrameRate(manifest.fps));
        }

        Ok(manifest)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.fps as f64).unwrap_or(Duration::MAX)
    }

    /// Frame file paths, explicit list first, directory scan otherwise
    pub fn frame_paths(&self, dir: &Path) -> Vec<PathBuf> {
        if !self.frames.is_empty() {
            return self.frames.iter().map(|frame| dir.join(frame)).collect();
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .filter(|path| is_frame_image(path))
                    .collect()
            })
            .unwrap_or_default();
        paths.sort();
        paths
    }

    /// Total running time for `frame_count` frames, saturating
    pub fn duration(&self, frame_count: usize) -> Duration {
        u32::try_from(frame_count)
            .ok()
            .and_then(|count| self.frame_duration().checked_mul(count))
            .unwrap_or(Duration::MAX)
    }

    /// Subtitle text shown at `elapsed`, if any
    pub fn subtitle_at(&self, elapsed: Duration) -> Option<&str> {
        let ms = elapsed.as_millis() as u64;
        self.subtitles
            .iter()
            .find(|cue| cue.start_ms <= ms && ms < cue.end_ms)
            .map(|cue| cue.text.as_str())
    }
}

fn is_frame_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("png" | "jpg" | "jpeg")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, json: &str) {
        fs::write(dir.join(MANIFEST_FILE), json).unwrap();
    }

    #[test]
    fn test_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), r#"{ "title": "INTRO" }"#);

        let manifest = MovieManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.fps, 12.0);
        assert!(manifest.frames.is_empty());
        assert!(!manifest.always_unlocked);
    }

    #[test]
    fn test_rejects_bad_frame_rate() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), r#"{ "title": "X", "fps": 0 }"#);
        assert!(matches!(
            MovieManifest::load(dir.path()),
            Err(MovieError::InvalidFrameRate(_))
        ));
    }

    #[test]
    fn test_rejects_tiny_frame_rate() {
        let dir = tempfile::tempdir().unwrap();
        for fps in ["1e-30", "1e-19", "0.05", "1000", "-5"] {
            write_manifest(dir.path(), &format!(r#"{{ "title": "X", "fps": {} }}"#, fps));
            assert!(
                matches!(MovieManifest::load(dir.path()), Err(MovieError::InvalidFrameRate(_))),
                "fps {} accepted",
                fps
            );
        }

        write_manifest(dir.path(), r#"{ "title": "X", "fps": 0.5 }"#);
        let slow = MovieManifest::load(dir.path()).unwrap();
        assert_eq!(slow.duration(3), Duration::from_secs(6));
        assert_eq!(slow.duration(usize::MAX), Duration::MAX);
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(MovieManifest::load(dir.path()), Err(MovieError::Io(_))));
    }

    #[test]
    fn test_frame_paths_scan_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.PNG", "c.jpg", "notes.txt", MANIFEST_FILE] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        write_manifest(dir.path(), r#"{ "title": "X" }"#);

        let manifest = MovieManifest::load(dir.path()).unwrap();
        let names: Vec<String> = manifest
            .frame_paths(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png", "c.jpg"]);
    }

    #[test]
    fn test_subtitle_lookup() {
        let manifest = MovieManifest {
            title: "X".to_string(),
            fps: 10.0,
            frames: Vec::new(),
            subtitles: vec![SubtitleCue {
                start_ms: 1000,
                end_ms: 2000,
                text: "HELLO".to_string(),
            }],
            order: 0,
            always_unlocked: false,
        };

        assert_eq!(manifest.subtitle_at(Duration::from_millis(999)), None);
        assert_eq!(manifest.subtitle_at(Duration::from_millis(1000)), Some("HELLO"));
        assert_eq!(manifest.subtitle_at(Duration::from_millis(2000)), None);
        assert_eq!(manifest.duration(25), Duration::from_millis(2500));
    }
}
