//! Video library index
//!
//! Every subdirectory of the movies directory that holds a readable
//! manifest becomes one library entry.

use super::manifest::MovieManifest;
use crate::profile::Profile;
use log::{info, warn};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoEntry {
    /// Directory name of the movie
    pub id: String,
    pub title: String,
    pub order: u32,
    pub always_unlocked: bool,
    pub frame_count: usize,
    pub duration: Duration,
}

impl VideoEntry {
    /// Whether `profile` may watch this entry
    pub fn is_unlocked(&self, profile: Option<&Profile>) -> bool {
        self.always_unlocked || profile.is_some_and(|p| p.has_watched(&self.id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct VideoLibrary {
    entries: Vec<VideoEntry>,
}

impl VideoLibrary {
    pub fn from_entries(mut entries: Vec<VideoEntry>) -> Self {
        entries.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        VideoLibrary { entries }
    }

    /// Indexes every movie under `movies_dir`
    pub fn scan(movies_dir: &Path) -> Self {
        let dirs = match fs::read_dir(movies_dir) {
            Ok(dirs) => dirs,
            Err(err) => {
                warn!("unable to read movies from {}: {}", movies_dir.display(), err);
                return Self::default();
            }
        };

        let mut entries = Vec::new();
        for dir in dirs.filter_map(|entry| entry.ok()).map(|entry| entry.path()) {
            if !dir.is_dir() {
                continue;
            }
            let Some(id) = dir.file_name().and_then(|n| n.to_str()).map(String::from) else {
                continue;
            };

            match MovieManifest::load(&dir) {
                Ok(manifest) => {
                    let frame_count = manifest.frame_paths(&dir).len();
                    entries.push(VideoEntry {
                        id,
                        title: manifest.title.clone(),
                        order: manifest.order,
                        always_unlocked: manifest.always_unlocked,
                        frame_count,
                        duration: manifest.duration(frame_count),
                    });
                }
                Err(err) => warn!("skipping movie {}: {}", dir.display(), err),
            }
        }

        info!("video library: {} movies", entries.len());
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> &[VideoEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&VideoEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
