//! Resource lookup
//!
//! `DataPaths` names where game data, settings and profiles live.
//! `ImageCache` loads textures lazily by relative name and remembers
//! failures so a missing image is reported once and then skipped.

use log::error;
use sdl2::image::LoadTexture;
use sdl2::render::{Texture, TextureCreator};
use sdl2::video::WindowContext;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Locations of everything read or written at runtime
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub data: PathBuf,
    pub config_file: PathBuf,
    pub profiles: PathBuf,
}

impl DataPaths {
    pub fn lang(&self) -> PathBuf {
        self.data.join("lang")
    }

    pub fn movies(&self) -> PathBuf {
        self.data.join("movies")
    }

    pub fn ship(&self) -> PathBuf {
        self.data.join("ship")
    }

    pub fn images(&self) -> PathBuf {
        self.data.join("images")
    }

    pub fn credits(&self) -> PathBuf {
        self.data.join("credits.txt")
    }

    pub fn quiz(&self) -> PathBuf {
        self.data.join("quiz.json")
    }
}

/// Lazily loaded, cached textures
pub struct ImageCache<'a> {
    creator: &'a TextureCreator<WindowContext>,
    root: PathBuf,
    textures: HashMap<String, Option<Texture<'a>>>,
}

impl<'a> ImageCache<'a> {
    pub fn new(creator: &'a TextureCreator<WindowContext>, root: impl AsRef<Path>) -> Self {
        ImageCache {
            creator,
            root: root.as_ref().to_path_buf(),
            textures: HashMap::new(),
        }
    }

    /// Returns the texture for `name` (relative to the image root)
    ///
    /// The first failed load is logged; later calls return `None` silently.
    pub fn get(&mut self, name: &str) -> Option<&Texture<'a>> {
        if !self.textures.contains_key(name) {
            let path = self.root.join(name);
            let texture = match self.creator.load_texture(&path) {
                Ok(texture) => Some(texture),
                Err(err) => {
                    error!("failed to load image {}: {}", path.display(), err);
                    None
                }
            };
            self.textures.insert(name.to_string(), texture);
        }

        self.textures.get(name).and_then(Option::as_ref)
    }

    /// Loads `name` ahead of first use; returns whether it is available
    pub fn preload(&mut self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
