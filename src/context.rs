//! Shared application context
//!
//! Every screen callback receives the `AppContext`: settings, localized
//! strings, the image cache, profiles, the video library and the current
//! layout. Only the UI thread touches it.

use crate::config::Settings;
use crate::locale::Strings;
use crate::media::VideoLibrary;
use crate::profile::{Profile, ProfileStore};
use crate::resources::{DataPaths, ImageCache};
use crate::screens::game_over::GameSummary;
use log::{error, info};
use sdl2::render::TextureCreator;
use sdl2::video::WindowContext;

/// Reference height the UI is designed for
pub const BASE_HEIGHT: u32 = 360;

/// Output size and the integer UI scale derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        Layout {
            width,
            height,
            scale: (height / BASE_HEIGHT).max(1),
        }
    }

    pub fn center_x(&self) -> i32 {
        (self.width / 2) as i32
    }

    pub fn center_y(&self) -> i32 {
        (self.height / 2) as i32
    }

    /// Scales a base-resolution length
    pub fn px(&self, base: u32) -> u32 {
        base * self.scale
    }
}

pub struct AppContext<'a> {
    pub paths: DataPaths,
    pub settings: Settings,
    pub strings: Strings,
    pub textures: &'a TextureCreator<WindowContext>,
    pub images: ImageCache<'a>,
    pub profiles: ProfileStore,
    pub profile: Option<Profile>,
    pub library: VideoLibrary,
    pub layout: Layout,
    /// Set when video settings changed; the main loop re-applies the window mode
    pub video_changed: bool,
    pub last_summary: Option<GameSummary>,
}

impl<'a> AppContext<'a> {
    /// Localized text for `key`
    pub fn tr<'s>(&'s self, key: &'s str) -> &'s str {
        self.strings.get(key)
    }

    pub fn reload_strings(&mut self) {
        self.strings = Strings::load(&self.paths.lang(), &self.settings.game.language);
    }

    pub fn save_settings(&self) {
        if let Err(err) = self.settings.save(&self.paths.config_file) {
            error!("failed to save settings: {}", err);
        }
    }

    pub fn save_profile(&self) {
        if let Some(profile) = &self.profile {
            if let Err(err) = self.profiles.save(profile) {
                error!("failed to save profile '{}': {}", profile.name, err);
            }
        }
    }

    /// Makes `profile` the active one and remembers it for the next start
    pub fn activate_profile(&mut self, mut profile: Profile) {
        profile.touch();
        info!("active profile: {}", profile.name);
        self.settings.last_profile = Some(profile.name.clone());
        self.profile = Some(profile);
        self.save_profile();
        self.save_settings();
    }

    pub fn profile_name(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.name.as_str())
    }

    /// Whether the active profile has seen `movie_id`
    pub fn has_watched(&self, movie_id: &str) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|p| p.has_watched(movie_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_scale() {
        assert_eq!(Layout::new(640, 360).scale, 1);
        assert_eq!(Layout::new(1280, 720).scale, 2);
        assert_eq!(Layout::new(1920, 1080).scale, 3);
        assert_eq!(Layout::new(320, 200).scale, 1);
    }

    #[test]
    fn test_layout_helpers() {
        let layout = Layout::new(1280, 720);
        assert_eq!(layout.center_x(), 640);
        assert_eq!(layout.center_y(), 360);
        assert_eq!(layout.px(10), 20);
    }
}
