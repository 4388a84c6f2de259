//! Persistent Settings
//!
//! User-facing options edited by the settings dialogs and stored as pretty
//! JSON in the user's config directory. Every field has a default, so an
//! older or partial file still loads.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Window modes offered by the video settings page
pub const RESOLUTIONS: [(u32, u32); 5] = [
    (640, 360),
    (1280, 720),
    (1600, 900),
    (1920, 1080),
    (2560, 1440),
];

/// Errors raised while reading or writing the settings file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("unable to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        VideoSettings {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Volumes are percentages (0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub master: u8,
    pub music: u8,
    pub effects: u8,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        AudioSettings {
            master: 80,
            music: 70,
            effects: 80,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Language code, matches a file in `data/lang`
    pub language: String,
    pub subtitles: bool,
    pub skip_seen_movies: bool,
    /// Credits scroll speed in pixels per second
    pub credits_speed: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            language: "en".to_string(),
            subtitles: true,
            skip_seen_movies: false,
            credits_speed: 40,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub video: VideoSettings,
    pub audio: AudioSettings,
    pub game: GameSettings,
    /// Profile selected the last time the game ran
    pub last_profile: Option<String>,
}

impl Settings {
    /// Reads settings from `path`
    ///
    /// A missing file yields the defaults with a warning; an unreadable or
    /// invalid file is logged and also yields the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!("missing settings file at {}, using defaults", path.display());
            return Settings::default();
        }

        match Self::try_load(path) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                error!("{} ({}), using defaults", err, path.display());
                Settings::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Writes settings to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.json");

        let mut settings = Settings::default();
        settings.video.fullscreen = true;
        settings.audio.music = 15;
        settings.last_profile = Some("Vega".to_string());
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "audio": { "muted": true } }"#).unwrap();

        let settings = Settings::load(&path);
        assert!(settings.audio.muted);
        assert_eq!(settings.audio.master, 80);
        assert_eq!(settings.video, VideoSettings::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
