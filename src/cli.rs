use crate::screen::ScreenRequest;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const APP_DIR: &str = "starward";

#[derive(Parser, Debug)]
#[command(name = "starward", about = "Starward front-end")]
pub struct Cli {
    #[arg(long, default_value = "data")]
    /// Directory containing game data (lang, movies, ship, images)
    pub data: PathBuf,

    #[arg(long)]
    /// Alternative path to the settings file
    pub config: Option<PathBuf>,

    #[arg(long)]
    /// Alternative profile directory
    pub profiles: Option<PathBuf>,

    #[arg(long, value_enum)]
    /// Skip loading and open this screen directly
    pub start: Option<StartScreen>,

    #[arg(long)]
    /// Game summary JSON shown by the game-over screen
    pub summary: Option<PathBuf>,

    #[arg(long)]
    /// Do not play the intro movie after loading
    pub skip_intro: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartScreen {
    MainMenu,
    Credits,
    Settings,
    GameOver,
    Profiles,
    Shipwalk,
    PsychTest,
    VideoLibrary,
}

impl Cli {
    pub fn config_file(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("settings.json")
        })
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.profiles.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|p| p.join(APP_DIR).join("profiles"))
                .unwrap_or_else(|| PathBuf::from("./profiles"))
        })
    }
}

impl StartScreen {
    pub fn request(self) -> ScreenRequest {
        match self {
            StartScreen::MainMenu => ScreenRequest::MainMenu,
            StartScreen::Credits => ScreenRequest::Credits,
            StartScreen::Settings => ScreenRequest::Settings,
            StartScreen::GameOver => ScreenRequest::GameOver,
            StartScreen::Profiles => ScreenRequest::Profiles,
            StartScreen::Shipwalk => ScreenRequest::Shipwalk,
            StartScreen::PsychTest => ScreenRequest::PsychTest,
            StartScreen::VideoLibrary => ScreenRequest::VideoLibrary,
        }
    }

    /// Screens that open on top of the main menu rather than replacing it
    pub fn needs_menu_below(self) -> bool {
        !matches!(self, StartScreen::MainMenu | StartScreen::Profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["starward"]);
        assert_eq!(cli.data, PathBuf::from("data"));
        assert!(cli.start.is_none());
        assert!(!cli.skip_intro);
    }

    #[test]
    fn test_start_screen_and_paths() {
        let cli = Cli::parse_from([
            "starward",
            "--start",
            "video-library",
            "--config",
            "/tmp/s.json",
            "--profiles",
            "/tmp/p",
            "--skip-intro",
        ]);
        assert_eq!(cli.start, Some(StartScreen::VideoLibrary));
        assert_eq!(cli.config_file(), PathBuf::from("/tmp/s.json"));
        assert_eq!(cli.profile_dir(), PathBuf::from("/tmp/p"));
        assert!(cli.skip_intro);
    }

    #[test]
    fn test_start_requests() {
        assert_eq!(StartScreen::GameOver.request(), ScreenRequest::GameOver);
        assert!(StartScreen::Shipwalk.needs_menu_below());
        assert!(!StartScreen::Profiles.needs_menu_below());
    }
}
