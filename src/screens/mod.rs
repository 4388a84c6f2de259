//! Front-end screens
//!
//! Each screen wraps a plain model (credits roll, settings form, quiz
//! session...) that holds the testable logic; the screen itself only maps
//! input onto the model and draws it.

pub mod credits;
pub mod game_over;
pub mod loading;
pub mod main_menu;
pub mod movie;
pub mod profiles;
pub mod settings;
pub mod shipwalk;
pub mod video_library;

use crate::context::AppContext;
use crate::frame::FrameSwapper;
use crate::screen::{Screen, ScreenRequest};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

pub type AppScreen<'a> = Box<dyn Screen<AppContext<'a>> + 'a>;

/// Builds the screen for `request`
pub fn build<'a>(request: ScreenRequest, ctx: &mut AppContext<'a>) -> AppScreen<'a> {
    match request {
        ScreenRequest::Loading { skip_intro } => Box::new(loading::LoadingScreen::new(skip_intro)),
        ScreenRequest::MainMenu => Box::new(main_menu::MainMenuScreen::new()),
        ScreenRequest::Credits => Box::new(credits::CreditsScreen::new()),
        ScreenRequest::Settings => Box::new(settings::SettingsRootScreen::new()),
        ScreenRequest::SettingsPage(page) => Box::new(settings::SettingsPageScreen::new(page, ctx)),
        ScreenRequest::GameOver => {
            let summary = ctx.last_summary.clone().unwrap_or_default();
            Box::new(game_over::GameOverScreen::new(summary))
        }
        ScreenRequest::Profiles => Box::new(profiles::ProfilesScreen::new()),
        ScreenRequest::Shipwalk => Box::new(shipwalk::ShipwalkScreen::new()),
        ScreenRequest::PsychTest => Box::new(psych_test::PsychTestScreen::new()),
        ScreenRequest::VideoLibrary => Box::new(video_library::VideoLibraryScreen::new()),
        ScreenRequest::Movie { id, then } => Box::new(movie::MovieScreen::new(id, then.map(|r| *r))),
    }
}

/// Background colour shared by every screen
pub const BACKGROUND: Color = Color::RGB(12, 14, 22);

/// Clears the canvas and draws `image` stretched over it when available
pub fn draw_backdrop(
    canvas: &mut Canvas<Window>,
    ctx: &mut AppContext<'_>,
    image: &str,
) -> Result<(), String> {
    canvas.set_draw_color(BACKGROUND);
    canvas.clear();
    if let Some(texture) = ctx.images.get(image) {
        canvas.copy(texture, None, None)?;
    }
    Ok(())
}

/// Streaming texture mirroring the front buffer of a [`FrameSwapper`]
///
/// Recreated whenever the buffer size changes; re-uploaded only when the
/// swapper reports a pending redraw.
pub struct FrameTexture<'a> {
    texture: Option<Texture<'a>>,
    size: (u32, u32),
}

impl<'a> FrameTexture<'a> {
    pub fn new() -> Self {
        FrameTexture {
            texture: None,
            size: (0, 0),
        }
    }

    /// Uploads the current frame if a new one was presented
    pub fn refresh(
        &mut self,
        creator: &'a TextureCreator<WindowContext>,
        swapper: &FrameSwapper,
    ) -> Result<(), String> {
        if !swapper.take_redraw() && self.texture.is_some() {
            return Ok(());
        }

        let Some(frame) = swapper.current_frame() else {
            return Ok(());
        };

        if self.texture.is_none() || self.size != frame.dimensions() {
            let (width, height) = frame.dimensions();
            let texture = creator
                .create_texture_streaming(PixelFormatEnum::ABGR8888, width, height)
                .map_err(|e| e.to_string())?;
            self.texture = Some(texture);
            self.size = (width, height);
        }

        if let Some(texture) = self.texture.as_mut() {
            texture
                .update(None, frame.pixels(), frame.pitch())
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    pub fn draw(&self, canvas: &mut Canvas<Window>, target: Option<Rect>) -> Result<(), String> {
        match &self.texture {
            Some(texture) => canvas.copy(texture, None, target),
            None => Ok(()),
        }
    }

    pub fn clear(&mut self) {
        self.texture = None;
        self.size = (0, 0);
    }
}

impl Default for FrameTexture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
