//! Full-motion video screen
//!
//! The decoder thread writes frames into the shared swapper; this screen
//! uploads the front buffer to a streaming texture whenever a new frame was
//! presented and overlays subtitles.

use super::FrameTexture;
use crate::context::AppContext;
use crate::frame::FrameSwapper;
use crate::media::{MovieDecoder, MovieManifest};
use crate::screen::{is_left_click, MouseInput, Screen, ScreenRequest, Transition};
use crate::text::{draw_centered_text, text_height, wrap_text, GLYPH_ADVANCE};
use log::{error, info, warn};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::sync::Arc;
use std::time::Duration;

pub struct MovieScreen<'a> {
    id: String,
    then: Option<ScreenRequest>,
    swapper: Arc<FrameSwapper>,
    decoder: Option<MovieDecoder>,
    manifest: Option<MovieManifest>,
    frame: FrameTexture<'a>,
    elapsed: Duration,
    done: bool,
}

impl<'a> MovieScreen<'a> {
    /// `then` replaces this screen when playback ends; `None` pops back
    pub fn new(id: String, then: Option<ScreenRequest>) -> Self {
        MovieScreen {
            id,
            then,
            swapper: Arc::new(FrameSwapper::new()),
            decoder: None,
            manifest: None,
            frame: FrameTexture::new(),
            elapsed: Duration::ZERO,
            done: false,
        }
    }

    fn leave(&mut self) -> Transition {
        self.done = true;
        match self.then.take() {
            Some(request) => Transition::Switch(request),
            None => Transition::Pop,
        }
    }
}

impl<'a> Screen<AppContext<'a>> for MovieScreen<'a> {
    fn name(&self) -> &'static str {
        "movie"
    }

    fn on_enter(&mut self, ctx: &mut AppContext<'a>) {
        if self.done || self.decoder.is_some() {
            return;
        }

        let dir = ctx.paths.movies().join(&self.id);
        let manifest = match MovieManifest::load(&dir) {
            Ok(manifest) => manifest,
            Err(err) => {
                error!("movie '{}' unavailable: {}", self.id, err);
                self.done = true;
                return;
            }
        };

        let layout = ctx.layout;
        if let Err(err) = self.swapper.initialize(layout.width, layout.height) {
            warn!("{}", err);
        }

        let frames = manifest.frame_paths(&dir);
        info!("playing '{}' ({} frames at {} fps)", self.id, frames.len(), manifest.fps);
        self.decoder = Some(MovieDecoder::spawn(
            frames,
            manifest.frame_duration(),
            Arc::clone(&self.swapper),
        ));
        self.manifest = Some(manifest);
        self.elapsed = Duration::ZERO;

        if let Some(profile) = ctx.profile.as_mut() {
            if profile.mark_watched(&self.id) {
                ctx.save_profile();
            }
        }
    }

    fn on_leave(&mut self, _ctx: &mut AppContext<'a>) {
        if let Some(mut decoder) = self.decoder.take() {
            decoder.stop();
            let state = decoder.state();
            info!(
                "movie '{}' stopped at frame {} ({} decoded, {} skipped)",
                self.id,
                state.frame(),
                state.decoded(),
                state.skipped()
            );
        }
        self.swapper.release();
        self.frame.clear();
    }

    fn on_resize(&mut self, _ctx: &mut AppContext<'a>, width: u32, height: u32) {
        if self.swapper.dimensions() == Some((width, height)) {
            return;
        }
        if let Err(err) = self.swapper.initialize(width, height) {
            warn!("{}", err);
        }
    }

    fn update(&mut self, _ctx: &mut AppContext<'a>, dt: Duration) -> Transition {
        self.elapsed += dt;
        let finished = self.decoder.as_ref().is_none_or(MovieDecoder::is_finished);
        if finished {
            self.leave()
        } else {
            Transition::None
        }
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'a>) -> Result<(), String> {
        canvas.set_draw_color(Color::RGB(0, 0, 0));
        canvas.clear();

        self.frame.refresh(ctx.textures, &self.swapper)?;
        self.frame.draw(canvas, None)?;

        if !ctx.settings.game.subtitles {
            return Ok(());
        }
        let Some(text) = self.manifest.as_ref().and_then(|m| m.subtitle_at(self.elapsed)) else {
            return Ok(());
        };

        let layout = ctx.layout;
        let scale = layout.scale * 2;
        let max_chars = (layout.width * 8 / 10 / (GLYPH_ADVANCE * scale)) as usize;
        let lines = wrap_text(ctx.tr(text), max_chars);
        let line_height = (text_height(scale) + layout.px(4)) as i32;
        let mut y = layout.height as i32 - layout.px(24) as i32 - line_height * lines.len() as i32;
        for line in &lines {
            draw_centered_text(canvas, line, layout.center_x(), y, Color::RGB(255, 255, 220), scale)?;
            y += line_height;
        }
        Ok(())
    }

    fn keyboard(&mut self, _ctx: &mut AppContext<'a>, key: Keycode, _keymod: Mod) -> Transition {
        match key {
            Keycode::Escape | Keycode::Space | Keycode::Return | Keycode::KpEnter => self.leave(),
            _ => Transition::None,
        }
    }

    fn mouse(&mut self, _ctx: &mut AppContext<'a>, input: MouseInput) -> Transition {
        if is_left_click(&input) {
            self.leave()
        } else {
            Transition::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_follows_up_once() {
        let mut screen = MovieScreen::new("intro".to_string(), Some(ScreenRequest::Profiles));
        assert_eq!(screen.leave(), Transition::Switch(ScreenRequest::Profiles));
        assert!(screen.done);
    }

    #[test]
    fn test_leave_without_follow_up_pops() {
        let mut screen = MovieScreen::new("intro".to_string(), None);
        assert_eq!(screen.leave(), Transition::Pop);
    }
}
