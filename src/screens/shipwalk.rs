//! Shipwalk screen
//!
//! First-person walk around the ship. The [`Walker`] tracks position and
//! heading on the UI thread; every change is sent to the renderer thread,
//! which draws into the swapper this screen presents.

use super::{FrameTexture, BACKGROUND};
use crate::context::AppContext;
use crate::frame::FrameSwapper;
use crate::screen::{MouseInput, Screen, Transition};
use crate::ship::{ShipDeck, ShipwalkRenderer, ViewCommand, Walker};
use crate::text::draw_centered_text;
use log::{error, info, warn};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::mouse::MouseButton;
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::sync::Arc;

/// Degrees turned per key press
pub const TURN_STEP: f32 = 10.0;

/// Degrees turned per base pixel of mouse drag
pub const DRAG_SENSITIVITY: f32 = 0.25;

/// Drags shorter than this (base pixels) count as clicks
const CLICK_SLOP: i32 = 3;

pub const DECK_FILE: &str = "deck.json";

/// Mouse state between button down and up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    last_x: i32,
    travelled: i32,
}

pub struct ShipwalkScreen<'a> {
    deck: Option<Arc<ShipDeck>>,
    walker: Option<Walker>,
    renderer: Option<ShipwalkRenderer>,
    swapper: Arc<FrameSwapper>,
    frame: FrameTexture<'a>,
    drag: Option<Drag>,
}

impl<'a> ShipwalkScreen<'a> {
    pub fn new() -> Self {
        ShipwalkScreen {
            deck: None,
            walker: None,
            renderer: None,
            swapper: Arc::new(FrameSwapper::new()),
            frame: FrameTexture::new(),
            drag: None,
        }
    }

    fn look(&self) {
        if let (Some(renderer), Some(walker)) = (&self.renderer, &self.walker) {
            renderer.look(walker.location(), walker.yaw());
        }
    }

    fn turn(&mut self, degrees: f32) {
        if let Some(walker) = self.walker.as_mut() {
            walker.turn(degrees);
        }
        self.look();
    }

    /// Walks through the exit ahead, if there is one
    fn walk(&mut self) {
        let (Some(deck), Some(walker)) = (&self.deck, self.walker.as_mut()) else {
            return;
        };
        let from_yaw = walker.yaw();
        let Some(from) = walker.walk(deck) else {
            return;
        };

        info!("walked from {} to {}", from, walker.location());
        if let Some(renderer) = &self.renderer {
            renderer.send(ViewCommand::Walk {
                from,
                from_yaw,
                to: walker.location().to_string(),
                to_yaw: walker.yaw(),
            });
        }
    }

    /// Render target size: the base resolution, scaled up when drawn
    fn render_size(ctx: &AppContext<'_>, width: u32, height: u32) -> (u32, u32) {
        let scale = ctx.layout.scale.max(1);
        ((width / scale).max(1), (height / scale).max(1))
    }
}

impl Default for ShipwalkScreen<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Screen<AppContext<'a>> for ShipwalkScreen<'a> {
    fn name(&self) -> &'static str {
        "shipwalk"
    }

    fn on_enter(&mut self, ctx: &mut AppContext<'a>) {
        if self.deck.is_none() {
            let path = ctx.paths.ship().join(DECK_FILE);
            match ShipDeck::load(&path) {
                Ok(deck) => {
                    info!("ship deck with {} locations", deck.locations.len());
                    self.walker = Some(Walker::new(&deck));
                    self.deck = Some(Arc::new(deck));
                }
                Err(err) => {
                    error!("unable to load ship deck {}: {}", path.display(), err);
                    return;
                }
            }
        }

        let Some(deck) = &self.deck else {
            return;
        };
        let (width, height) = Self::render_size(ctx, ctx.layout.width, ctx.layout.height);
        if let Err(err) = self.swapper.initialize(width, height) {
            warn!("{}", err);
        }
        self.renderer = Some(ShipwalkRenderer::spawn(
            Arc::clone(deck),
            ctx.paths.ship(),
            Arc::clone(&self.swapper),
        ));
        self.look();
    }

    fn on_leave(&mut self, _ctx: &mut AppContext<'a>) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.stop();
        }
        self.swapper.release();
        self.frame.clear();
        self.drag = None;
    }

    fn on_resize(&mut self, ctx: &mut AppContext<'a>, width: u32, height: u32) {
        let size = Self::render_size(ctx, width, height);
        if self.renderer.is_none() || self.swapper.dimensions() == Some(size) {
            return;
        }
        if let Err(err) = self.swapper.initialize(size.0, size.1) {
            warn!("{}", err);
        }
        self.look();
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'a>) -> Result<(), String> {
        canvas.set_draw_color(BACKGROUND);
        canvas.clear();
        let layout = ctx.layout;
        let cx = layout.center_x();

        let (Some(deck), Some(walker)) = (&self.deck, &self.walker) else {
            return draw_centered_text(
                canvas,
                ctx.tr("ship.unavailable"),
                cx,
                layout.center_y(),
                Color::RGB(255, 120, 100),
                layout.scale * 2,
            );
        };

        self.frame.refresh(ctx.textures, &self.swapper)?;
        self.frame.draw(canvas, None)?;

        if let Some(location) = deck.location(walker.location()) {
            draw_centered_text(
                canvas,
                ctx.tr(&location.name),
                cx,
                layout.px(12) as i32,
                Color::RGB(220, 220, 240),
                layout.scale * 2,
            )?;
        }

        if let Some(exit) = walker.exit_ahead(deck) {
            let hint = format!("^ {}", ctx.tr(&exit.label));
            draw_centered_text(
                canvas,
                &hint,
                cx,
                layout.height as i32 - layout.px(28) as i32,
                Color::RGB(255, 200, 100),
                layout.scale * 2,
            )?;
        }
        Ok(())
    }

    fn keyboard(&mut self, _ctx: &mut AppContext<'a>, key: Keycode, _keymod: Mod) -> Transition {
        match key {
            Keycode::Left | Keycode::A => self.turn(-TURN_STEP),
            Keycode::Right | Keycode::D => self.turn(TURN_STEP),
            Keycode::Up | Keycode::W | Keycode::Return | Keycode::KpEnter => self.walk(),
            Keycode::Escape => return Transition::Pop,
            _ => {}
        }
        Transition::None
    }

    fn mouse(&mut self, ctx: &mut AppContext<'a>, input: MouseInput) -> Transition {
        let scale = ctx.layout.scale as i32;
        match input {
            MouseInput::Down {
                x,
                button: MouseButton::Left,
                ..
            } => {
                self.drag = Some(Drag {
                    last_x: x,
                    travelled: 0,
                });
            }
            MouseInput::Motion { x, held: true, .. } => {
                if let Some(mut drag) = self.drag {
                    let dx = (x - drag.last_x) / scale;
                    if dx != 0 {
                        drag.last_x = x;
                        drag.travelled += dx.abs();
                        self.drag = Some(drag);
                        self.turn(dx as f32 * DRAG_SENSITIVITY);
                    }
                }
            }
            MouseInput::Up {
                button: MouseButton::Left,
                ..
            } => {
                if let Some(drag) = self.drag.take() {
                    if drag.travelled < CLICK_SLOP {
                        self.walk();
                    }
                }
            }
            _ => {}
        }
        Transition::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> ShipDeck {
        serde_json::from_str(
            r#"{
                "start": "bridge",
                "locations": [
                    { "id": "bridge", "name": "BRIDGE", "panorama": "bridge.png",
                      "exits": [{ "yaw": 0, "target": "hold", "label": "HOLD", "arrive_yaw": 90 }] },
                    { "id": "hold", "name": "HOLD", "panorama": "hold.png", "exits": [] }
                ]
            }"#,
        )
        .unwrap()
    }

    fn screen() -> ShipwalkScreen<'static> {
        let deck = deck();
        let mut screen = ShipwalkScreen::new();
        screen.walker = Some(Walker::new(&deck));
        screen.deck = Some(Arc::new(deck));
        screen
    }

    #[test]
    fn test_turn_without_renderer() {
        let mut screen = screen();
        screen.turn(-TURN_STEP);
        assert_eq!(screen.walker.as_ref().unwrap().yaw(), 350.0);
    }

    #[test]
    fn test_walk_moves_walker() {
        let mut screen = screen();
        screen.walk();
        let walker = screen.walker.as_ref().unwrap();
        assert_eq!(walker.location(), "hold");
        assert_eq!(walker.yaw(), 90.0);

        // No exits in the hold
        screen.walk();
        assert_eq!(screen.walker.as_ref().unwrap().location(), "hold");
    }

    #[test]
    fn test_walk_without_deck_is_ignored() {
        let mut screen = ShipwalkScreen::new();
        screen.walk();
        screen.turn(TURN_STEP);
        assert!(screen.walker.is_none());
    }
}
