//! Screen Contract
//!
//! Every front-end view implements [`Screen`]: a fixed callback set that the
//! [`ScreenManager`] drives. Screens never switch themselves; input and
//! update callbacks return a [`Transition`] which the manager applies.
//!
//! # Lifecycle
//!
//! - `on_enter` runs whenever a screen becomes the top of the stack
//!   (opened, or revealed by a pop), followed by `on_resize`
//! - `on_leave` runs whenever it stops being the top (replaced, covered by
//!   a push, popped, or shut down)
//! - `update` is the timer tick, `draw` the immediate-mode paint

pub mod manager;

pub use manager::ScreenManager;

use sdl2::keyboard::{Keycode, Mod};
use sdl2::mouse::MouseButton;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::time::Duration;

/// Mouse input delivered to screens, in window pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseInput {
    Down { x: i32, y: i32, button: MouseButton },
    Up { x: i32, y: i32, button: MouseButton },
    /// `held` is true while the left button is down (drag)
    Motion { x: i32, y: i32, held: bool },
    Wheel { dy: i32 },
}

/// Settings group edited by one settings page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPage {
    Video,
    Audio,
    Game,
}

/// Which screen to open
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenRequest {
    Loading { skip_intro: bool },
    MainMenu,
    Credits,
    Settings,
    SettingsPage(SettingsPage),
    GameOver,
    Profiles,
    Shipwalk,
    PsychTest,
    VideoLibrary,
    /// Plays a movie, then opens `then` (or pops back when `None`)
    Movie {
        id: String,
        then: Option<Box<ScreenRequest>>,
    },
}

/// What the manager should do after a callback
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    None,
    /// Replace the top screen
    Switch(ScreenRequest),
    /// Open a screen on top of the current one
    Push(ScreenRequest),
    /// Close the top screen, revealing the one below
    Pop,
    Quit,
}

/// A front-end view bound to the shared context `C`
pub trait Screen<C> {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn on_enter(&mut self, _ctx: &mut C) {}

    fn on_leave(&mut self, _ctx: &mut C) {}

    fn on_resize(&mut self, _ctx: &mut C, _width: u32, _height: u32) {}

    fn update(&mut self, _ctx: &mut C, _dt: Duration) -> Transition {
        Transition::None
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut C) -> Result<(), String>;

    fn keyboard(&mut self, ctx: &mut C, key: Keycode, keymod: Mod) -> Transition;

    fn mouse(&mut self, _ctx: &mut C, _input: MouseInput) -> Transition {
        Transition::None
    }

    fn text_input(&mut self, _ctx: &mut C, _text: &str) -> Transition {
        Transition::None
    }

    /// Whether SDL text input should be active while this screen is on top
    fn wants_text_input(&self) -> bool {
        false
    }
}

/// Whether a mouse input is a left click
pub fn is_left_click(input: &MouseInput) -> bool {
    matches!(
        input,
        MouseInput::Down {
            button: MouseButton::Left,
            ..
        }
    )
}
