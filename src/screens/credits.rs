//! Credits scroller
//!
//! Credits text format, one entry per line:
//!
//! ```text
//! # Design
//! First Person
//! Second Person
//!
//! # Programming
//! ```
//!
//! `#` lines are headings, empty lines are spacers, anything else is a name.

use super::draw_backdrop;
use crate::context::AppContext;
use crate::screen::{is_left_click, MouseInput, Screen, Transition};
use crate::text::draw_centered_text;
use log::warn;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::fs;
use std::time::Duration;

/// Speed multiplier while fast-forwarding
pub const FAST_FORWARD: f32 = 4.0;

/// Line heights in base pixels
const HEADING_HEIGHT: u32 = 28;
const NAME_HEIGHT: u32 = 16;
const SPACER_HEIGHT: u32 = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditLine {
    Heading(String),
    Name(String),
    Spacer,
}

impl CreditLine {
    pub fn height(&self) -> u32 {
        match self {
            CreditLine::Heading(_) => HEADING_HEIGHT,
            CreditLine::Name(_) => NAME_HEIGHT,
            CreditLine::Spacer => SPACER_HEIGHT,
        }
    }
}

pub fn parse_credits(text: &str) -> Vec<CreditLine> {
    text.lines()
        .map(str::trim)
        .map(|line| match line.strip_prefix('#') {
            Some(heading) => CreditLine::Heading(heading.trim().to_string()),
            None if line.is_empty() => CreditLine::Spacer,
            None => CreditLine::Name(line.to_string()),
        })
        .collect()
}

/// Scroll state of the credits, in base pixels
///
/// The roll starts with the first line just below the viewport and is
/// finished once the last line has left the top.
#[derive(Debug, Clone)]
pub struct CreditsRoll {
    lines: Vec<CreditLine>,
    offset: f32,
    speed: f32,
    viewport: u32,
    fast: bool,
    paused: bool,
}

impl CreditsRoll {
    pub fn new(lines: Vec<CreditLine>, speed: f32) -> Self {
        CreditsRoll {
            lines,
            offset: 0.0,
            speed,
            viewport: 360,
            fast: false,
            paused: false,
        }
    }

    pub fn lines(&self) -> &[CreditLine] {
        &self.lines
    }

    pub fn set_viewport(&mut self, height: u32) {
        self.viewport = height;
    }

    pub fn total_height(&self) -> u32 {
        self.lines.iter().map(CreditLine::height).sum()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn toggle_fast(&mut self) {
        self.fast = !self.fast;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn update(&mut self, dt: Duration) {
        if self.paused {
            return;
        }
        let multiplier = if self.fast { FAST_FORWARD } else { 1.0 };
        self.offset += self.speed * multiplier * dt.as_secs_f32();
    }

    pub fn is_finished(&self) -> bool {
        self.offset >= (self.viewport + self.total_height()) as f32
    }

    /// Lines with their top edge in base pixels, only those inside the viewport
    pub fn visible(&self) -> impl Iterator<Item = (i32, &CreditLine)> {
        let viewport = self.viewport as i32;
        let mut y = viewport - self.offset as i32;
        self.lines
            .iter()
            .map(move |line| {
                let top = y;
                y += line.height() as i32;
                (top, line)
            })
            .filter(move |(top, line)| *top + line.height() as i32 > 0 && *top < viewport)
    }
}

pub struct CreditsScreen {
    roll: CreditsRoll,
}

impl CreditsScreen {
    pub fn new() -> Self {
        CreditsScreen {
            roll: CreditsRoll::new(Vec::new(), 0.0),
        }
    }
}

impl Default for CreditsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<AppContext<'_>> for CreditsScreen {
    fn name(&self) -> &'static str {
        "credits"
    }

    fn on_enter(&mut self, ctx: &mut AppContext<'_>) {
        let path = ctx.paths.credits();
        let text = fs::read_to_string(&path).unwrap_or_else(|err| {
            warn!("unable to read credits {}: {}", path.display(), err);
            String::new()
        });
        self.roll = CreditsRoll::new(parse_credits(&text), ctx.settings.game.credits_speed as f32);
    }

    fn on_resize(&mut self, ctx: &mut AppContext<'_>, _width: u32, height: u32) {
        self.roll.set_viewport(height / ctx.layout.scale);
    }

    fn update(&mut self, _ctx: &mut AppContext<'_>, dt: Duration) -> Transition {
        self.roll.update(dt);
        if self.roll.is_finished() {
            Transition::Pop
        } else {
            Transition::None
        }
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'_>) -> Result<(), String> {
        draw_backdrop(canvas, ctx, "credits.png")?;
        let layout = ctx.layout;

        for (top, line) in self.roll.visible() {
            let y = top * layout.scale as i32;
            match line {
                CreditLine::Heading(text) => draw_centered_text(
                    canvas,
                    text,
                    layout.center_x(),
                    y + layout.px(6) as i32,
                    Color::RGB(255, 200, 100),
                    layout.scale * 2,
                )?,
                CreditLine::Name(text) => draw_centered_text(
                    canvas,
                    text,
                    layout.center_x(),
                    y,
                    Color::RGB(220, 220, 230),
                    layout.scale * 2,
                )?,
                CreditLine::Spacer => {}
            }
        }

        if self.roll.is_paused() {
            draw_centered_text(
                canvas,
                ctx.tr("credits.paused"),
                layout.center_x(),
                layout.px(8) as i32,
                Color::RGB(150, 150, 160),
                layout.scale,
            )?;
        }
        Ok(())
    }

    fn keyboard(&mut self, _ctx: &mut AppContext<'_>, key: Keycode, _keymod: Mod) -> Transition {
        match key {
            Keycode::Escape | Keycode::Return | Keycode::KpEnter => Transition::Pop,
            Keycode::Down => {
                self.roll.toggle_fast();
                Transition::None
            }
            Keycode::Space => {
                self.roll.toggle_pause();
                Transition::None
            }
            _ => Transition::None,
        }
    }

    fn mouse(&mut self, _ctx: &mut AppContext<'_>, input: MouseInput) -> Transition {
        if is_left_click(&input) {
            Transition::Pop
        } else {
            Transition::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Design\nAda\nGrace\n\n# Code\nLinus\n";

    #[test]
    fn test_parse_credits() {
        let lines = parse_credits(SAMPLE);
        assert_eq!(
            lines,
            vec![
                CreditLine::Heading("Design".to_string()),
                CreditLine::Name("Ada".to_string()),
                CreditLine::Name("Grace".to_string()),
                CreditLine::Spacer,
                CreditLine::Heading("Code".to_string()),
                CreditLine::Name("Linus".to_string()),
            ]
        );
    }

    #[test]
    fn test_total_height() {
        let roll = CreditsRoll::new(parse_credits(SAMPLE), 10.0);
        assert_eq!(roll.total_height(), 28 * 2 + 16 * 3 + 14);
    }

    #[test]
    fn test_scroll_speed_and_fast_forward() {
        let mut roll = CreditsRoll::new(parse_credits(SAMPLE), 40.0);
        roll.update(Duration::from_millis(500));
        assert_eq!(roll.offset(), 20.0);

        roll.toggle_fast();
        roll.update(Duration::from_millis(500));
        assert_eq!(roll.offset(), 100.0);
    }

    #[test]
    fn test_pause_stops_scrolling() {
        let mut roll = CreditsRoll::new(parse_credits(SAMPLE), 40.0);
        roll.toggle_pause();
        roll.update(Duration::from_secs(5));
        assert_eq!(roll.offset(), 0.0);
        assert!(roll.is_paused());
    }

    #[test]
    fn test_finishes_after_last_line_leaves() {
        let mut roll = CreditsRoll::new(parse_credits("# Only\n"), 100.0);
        roll.set_viewport(100);
        roll.update(Duration::from_millis(1200));
        assert!(!roll.is_finished());
        roll.update(Duration::from_millis(100));
        assert!(roll.is_finished());
    }

    #[test]
    fn test_visible_lines() {
        let mut roll = CreditsRoll::new(parse_credits(SAMPLE), 10.0);
        roll.set_viewport(100);
        // Nothing has entered yet
        assert_eq!(roll.visible().count(), 0);

        roll.update(Duration::from_secs(5));
        let visible: Vec<i32> = roll.visible().map(|(top, _)| top).collect();
        assert_eq!(visible, vec![50, 78, 94]);
    }
}
