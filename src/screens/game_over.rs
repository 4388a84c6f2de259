//! Game Over Screen
//!
//! Shown when a campaign ends. Statistics are revealed one at a time; input
//! is ignored for a short moment so a key still held from the game doesn't
//! skip the screen.

use super::draw_backdrop;
use crate::context::AppContext;
use crate::screen::{is_left_click, MouseInput, Screen, ScreenRequest, Transition};
use crate::text::{draw_centered_text, draw_simple_text, text_width};
use serde::{Deserialize, Serialize};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Delay between two revealed statistics
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(400);

/// Input is ignored until this much time has passed
pub const INPUT_DELAY: Duration = Duration::from_millis(1500);

#[derive(thiserror::Error, Debug)]
pub enum SummaryError {
    #[error("unable to read summary: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a finished game, handed over by the game itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSummary {
    pub victory: bool,
    pub title: String,
    /// (label, value) pairs in display order
    pub stats: Vec<(String, String)>,
    pub play_seconds: u64,
}

impl GameSummary {
    pub fn load(path: &Path) -> Result<Self, SummaryError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Formats seconds as `H:MM:SS`
pub fn format_play_time(seconds: u64) -> String {
    format!("{}:{:02}:{:02}", seconds / 3600, seconds / 60 % 60, seconds % 60)
}

/// Reveal timer of the game over screen
#[derive(Debug, Clone)]
pub struct GameOverState {
    elapsed: Duration,
    stat_count: usize,
}

impl GameOverState {
    pub fn new(stat_count: usize) -> Self {
        GameOverState {
            elapsed: Duration::ZERO,
            stat_count,
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    /// Number of statistics shown so far
    pub fn visible_stats(&self) -> usize {
        let revealed = (self.elapsed.as_millis() / REVEAL_INTERVAL.as_millis()) as usize;
        revealed.min(self.stat_count)
    }

    pub fn accepts_input(&self) -> bool {
        self.elapsed >= INPUT_DELAY
    }

    /// Where to go once the player continues
    ///
    /// A victory rolls the credits in place of this screen; a defeat returns
    /// to the menu underneath.
    pub fn continue_transition(victory: bool) -> Transition {
        if victory {
            Transition::Switch(ScreenRequest::Credits)
        } else {
            Transition::Pop
        }
    }
}

pub struct GameOverScreen {
    summary: GameSummary,
    state: GameOverState,
}

impl GameOverScreen {
    pub fn new(summary: GameSummary) -> Self {
        let state = GameOverState::new(summary.stats.len());
        GameOverScreen { summary, state }
    }

    fn proceed(&self) -> Transition {
        if self.state.accepts_input() {
            GameOverState::continue_transition(self.summary.victory)
        } else {
            Transition::None
        }
    }
}

impl Screen<AppContext<'_>> for GameOverScreen {
    fn name(&self) -> &'static str {
        "game-over"
    }

    fn update(&mut self, _ctx: &mut AppContext<'_>, dt: Duration) -> Transition {
        self.state.update(dt);
        Transition::None
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'_>) -> Result<(), String> {
        draw_backdrop(canvas, ctx, "gameover.png")?;
        let layout = ctx.layout;
        let cx = layout.center_x();

        let (title_key, title_color) = if self.summary.victory {
            ("gameover.victory", Color::RGB(100, 255, 140))
        } else {
            ("gameover.defeat", Color::RGB(255, 50, 50))
        };
        draw_centered_text(canvas, ctx.tr(title_key), cx, layout.px(40) as i32, title_color, layout.scale * 4)?;

        if !self.summary.title.is_empty() {
            draw_centered_text(
                canvas,
                &self.summary.title,
                cx,
                layout.px(80) as i32,
                Color::RGB(220, 220, 230),
                layout.scale * 2,
            )?;
        }

        // Stats: label left of centre, value right of it
        let gap = layout.px(10) as i32;
        let row_height = layout.px(18) as i32;
        let mut y = layout.px(115) as i32;
        let stat_scale = layout.scale * 2;
        for (label, value) in self.summary.stats.iter().take(self.state.visible_stats()) {
            let label_x = cx - gap - text_width(label, stat_scale) as i32;
            draw_simple_text(canvas, label, label_x, y, Color::RGB(150, 150, 160), stat_scale)?;
            draw_simple_text(canvas, value, cx + gap, y, Color::RGB(255, 255, 100), stat_scale)?;
            y += row_height;
        }

        if self.state.visible_stats() == self.summary.stats.len() {
            let time = format!("{} {}", ctx.tr("gameover.play_time"), format_play_time(self.summary.play_seconds));
            draw_centered_text(canvas, &time, cx, y + row_height, Color::RGB(180, 220, 255), stat_scale)?;
        }

        if self.state.accepts_input() {
            draw_centered_text(
                canvas,
                ctx.tr("gameover.continue"),
                cx,
                layout.height as i32 - layout.px(30) as i32,
                Color::RGB(150, 150, 160),
                layout.scale,
            )?;
        }
        Ok(())
    }

    fn keyboard(&mut self, _ctx: &mut AppContext<'_>, _key: Keycode, _keymod: Mod) -> Transition {
        self.proceed()
    }

    fn mouse(&mut self, _ctx: &mut AppContext<'_>, input: MouseInput) -> Transition {
        if is_left_click(&input) {
            self.proceed()
        } else {
            Transition::None
        }
    }
}
