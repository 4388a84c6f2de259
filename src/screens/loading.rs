//! Loading screen
//!
//! Runs the startup steps one per tick so the spinner keeps turning, then
//! hands over to the intro movie or the profile selector.

use super::BACKGROUND;
use crate::context::AppContext;
use crate::gui::{ProgressBar, ProgressBarStyle, Spinner};
use crate::media::VideoLibrary;
use crate::screen::{Screen, ScreenRequest, Transition};
use crate::text::draw_centered_text;
use log::warn;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::time::Duration;

/// The loading screen stays up at least this long
pub const MIN_DISPLAY: Duration = Duration::from_secs(1);

/// Movie played after loading
pub const INTRO_MOVIE: &str = "intro";

/// Images decoded ahead of their first use
const WARM_IMAGES: [&str; 3] = ["menu.png", "credits.png", "gameover.png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    Strings,
    Profile,
    Library,
    Images,
}

pub const STEPS: [LoadStep; 4] = [
    LoadStep::Strings,
    LoadStep::Profile,
    LoadStep::Library,
    LoadStep::Images,
];

impl LoadStep {
    pub fn label_key(self) -> &'static str {
        match self {
            LoadStep::Strings => "loading.strings",
            LoadStep::Profile => "loading.profile",
            LoadStep::Library => "loading.library",
            LoadStep::Images => "loading.images",
        }
    }

    fn run(self, ctx: &mut AppContext<'_>) -> Result<(), String> {
        match self {
            LoadStep::Strings => ctx.reload_strings(),
            LoadStep::Profile => {
                if ctx.profile.is_none() {
                    if let Some(name) = ctx.settings.last_profile.clone() {
                        let profile = ctx.profiles.load(&name).map_err(|e| e.to_string())?;
                        ctx.profile = Some(profile);
                    }
                }
            }
            LoadStep::Library => {
                ctx.library = VideoLibrary::scan(&ctx.paths.movies());
            }
            LoadStep::Images => {
                let missing = WARM_IMAGES.iter().filter(|name| !ctx.images.preload(name)).count();
                if missing > 0 {
                    return Err(format!("{} images unavailable", missing));
                }
            }
        }
        Ok(())
    }
}

/// Progress through an ordered list of steps
#[derive(Debug, Clone)]
pub struct LoadSchedule {
    steps: Vec<LoadStep>,
    done: usize,
    elapsed: Duration,
}

impl LoadSchedule {
    pub fn new(steps: Vec<LoadStep>) -> Self {
        LoadSchedule {
            steps,
            done: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    /// Takes the next step to run, if any
    pub fn next_step(&mut self) -> Option<LoadStep> {
        let step = self.steps.get(self.done).copied()?;
        self.done += 1;
        Some(step)
    }

    /// Step shown while waiting for the next tick
    pub fn pending(&self) -> Option<LoadStep> {
        self.steps.get(self.done).copied()
    }

    pub fn fraction(&self) -> f32 {
        if self.steps.is_empty() {
            1.0
        } else {
            self.done as f32 / self.steps.len() as f32
        }
    }

    /// All steps run and the minimum display time passed
    pub fn is_ready(&self) -> bool {
        self.done >= self.steps.len() && self.elapsed >= MIN_DISPLAY
    }
}

/// Screen opened once loading finishes
pub fn follow_up(skip_intro: bool, intro_available: bool, skip_seen: bool, intro_seen: bool) -> ScreenRequest {
    if skip_intro || !intro_available || (skip_seen && intro_seen) {
        ScreenRequest::Profiles
    } else {
        ScreenRequest::Movie {
            id: INTRO_MOVIE.to_string(),
            then: Some(Box::new(ScreenRequest::Profiles)),
        }
    }
}

pub struct LoadingScreen {
    schedule: LoadSchedule,
    spinner: Spinner,
    bar: ProgressBar,
    skip_intro: bool,
}

impl LoadingScreen {
    pub fn new(skip_intro: bool) -> Self {
        LoadingScreen {
            schedule: LoadSchedule::new(STEPS.to_vec()),
            spinner: Spinner::default(),
            bar: ProgressBar::with_style(ProgressBarStyle {
                fill_color: Color::RGB(110, 170, 110),
                border_color: Color::RGB(90, 90, 110),
                ..Default::default()
            }),
            skip_intro,
        }
    }
}

impl Screen<AppContext<'_>> for LoadingScreen {
    fn name(&self) -> &'static str {
        "loading"
    }

    fn update(&mut self, ctx: &mut AppContext<'_>, dt: Duration) -> Transition {
        self.spinner.update(dt);
        self.schedule.tick(dt);

        if let Some(step) = self.schedule.next_step() {
            if let Err(err) = step.run(ctx) {
                warn!("loading step {:?} failed: {}", step, err);
            }
            return Transition::None;
        }

        if self.schedule.is_ready() {
            let next = follow_up(
                self.skip_intro,
                ctx.library.get(INTRO_MOVIE).is_some(),
                ctx.settings.game.skip_seen_movies,
                ctx.has_watched(INTRO_MOVIE),
            );
            return Transition::Switch(next);
        }
        Transition::None
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'_>) -> Result<(), String> {
        canvas.set_draw_color(BACKGROUND);
        canvas.clear();
        let layout = ctx.layout;
        let cx = layout.center_x();
        let cy = layout.center_y();

        self.spinner
            .render(canvas, cx, cy - layout.px(30) as i32, layout.px(18), layout.px(4))?;

        let bar_width = layout.px(240);
        let area = Rect::new(cx - (bar_width / 2) as i32, cy + layout.px(10) as i32, bar_width, layout.px(8));
        self.bar.render(canvas, area, self.schedule.fraction())?;

        let label = match self.schedule.pending() {
            Some(step) => ctx.tr(step.label_key()),
            None => ctx.tr("loading.done"),
        };
        draw_centered_text(canvas, label, cx, cy + layout.px(28) as i32, Color::RGB(150, 150, 160), layout.scale)
    }

    fn keyboard(&mut self, _ctx: &mut AppContext<'_>, key: Keycode, _keymod: Mod) -> Transition {
        match key {
            Keycode::Escape => Transition::Quit,
            _ => Transition::None,
        }
    }
}
