//! Screen stack
//!
//! Owns the open screens, routes input to the top one and applies the
//! transitions screens return.

use super::{Screen, ScreenRequest, Transition};
use crate::input_system::InputEvent;
use log::{debug, info};
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::time::Duration;

type BoxedScreen<'s, C> = Box<dyn Screen<C> + 's>;
type Factory<'s, C> = Box<dyn FnMut(ScreenRequest, &mut C) -> BoxedScreen<'s, C> + 's>;

pub struct ScreenManager<'s, C> {
    stack: Vec<BoxedScreen<'s, C>>,
    factory: Factory<'s, C>,
    size: (u32, u32),
    running: bool,
}

impl<'s, C> ScreenManager<'s, C> {
    /// Creates an empty manager; `factory` builds screens for requests
    pub fn new<F>(factory: F, width: u32, height: u32) -> Self
    where
        F: FnMut(ScreenRequest, &mut C) -> BoxedScreen<'s, C> + 's,
    {
        ScreenManager {
            stack: Vec::new(),
            factory: Box::new(factory),
            size: (width, height),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Name of the top screen
    pub fn current(&self) -> Option<&'static str> {
        self.stack.last().map(|screen| screen.name())
    }

    pub fn wants_text_input(&self) -> bool {
        self.stack.last().is_some_and(|screen| screen.wants_text_input())
    }

    /// Replaces the whole stack with the screen for `request`
    pub fn open(&mut self, ctx: &mut C, request: ScreenRequest) {
        self.leave_top(ctx);
        self.stack.clear();
        self.push(ctx, request);
    }

    /// Applies a transition returned by a screen callback
    pub fn apply(&mut self, ctx: &mut C, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Switch(request) => {
                self.leave_top(ctx);
                self.stack.pop();
                self.push(ctx, request);
            }
            Transition::Push(request) => {
                self.leave_top(ctx);
                self.push(ctx, request);
            }
            Transition::Pop => {
                self.leave_top(ctx);
                self.stack.pop();
                if self.stack.is_empty() {
                    info!("last screen closed");
                    self.running = false;
                } else {
                    self.enter_top(ctx);
                }
            }
            Transition::Quit => self.shutdown(ctx),
        }
    }

    /// Routes one input event to the top screen
    pub fn handle_input(&mut self, ctx: &mut C, event: InputEvent) {
        let transition = match event {
            InputEvent::Quit => {
                self.shutdown(ctx);
                return;
            }
            InputEvent::Resized(width, height) => {
                self.resize(ctx, width, height);
                return;
            }
            InputEvent::Key { key, keymod } => match self.stack.last_mut() {
                Some(screen) => screen.keyboard(ctx, key, keymod),
                None => return,
            },
            InputEvent::Text(text) => match self.stack.last_mut() {
                Some(screen) => screen.text_input(ctx, &text),
                None => return,
            },
            InputEvent::Mouse(input) => match self.stack.last_mut() {
                Some(screen) => screen.mouse(ctx, input),
                None => return,
            },
        };

        self.apply(ctx, transition);
    }

    /// Timer tick for the top screen
    pub fn update(&mut self, ctx: &mut C, dt: Duration) {
        let transition = match self.stack.last_mut() {
            Some(screen) => screen.update(ctx, dt),
            None => return,
        };
        self.apply(ctx, transition);
    }

    pub fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut C) -> Result<(), String> {
        match self.stack.last_mut() {
            Some(screen) => screen.draw(canvas, ctx),
            None => Ok(()),
        }
    }

    /// Records the new output size and tells the top screen
    pub fn resize(&mut self, ctx: &mut C, width: u32, height: u32) {
        self.size = (width, height);
        if let Some(screen) = self.stack.last_mut() {
            screen.on_resize(ctx, width, height);
        }
    }

    /// Leaves the top screen and closes everything
    pub fn shutdown(&mut self, ctx: &mut C) {
        self.leave_top(ctx);
        self.stack.clear();
        self.running = false;
    }

    fn push(&mut self, ctx: &mut C, request: ScreenRequest) {
        debug!("opening {:?}", request);
        let screen = (self.factory)(request, ctx);
        info!("screen: {}", screen.name());
        self.stack.push(screen);
        self.enter_top(ctx);
    }

    fn enter_top(&mut self, ctx: &mut C) {
        let (width, height) = self.size;
        if let Some(screen) = self.stack.last_mut() {
            screen.on_enter(ctx);
            screen.on_resize(ctx, width, height);
        }
    }

    fn leave_top(&mut self, ctx: &mut C) {
        if let Some(screen) = self.stack.last_mut() {
            screen.on_leave(ctx);
        }
    }
}
