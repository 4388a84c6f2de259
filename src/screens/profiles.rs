//! Profile selector
//!
//! Lists the saved profiles plus a NEW PROFILE row, scrolling once there
//! are more than [`PAGE_ROWS`]. Creating a profile switches into text
//! entry; deleting one asks for confirmation first.

use super::draw_backdrop;
use crate::context::AppContext;
use crate::profile::{ProfileSummary, MAX_NAME_LEN};
use crate::screen::{is_left_click, MouseInput, Screen, ScreenRequest, Transition};
use crate::text::{draw_centered_text, draw_simple_text, text_height, text_width};
use chrono::{DateTime, Local};
use log::{error, warn};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::ops::Range;
use std::time::SystemTime;

/// Rows shown at once; longer lists scroll
pub const PAGE_ROWS: usize = 10;

/// Base-resolution geometry
const LIST_WIDTH: u32 = 360;
const LIST_TOP: u32 = 70;
const ROW_HEIGHT: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Typing a new profile name
    Entry { name: String, error: Option<String> },
    /// Waiting for Y/N before deleting the named profile
    ConfirmDelete(String),
}

#[derive(Debug, Clone)]
pub struct ProfileSelector {
    entries: Vec<ProfileSummary>,
    selected: usize,
    scroll: usize,
    mode: Mode,
}

impl ProfileSelector {
    pub fn new(entries: Vec<ProfileSummary>) -> Self {
        ProfileSelector {
            entries,
            selected: 0,
            scroll: 0,
            mode: Mode::Browse,
        }
    }

    pub fn set_entries(&mut self, entries: Vec<ProfileSummary>) {
        self.entries = entries;
        self.selected = self.selected.min(self.entries.len());
        self.scroll = self.scroll.min(self.max_scroll());
        self.ensure_visible();
    }

    pub fn entries(&self) -> &[ProfileSummary] {
        &self.entries
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Profiles plus the trailing NEW PROFILE row
    pub fn row_count(&self) -> usize {
        self.entries.len() + 1
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.row_count() {
            self.selected = index;
            self.ensure_visible();
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.row_count();
        self.ensure_visible();
    }

    pub fn select_previous(&mut self) {
        self.selected = (self.selected + self.row_count() - 1) % self.row_count();
        self.ensure_visible();
    }

    /// Row indices currently on screen
    pub fn visible(&self) -> Range<usize> {
        self.scroll..(self.scroll + PAGE_ROWS).min(self.row_count())
    }

    /// Scrolls the list (mouse wheel) and drags the selection along
    pub fn scroll_by(&mut self, delta: isize) {
        let target = (self.scroll as isize + delta).clamp(0, self.max_scroll() as isize);
        self.scroll = target as usize;
        let visible = self.visible();
        self.selected = self.selected.clamp(visible.start, visible.end - 1);
    }

    fn max_scroll(&self) -> usize {
        self.row_count().saturating_sub(PAGE_ROWS)
    }

    fn ensure_visible(&mut self) {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + PAGE_ROWS {
            self.scroll = self.selected + 1 - PAGE_ROWS;
        }
    }

    pub fn selected_entry(&self) -> Option<&ProfileSummary> {
        self.entries.get(self.selected)
    }

    pub fn is_new_row(&self) -> bool {
        self.selected == self.entries.len()
    }

    pub fn begin_entry(&mut self) {
        self.mode = Mode::Entry {
            name: String::new(),
            error: None,
        };
    }

    /// Appends typed text, up to the name length limit
    pub fn push_text(&mut self, text: &str) {
        if let Mode::Entry { name, error } = &mut self.mode {
            for c in text.chars().filter(|c| !c.is_control()) {
                if name.chars().count() >= MAX_NAME_LEN {
                    break;
                }
                name.push(c);
            }
            *error = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Mode::Entry { name, error } = &mut self.mode {
            name.pop();
            *error = None;
        }
    }

    pub fn set_error(&mut self, message: String) {
        if let Mode::Entry { error, .. } = &mut self.mode {
            *error = Some(message);
        }
    }

    /// Asks to delete the selected profile; `false` on the NEW PROFILE row
    pub fn begin_delete(&mut self) -> bool {
        match self.selected_entry() {
            Some(entry) => {
                self.mode = Mode::ConfirmDelete(entry.name.clone());
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.mode = Mode::Browse;
    }
}

pub fn format_last_played(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M").to_string()
}

pub struct ProfilesScreen {
    selector: ProfileSelector,
}

impl ProfilesScreen {
    pub fn new() -> Self {
        ProfilesScreen {
            selector: ProfileSelector::new(Vec::new()),
        }
    }

    fn reload(&mut self, ctx: &AppContext<'_>) {
        match ctx.profiles.list() {
            Ok(entries) => self.selector.set_entries(entries),
            Err(err) => {
                error!("unable to list profiles: {}", err);
                self.selector.set_entries(Vec::new());
            }
        }
    }

    /// Rectangle of on-screen row `row` (not the entry index)
    fn row_rect(&self, row: usize, ctx: &AppContext<'_>) -> Rect {
        let layout = ctx.layout;
        let width = layout.px(LIST_WIDTH);
        Rect::new(
            layout.center_x() - (width / 2) as i32,
            layout.px(LIST_TOP + row as u32 * ROW_HEIGHT) as i32,
            width,
            layout.px(ROW_HEIGHT),
        )
    }

    fn choose(&mut self, ctx: &mut AppContext<'_>) -> Transition {
        let Some(entry) = self.selector.selected_entry() else {
            self.selector.begin_entry();
            return Transition::None;
        };

        match ctx.profiles.load(&entry.name) {
            Ok(profile) => {
                ctx.activate_profile(profile);
                Transition::Switch(ScreenRequest::MainMenu)
            }
            Err(err) => {
                error!("unable to load profile '{}': {}", entry.name, err);
                self.reload(ctx);
                Transition::None
            }
        }
    }

    fn create(&mut self, ctx: &mut AppContext<'_>) -> Transition {
        let Mode::Entry { name, .. } = self.selector.mode() else {
            return Transition::None;
        };

        match ctx.profiles.create(name) {
            Ok(profile) => {
                self.selector.cancel();
                ctx.activate_profile(profile);
                Transition::Switch(ScreenRequest::MainMenu)
            }
            Err(err) => {
                self.selector.set_error(err.to_string());
                Transition::None
            }
        }
    }

    fn delete(&mut self, ctx: &mut AppContext<'_>, name: &str) {
        if let Err(err) = ctx.profiles.delete(name) {
            warn!("unable to delete profile '{}': {}", name, err);
        }
        if ctx.profile_name() == Some(name) {
            ctx.profile = None;
        }
        if ctx.settings.last_profile.as_deref() == Some(name) {
            ctx.settings.last_profile = None;
            ctx.save_settings();
        }
        self.selector.cancel();
        self.reload(ctx);
    }

    fn draw_list(&self, canvas: &mut Canvas<Window>, ctx: &AppContext<'_>) -> Result<(), String> {
        let layout = ctx.layout;
        let scale = layout.scale * 2;

        let visible = self.selector.visible();
        for (slot, index) in visible.clone().enumerate() {
            let row = self.row_rect(slot, ctx);
            let selected = index == self.selector.selected();
            if selected {
                canvas.set_draw_color(Color::RGB(40, 60, 100));
                canvas.fill_rect(row)?;
            }

            let text_y = row.y() + (row.height() as i32 - text_height(scale) as i32) / 2;
            let color = if selected {
                Color::RGB(255, 255, 255)
            } else {
                Color::RGB(180, 180, 190)
            };
            let x = row.x() + layout.px(8) as i32;

            match self.selector.entries().get(index) {
                Some(entry) => {
                    draw_simple_text(canvas, &entry.name, x, text_y, color, scale)?;
                    let played = format_last_played(entry.last_played);
                    let played_x =
                        row.right() - layout.px(8) as i32 - text_width(&played, layout.scale) as i32;
                    draw_simple_text(
                        canvas,
                        &played,
                        played_x,
                        text_y + layout.px(4) as i32,
                        Color::RGB(120, 120, 140),
                        layout.scale,
                    )?;
                }
                None => draw_simple_text(canvas, ctx.tr("profiles.new"), x, text_y, Color::RGB(100, 255, 100), scale)?,
            }
        }

        // Scroll markers beside the first and last rows
        let marker_x = self.row_rect(0, ctx).right() + layout.px(6) as i32;
        let arrow = Color::RGB(150, 150, 170);
        if visible.start > 0 {
            draw_simple_text(canvas, "^", marker_x, self.row_rect(0, ctx).y(), arrow, scale)?;
        }
        if visible.end < self.selector.row_count() {
            let last = self.row_rect(PAGE_ROWS - 1, ctx);
            draw_simple_text(canvas, "v", marker_x, last.y(), arrow, scale)?;
        }
        Ok(())
    }

    fn draw_dialog(&self, canvas: &mut Canvas<Window>, ctx: &AppContext<'_>) -> Result<(), String> {
        let layout = ctx.layout;
        let (prompt, line, note) = match self.selector.mode() {
            Mode::Browse => return Ok(()),
            Mode::Entry { name, error } => (
                ctx.tr("profiles.enter_name").to_string(),
                format!("{}_", name),
                error.clone(),
            ),
            Mode::ConfirmDelete(name) => (
                ctx.tr("profiles.confirm_delete").to_string(),
                name.clone(),
                Some(ctx.tr("profiles.yes_no").to_string()),
            ),
        };

        let width = layout.px(380);
        let height = layout.px(100);
        let panel = Rect::new(
            layout.center_x() - (width / 2) as i32,
            layout.center_y() - (height / 2) as i32,
            width,
            height,
        );
        canvas.set_draw_color(Color::RGB(20, 20, 30));
        canvas.fill_rect(panel)?;
        canvas.set_draw_color(Color::RGB(80, 120, 180));
        canvas.draw_rect(panel)?;

        let cx = layout.center_x();
        draw_centered_text(canvas, &prompt, cx, panel.y() + layout.px(12) as i32, Color::RGB(180, 220, 255), layout.scale * 2)?;
        draw_centered_text(canvas, &line, cx, panel.y() + layout.px(42) as i32, Color::RGB(255, 255, 255), layout.scale * 2)?;
        if let Some(note) = note {
            draw_centered_text(canvas, &note, cx, panel.y() + layout.px(76) as i32, Color::RGB(255, 120, 100), layout.scale)?;
        }
        Ok(())
    }
}

impl Default for ProfilesScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<AppContext<'_>> for ProfilesScreen {
    fn name(&self) -> &'static str {
        "profiles"
    }

    fn on_enter(&mut self, ctx: &mut AppContext<'_>) {
        self.selector.cancel();
        self.reload(ctx);
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'_>) -> Result<(), String> {
        draw_backdrop(canvas, ctx, "menu.png")?;
        let layout = ctx.layout;
        draw_centered_text(
            canvas,
            ctx.tr("profiles.title"),
            layout.center_x(),
            layout.px(30) as i32,
            Color::RGB(220, 220, 240),
            layout.scale * 3,
        )?;
        self.draw_list(canvas, ctx)?;
        self.draw_dialog(canvas, ctx)
    }

    fn keyboard(&mut self, ctx: &mut AppContext<'_>, key: Keycode, _keymod: Mod) -> Transition {
        match self.selector.mode().clone() {
            Mode::Browse => match key {
                Keycode::Up => self.selector.select_previous(),
                Keycode::Down => self.selector.select_next(),
                Keycode::Return | Keycode::KpEnter => return self.choose(ctx),
                Keycode::Delete => {
                    self.selector.begin_delete();
                }
                Keycode::Escape => {
                    return if ctx.profile.is_some() {
                        Transition::Switch(ScreenRequest::MainMenu)
                    } else {
                        Transition::Quit
                    };
                }
                _ => {}
            },
            Mode::Entry { .. } => match key {
                Keycode::Backspace => self.selector.backspace(),
                Keycode::Return | Keycode::KpEnter => return self.create(ctx),
                Keycode::Escape => self.selector.cancel(),
                _ => {}
            },
            Mode::ConfirmDelete(name) => match key {
                Keycode::Y => self.delete(ctx, &name),
                Keycode::N | Keycode::Escape => self.selector.cancel(),
                _ => {}
            },
        }
        Transition::None
    }

    fn mouse(&mut self, ctx: &mut AppContext<'_>, input: MouseInput) -> Transition {
        if *self.selector.mode() != Mode::Browse {
            return Transition::None;
        }

        let (x, y) = match input {
            MouseInput::Motion { x, y, .. } | MouseInput::Down { x, y, .. } => (x, y),
            MouseInput::Wheel { dy } => {
                self.selector.scroll_by(-(dy as isize));
                return Transition::None;
            }
            _ => return Transition::None,
        };
        let visible = self.selector.visible();
        let Some(slot) = (0..visible.len()).find(|&i| self.row_rect(i, ctx).contains_point((x, y))) else {
            return Transition::None;
        };
        let index = visible.start + slot;

        self.selector.select(index);
        if is_left_click(&input) {
            self.choose(ctx)
        } else {
            Transition::None
        }
    }

    fn text_input(&mut self, _ctx: &mut AppContext<'_>, text: &str) -> Transition {
        self.selector.push_text(text);
        Transition::None
    }

    fn wants_text_input(&self) -> bool {
        matches!(self.selector.mode(), Mode::Entry { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn summaries(names: &[&str]) -> Vec<ProfileSummary> {
        names
            .iter()
            .map(|name| ProfileSummary {
                name: name.to_string(),
                last_played: SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000),
                play_count: 1,
            })
            .collect()
    }

    fn entries() -> Vec<ProfileSummary> {
        summaries(&["Vega", "Rigel"])
    }

    fn many(count: usize) -> Vec<ProfileSummary> {
        let names: Vec<String> = (0..count).map(|i| format!("Pilot{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        summaries(&refs)
    }

    #[test]
    fn test_navigation_includes_new_row() {
        let mut selector = ProfileSelector::new(entries());
        assert_eq!(selector.row_count(), 3);
        selector.select_previous();
        assert!(selector.is_new_row());
        assert!(selector.selected_entry().is_none());
        selector.select_next();
        assert_eq!(selector.selected_entry().unwrap().name, "Vega");
    }

    #[test]
    fn test_name_entry() {
        let mut selector = ProfileSelector::new(Vec::new());
        selector.push_text("ignored");
        assert_eq!(*selector.mode(), Mode::Browse);

        selector.begin_entry();
        selector.push_text("Cmdr");
        selector.push_text(" Shepard");
        selector.backspace();
        assert_eq!(
            *selector.mode(),
            Mode::Entry {
                name: "Cmdr Shepar".to_string(),
                error: None
            }
        );

        selector.set_error("taken".to_string());
        selector.push_text("d");
        assert!(matches!(selector.mode(), Mode::Entry { error: None, .. }));
    }

    #[test]
    fn test_name_entry_is_length_limited() {
        let mut selector = ProfileSelector::new(Vec::new());
        selector.begin_entry();
        selector.push_text(&"x".repeat(MAX_NAME_LEN + 5));
        match selector.mode() {
            Mode::Entry { name, .. } => assert_eq!(name.len(), MAX_NAME_LEN),
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn test_delete_confirmation() {
        let mut selector = ProfileSelector::new(entries());
        selector.select(1);
        assert!(selector.begin_delete());
        assert_eq!(*selector.mode(), Mode::ConfirmDelete("Rigel".to_string()));
        selector.cancel();
        assert_eq!(*selector.mode(), Mode::Browse);

        selector.select(2);
        assert!(!selector.begin_delete());
    }

    #[test]
    fn test_long_list_scrolls_with_selection() {
        let mut selector = ProfileSelector::new(many(20));
        assert_eq!(selector.row_count(), 21);
        assert_eq!(selector.visible(), 0..PAGE_ROWS);

        selector.select(15);
        assert_eq!(selector.visible().start, 15 + 1 - PAGE_ROWS);
        assert!(selector.visible().contains(&15));

        selector.select(3);
        assert_eq!(selector.visible().start, 3);

        // Wrapping up from the top lands on NEW PROFILE at the bottom
        selector.select(0);
        selector.select_previous();
        assert!(selector.is_new_row());
        assert_eq!(selector.visible(), 11..21);
    }

    #[test]
    fn test_wheel_scroll_drags_selection() {
        let mut selector = ProfileSelector::new(many(20));
        selector.scroll_by(4);
        assert_eq!(selector.visible().start, 4);
        assert_eq!(selector.selected(), 4);

        selector.scroll_by(100);
        assert_eq!(selector.visible().start, 21 - PAGE_ROWS);
        selector.scroll_by(-100);
        assert_eq!(selector.visible().start, 0);

        let mut short = ProfileSelector::new(entries());
        short.scroll_by(3);
        assert_eq!(short.visible().start, 0);
        assert_eq!(short.visible(), 0..3);
    }

    #[test]
    fn test_shrinking_list_resets_scroll() {
        let mut selector = ProfileSelector::new(many(20));
        selector.select(20);
        selector.set_entries(entries());
        assert_eq!(selector.visible().start, 0);
        assert!(selector.is_new_row());
    }

    #[test]
    fn test_set_entries_clamps_selection() {
        let mut selector = ProfileSelector::new(entries());
        selector.select(2);
        selector.set_entries(Vec::new());
        assert!(selector.is_new_row());
    }
}
