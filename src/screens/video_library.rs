//! Video library browser
//!
//! Lists every movie; entries the active profile hasn't unlocked yet are
//! shown as `???` and refuse to play.

use super::draw_backdrop;
use crate::context::AppContext;
use crate::media::VideoEntry;
use crate::screen::{is_left_click, MouseInput, Screen, ScreenRequest, Transition};
use crate::text::{draw_centered_text, draw_simple_text, text_height, text_width};
use log::debug;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::ops::Range;
use std::time::Duration;

/// Rows visible at once
pub const PAGE_ROWS: usize = 8;

const LIST_WIDTH: u32 = 420;
const LIST_TOP: u32 = 70;
const ROW_HEIGHT: u32 = 26;

/// Selection and scroll position over `len` entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryBrowser {
    len: usize,
    selected: usize,
    scroll: usize,
}

impl LibraryBrowser {
    pub fn new(len: usize) -> Self {
        LibraryBrowser {
            len,
            selected: 0,
            scroll: 0,
        }
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.selected = self.selected.min(len.saturating_sub(1));
        self.scroll = self.scroll.min(self.max_scroll());
        self.ensure_visible();
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Entry indices currently on screen
    pub fn visible(&self) -> Range<usize> {
        self.scroll..(self.scroll + PAGE_ROWS).min(self.len)
    }

    /// Entry index shown on visible row `row`
    pub fn row_entry(&self, row: usize) -> Option<usize> {
        let index = self.scroll + row;
        (row < PAGE_ROWS && index < self.len).then_some(index)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.selected = index;
            self.ensure_visible();
        }
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.len == 0 {
            return;
        }
        let target = (self.selected as isize + delta).clamp(0, self.len as isize - 1);
        self.select(target as usize);
    }

    pub fn page(&self) -> usize {
        self.selected / PAGE_ROWS
    }

    pub fn page_count(&self) -> usize {
        self.len.div_ceil(PAGE_ROWS).max(1)
    }

    /// Scrolls the list (mouse wheel) and drags the selection along
    pub fn scroll_by(&mut self, delta: isize) {
        let target = (self.scroll as isize + delta).clamp(0, self.max_scroll() as isize);
        self.scroll = target as usize;
        let visible = self.visible();
        if !visible.is_empty() {
            self.selected = self.selected.clamp(visible.start, visible.end - 1);
        }
    }

    fn max_scroll(&self) -> usize {
        self.len.saturating_sub(PAGE_ROWS)
    }

    fn ensure_visible(&mut self) {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + PAGE_ROWS {
            self.scroll = self.selected + 1 - PAGE_ROWS;
        }
    }
}

/// Formats a duration as `M:SS`
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub struct VideoLibraryScreen {
    browser: LibraryBrowser,
    /// Shown after trying to play a locked entry
    locked_notice: bool,
}

impl VideoLibraryScreen {
    pub fn new() -> Self {
        VideoLibraryScreen {
            browser: LibraryBrowser::new(0),
            locked_notice: false,
        }
    }

    fn row_rect(row: usize, ctx: &AppContext<'_>) -> Rect {
        let layout = ctx.layout;
        let width = layout.px(LIST_WIDTH);
        Rect::new(
            layout.center_x() - (width / 2) as i32,
            layout.px(LIST_TOP + row as u32 * ROW_HEIGHT) as i32,
            width,
            layout.px(ROW_HEIGHT),
        )
    }

    fn play(&mut self, ctx: &AppContext<'_>) -> Transition {
        let Some(entry) = ctx.library.entries().get(self.browser.selected()) else {
            return Transition::None;
        };
        if !entry.is_unlocked(ctx.profile.as_ref()) {
            debug!("movie '{}' is locked", entry.id);
            self.locked_notice = true;
            return Transition::None;
        }
        Transition::Push(ScreenRequest::Movie {
            id: entry.id.clone(),
            then: None,
        })
    }

    fn draw_row(
        canvas: &mut Canvas<Window>,
        ctx: &AppContext<'_>,
        row: usize,
        entry: &VideoEntry,
        selected: bool,
    ) -> Result<(), String> {
        let layout = ctx.layout;
        let rect = Self::row_rect(row, ctx);
        if selected {
            canvas.set_draw_color(Color::RGB(40, 60, 100));
            canvas.fill_rect(rect)?;
        }

        let scale = layout.scale * 2;
        let text_y = rect.y() + (rect.height() as i32 - text_height(scale) as i32) / 2;
        let unlocked = entry.is_unlocked(ctx.profile.as_ref());
        let (title, color) = match (unlocked, selected) {
            (false, _) => ("???", Color::RGB(90, 90, 100)),
            (true, true) => (ctx.tr(&entry.title), Color::RGB(255, 255, 255)),
            (true, false) => (ctx.tr(&entry.title), Color::RGB(180, 180, 190)),
        };
        draw_simple_text(canvas, title, rect.x() + layout.px(8) as i32, text_y, color, scale)?;

        if unlocked {
            let length = format_duration(entry.duration);
            let x = rect.right() - layout.px(8) as i32 - text_width(&length, scale) as i32;
            draw_simple_text(canvas, &length, x, text_y, Color::RGB(120, 120, 140), scale)?;
        }
        Ok(())
    }
}

impl Default for VideoLibraryScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<AppContext<'_>> for VideoLibraryScreen {
    fn name(&self) -> &'static str {
        "video-library"
    }

    /// Refreshed on every entry so a movie watched just now shows unlocked
    fn on_enter(&mut self, ctx: &mut AppContext<'_>) {
        self.browser.set_len(ctx.library.len());
        self.locked_notice = false;
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'_>) -> Result<(), String> {
        draw_backdrop(canvas, ctx, "menu.png")?;
        let layout = ctx.layout;
        let cx = layout.center_x();

        draw_centered_text(canvas, ctx.tr("library.title"), cx, layout.px(30) as i32, Color::RGB(220, 220, 240), layout.scale * 3)?;

        if ctx.library.is_empty() {
            return draw_centered_text(
                canvas,
                ctx.tr("library.empty"),
                cx,
                layout.center_y(),
                Color::RGB(150, 150, 160),
                layout.scale * 2,
            );
        }

        let entries = ctx.library.entries();
        for (row, index) in self.browser.visible().enumerate() {
            Self::draw_row(canvas, ctx, row, &entries[index], index == self.browser.selected())?;
        }

        let footer_y = layout.px(LIST_TOP + PAGE_ROWS as u32 * ROW_HEIGHT + 10) as i32;
        let page = format!(
            "{} {}/{}",
            ctx.tr("library.page"),
            self.browser.page() + 1,
            self.browser.page_count()
        );
        draw_centered_text(canvas, &page, cx, footer_y, Color::RGB(150, 150, 160), layout.scale)?;

        if self.locked_notice {
            draw_centered_text(
                canvas,
                ctx.tr("library.locked"),
                cx,
                footer_y + layout.px(16) as i32,
                Color::RGB(255, 120, 100),
                layout.scale,
            )?;
        }
        Ok(())
    }

    fn keyboard(&mut self, ctx: &mut AppContext<'_>, key: Keycode, _keymod: Mod) -> Transition {
        self.locked_notice = false;
        match key {
            Keycode::Up => self.browser.move_by(-1),
            Keycode::Down => self.browser.move_by(1),
            Keycode::PageUp => self.browser.move_by(-(PAGE_ROWS as isize)),
            Keycode::PageDown => self.browser.move_by(PAGE_ROWS as isize),
            Keycode::Home => self.browser.select(0),
            Keycode::End => self.browser.move_by(isize::MAX / 2),
            Keycode::Return | Keycode::KpEnter => return self.play(ctx),
            Keycode::Escape => return Transition::Pop,
            _ => {}
        }
        Transition::None
    }

    fn mouse(&mut self, ctx: &mut AppContext<'_>, input: MouseInput) -> Transition {
        let (x, y) = match input {
            MouseInput::Wheel { dy } => {
                self.browser.scroll_by(-(dy as isize));
                return Transition::None;
            }
            MouseInput::Motion { x, y, .. } | MouseInput::Down { x, y, .. } => (x, y),
            MouseInput::Up { .. } => return Transition::None,
        };

        let hit = (0..PAGE_ROWS)
            .find(|&row| Self::row_rect(row, ctx).contains_point((x, y)))
            .and_then(|row| self.browser.row_entry(row));
        let Some(index) = hit else {
            return Transition::None;
        };

        self.browser.select(index);
        if is_left_click(&input) {
            self.locked_notice = false;
            self.play(ctx)
        } else {
            Transition::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_scrolls_into_view() {
        let mut browser = LibraryBrowser::new(20);
        assert_eq!(browser.visible(), 0..8);
        browser.move_by(8);
        assert_eq!(browser.selected(), 8);
        assert_eq!(browser.visible().start, 1);
        browser.move_by(-8);
        assert_eq!(browser.visible().start, 0);
    }

    #[test]
    fn test_move_clamps_at_ends() {
        let mut browser = LibraryBrowser::new(3);
        browser.move_by(-1);
        assert_eq!(browser.selected(), 0);
        browser.move_by(isize::MAX / 2);
        assert_eq!(browser.selected(), 2);
        assert_eq!(browser.visible(), 0..3);
    }

    #[test]
    fn test_pages() {
        let mut browser = LibraryBrowser::new(17);
        assert_eq!(browser.page_count(), 3);
        browser.select(16);
        assert_eq!(browser.page(), 2);
        assert_eq!(browser.visible().start, 9);
        assert_eq!(LibraryBrowser::new(0).page_count(), 1);
    }

    #[test]
    fn test_wheel_drags_selection() {
        let mut browser = LibraryBrowser::new(20);
        browser.scroll_by(5);
        assert_eq!(browser.visible().start, 5);
        assert_eq!(browser.selected(), 5);
        browser.scroll_by(100);
        assert_eq!(browser.visible().start, 12);
        assert_eq!(browser.row_entry(7), Some(19));
        assert_eq!(browser.row_entry(8), None);
    }

    #[test]
    fn test_set_len_clamps() {
        let mut browser = LibraryBrowser::new(20);
        browser.select(19);
        browser.set_len(4);
        assert_eq!(browser.selected(), 3);
        assert_eq!(browser.visible().start, 0);

        browser.set_len(0);
        assert_eq!(browser.selected(), 0);
        assert_eq!(browser.visible(), 0..0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(75)), "1:15");
        assert_eq!(format_duration(Duration::from_millis(9_500)), "0:09");
    }
}
