//! Base Menu Component
//!
//! A centred panel with a title and a vertical list of items. Handles
//! keyboard navigation (wrapping, skipping disabled items), mouse hit
//! testing and rendering. Geometry is derived from the current [`Layout`],
//! so lengths in [`MenuStyle`] are base-resolution pixels.

use crate::context::Layout;
use crate::text::{draw_centered_text, draw_simple_text, text_height};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

/// Configuration for menu appearance
#[derive(Debug, Clone)]
pub struct MenuStyle {
    /// Panel width
    pub width: u32,

    /// Space reserved above the first item for the title
    pub title_area: u32,

    /// Height of one item row
    pub item_height: u32,

    /// Overlay darkness (0 = no overlay)
    pub overlay_alpha: u8,

    pub background_color: Color,
    pub border_color: Color,
    pub title_color: Color,
    pub item_color: Color,
    pub disabled_color: Color,
    pub selected_item_color: Color,
    pub highlight_color: Color,
}

impl Default for MenuStyle {
    fn default() -> Self {
        MenuStyle {
            width: 300,
            title_area: 44,
            item_height: 26,
            overlay_alpha: 0,
            background_color: Color::RGB(30, 30, 40),
            border_color: Color::RGB(100, 100, 120),
            title_color: Color::RGB(220, 220, 240),
            item_color: Color::RGB(160, 160, 170),
            disabled_color: Color::RGB(80, 80, 90),
            selected_item_color: Color::RGB(255, 255, 255),
            highlight_color: Color::RGB(80, 100, 140),
        }
    }
}

/// A menu item with text and enabled state
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub text: String,
    pub enabled: bool,
}

impl MenuItem {
    /// Creates a new enabled menu item
    pub fn new(text: impl Into<String>) -> Self {
        MenuItem {
            text: text.into(),
            enabled: true,
        }
    }

    pub fn disabled(text: impl Into<String>) -> Self {
        MenuItem {
            text: text.into(),
            enabled: false,
        }
    }
}

/// A stateful list menu
///
/// # Example
///
/// ```ignore
/// let mut menu = Menu::new("SETTINGS", vec![MenuItem::new("VIDEO"), MenuItem::new("BACK")]);
/// menu.select_next();
/// menu.render(&mut canvas, &ctx.layout)?;
/// if let Some(index) = menu.item_at(x, y, &ctx.layout) { /* ... */ }
/// ```
pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
    selected_index: usize,
    style: MenuStyle,
}

impl Menu {
    /// Creates a new menu with default styling
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self::with_style(title, items, MenuStyle::default())
    }

    pub fn with_style(title: impl Into<String>, items: Vec<MenuItem>, style: MenuStyle) -> Self {
        let mut menu = Menu {
            title: title.into(),
            items,
            selected_index: 0,
            style,
        };
        if !menu.is_selectable(0) {
            menu.select_next();
        }
        menu
    }

    fn is_selectable(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|item| item.enabled)
    }

    /// Move selection up to the previous enabled item (wraps to bottom)
    pub fn select_previous(&mut self) {
        let len = self.items.len();
        for step in 1..=len {
            let index = (self.selected_index + len - step) % len;
            if self.is_selectable(index) {
                self.selected_index = index;
                return;
            }
        }
    }

    /// Move selection down to the next enabled item (wraps to top)
    pub fn select_next(&mut self) {
        let len = self.items.len();
        for step in 1..=len {
            let index = (self.selected_index + step) % len;
            if self.is_selectable(index) {
                self.selected_index = index;
                return;
            }
        }
    }

    /// Selects `index` if it exists and is enabled
    pub fn select(&mut self, index: usize) -> bool {
        if self.is_selectable(index) {
            self.selected_index = index;
            true
        } else {
            false
        }
    }

    /// Get currently selected index
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// The selected index, only if that item is enabled
    pub fn activated(&self) -> Option<usize> {
        self.is_selectable(self.selected_index)
            .then_some(self.selected_index)
    }

    /// Panel rectangle, centred in the layout
    pub fn panel_rect(&self, layout: &Layout) -> Rect {
        let width = layout.px(self.style.width);
        let height = layout.px(
            self.style.title_area + self.items.len() as u32 * self.style.item_height + 12,
        );
        Rect::new(
            layout.center_x() - (width / 2) as i32,
            layout.center_y() - (height / 2) as i32,
            width,
            height,
        )
    }

    /// Rectangle of the item row at `index`
    pub fn item_rect(&self, index: usize, layout: &Layout) -> Rect {
        let panel = self.panel_rect(layout);
        let inset = layout.px(10);
        Rect::new(
            panel.x() + inset as i32,
            panel.y()
                + layout.px(self.style.title_area) as i32
                + (index as u32 * layout.px(self.style.item_height)) as i32,
            panel.width() - inset * 2,
            layout.px(self.style.item_height),
        )
    }

    /// Index of the enabled item under (`x`, `y`)
    pub fn item_at(&self, x: i32, y: i32, layout: &Layout) -> Option<usize> {
        (0..self.items.len())
            .find(|&i| self.item_rect(i, layout).contains_point((x, y)))
            .filter(|&i| self.is_selectable(i))
    }

    /// Render the menu at screen center
    pub fn render(&self, canvas: &mut Canvas<Window>, layout: &Layout) -> Result<(), String> {
        if self.style.overlay_alpha > 0 {
            canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
            canvas.set_draw_color(Color::RGBA(0, 0, 0, self.style.overlay_alpha));
            canvas.fill_rect(None)?;
            canvas.set_blend_mode(sdl2::render::BlendMode::None);
        }

        let panel = self.panel_rect(layout);
        canvas.set_draw_color(self.style.background_color);
        canvas.fill_rect(panel)?;

        // Double border
        canvas.set_draw_color(self.style.border_color);
        canvas.draw_rect(panel)?;
        let inner = layout.px(2);
        canvas.draw_rect(Rect::new(
            panel.x() + inner as i32,
            panel.y() + inner as i32,
            panel.width() - inner * 2,
            panel.height() - inner * 2,
        ))?;

        let title_scale = layout.scale * 2;
        draw_centered_text(
            canvas,
            &self.title,
            layout.center_x(),
            panel.y() + layout.px(14) as i32,
            self.style.title_color,
            title_scale,
        )?;

        let item_scale = layout.scale * 2;
        for (i, item) in self.items.iter().enumerate() {
            let row = self.item_rect(i, layout);
            let is_selected = i == self.selected_index && item.enabled;

            if is_selected {
                canvas.set_draw_color(self.style.highlight_color);
                canvas.fill_rect(row)?;
            }

            let color = if !item.enabled {
                self.style.disabled_color
            } else if is_selected {
                self.style.selected_item_color
            } else {
                self.style.item_color
            };

            let text_y = row.y() + (row.height() as i32 - text_height(item_scale) as i32) / 2;
            draw_simple_text(
                canvas,
                &item.text,
                row.x() + layout.px(12) as i32,
                text_y,
                color,
                item_scale,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Menu {
        Menu::new(
            "MAIN",
            vec![
                MenuItem::new("PLAY"),
                MenuItem::disabled("LOCKED"),
                MenuItem::new("QUIT"),
            ],
        )
    }

    #[test]
    fn test_navigation_skips_disabled() {
        let mut menu = sample();
        assert_eq!(menu.selected_index(), 0);
        menu.select_next();
        assert_eq!(menu.selected_index(), 2);
        menu.select_next();
        assert_eq!(menu.selected_index(), 0);
        menu.select_previous();
        assert_eq!(menu.selected_index(), 2);
    }

    #[test]
    fn test_first_item_disabled() {
        let menu = Menu::new("T", vec![MenuItem::disabled("A"), MenuItem::new("B")]);
        assert_eq!(menu.selected_index(), 1);
    }

    #[test]
    fn test_select_rejects_disabled() {
        let mut menu = sample();
        assert!(!menu.select(1));
        assert!(!menu.select(9));
        assert!(menu.select(2));
        assert_eq!(menu.activated(), Some(2));
    }

    #[test]
    fn test_item_hit_testing() {
        let menu = sample();
        let layout = Layout::new(640, 360);

        let row = menu.item_rect(2, &layout);
        let (x, y) = (row.x() + 5, row.y() + 5);
        assert_eq!(menu.item_at(x, y, &layout), Some(2));

        let locked = menu.item_rect(1, &layout);
        assert_eq!(menu.item_at(locked.x() + 5, locked.y() + 5, &layout), None);
        assert_eq!(menu.item_at(0, 0, &layout), None);
    }

    #[test]
    fn test_geometry_scales_with_layout() {
        let menu = sample();
        let small = menu.panel_rect(&Layout::new(640, 360));
        let large = menu.panel_rect(&Layout::new(1280, 720));
        assert_eq!(large.width(), small.width() * 2);
        assert_eq!(large.height(), small.height() * 2);
    }
}
