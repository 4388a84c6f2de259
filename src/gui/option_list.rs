//! Option list component
//!
//! Labelled rows with a value column, used by the settings dialogs. The
//! selected adjustable row shows `<` and `>` markers that can also be
//! clicked.

use crate::context::Layout;
use crate::text::{draw_centered_text, draw_simple_text, text_height};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

/// One displayed row
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRow {
    pub label: String,
    /// Empty for action rows (APPLY, CANCEL)
    pub value: String,
}

/// Part of a row under the mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHit {
    Row(usize),
    Decrease(usize),
    Increase(usize),
}

/// Base-resolution geometry
const WIDTH: u32 = 440;
const TITLE_AREA: u32 = 40;
const ROW_HEIGHT: u32 = 24;
const VALUE_X: u32 = 250;
const ARROW_WIDTH: u32 = 18;
const VALUE_WIDTH: u32 = 150;

pub struct OptionList {
    title: String,
    rows: Vec<OptionRow>,
}

impl OptionList {
    pub fn new(title: impl Into<String>) -> Self {
        OptionList {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn set_rows(&mut self, rows: Vec<OptionRow>) {
        self.rows = rows;
    }

    pub fn rows(&self) -> &[OptionRow] {
        &self.rows
    }

    pub fn panel_rect(&self, layout: &Layout) -> Rect {
        let width = layout.px(WIDTH);
        let height = layout.px(TITLE_AREA + self.rows.len() as u32 * ROW_HEIGHT + 12);
        Rect::new(
            layout.center_x() - (width / 2) as i32,
            layout.center_y() - (height / 2) as i32,
            width,
            height,
        )
    }

    pub fn row_rect(&self, index: usize, layout: &Layout) -> Rect {
        let panel = self.panel_rect(layout);
        Rect::new(
            panel.x() + layout.px(8) as i32,
            panel.y() + layout.px(TITLE_AREA + index as u32 * ROW_HEIGHT) as i32,
            panel.width() - layout.px(16),
            layout.px(ROW_HEIGHT),
        )
    }

    fn decrease_rect(&self, index: usize, layout: &Layout) -> Rect {
        let row = self.row_rect(index, layout);
        Rect::new(
            self.panel_rect(layout).x() + layout.px(VALUE_X - ARROW_WIDTH) as i32,
            row.y(),
            layout.px(ARROW_WIDTH),
            row.height(),
        )
    }

    fn increase_rect(&self, index: usize, layout: &Layout) -> Rect {
        let row = self.row_rect(index, layout);
        Rect::new(
            self.panel_rect(layout).x() + layout.px(VALUE_X + VALUE_WIDTH) as i32,
            row.y(),
            layout.px(ARROW_WIDTH),
            row.height(),
        )
    }

    /// Which row (and arrow) lies under (`x`, `y`)
    pub fn hit(&self, x: i32, y: i32, layout: &Layout) -> Option<RowHit> {
        for index in 0..self.rows.len() {
            let adjustable = !self.rows[index].value.is_empty();
            if adjustable && self.decrease_rect(index, layout).contains_point((x, y)) {
                return Some(RowHit::Decrease(index));
            }
            if adjustable && self.increase_rect(index, layout).contains_point((x, y)) {
                return Some(RowHit::Increase(index));
            }
            if self.row_rect(index, layout).contains_point((x, y)) {
                return Some(RowHit::Row(index));
            }
        }
        None
    }

    pub fn render(
        &self,
        canvas: &mut Canvas<Window>,
        layout: &Layout,
        selected: usize,
    ) -> Result<(), String> {
        let panel = self.panel_rect(layout);
        canvas.set_draw_color(Color::RGB(20, 20, 30));
        canvas.fill_rect(panel)?;
        canvas.set_draw_color(Color::RGB(80, 120, 180));
        canvas.draw_rect(panel)?;

        let scale = layout.scale;
        draw_centered_text(
            canvas,
            &self.title,
            layout.center_x(),
            panel.y() + layout.px(12) as i32,
            Color::RGB(180, 220, 255),
            scale * 2,
        )?;

        for (i, row) in self.rows.iter().enumerate() {
            let rect = self.row_rect(i, layout);
            let is_selected = i == selected;

            if is_selected {
                canvas.set_draw_color(Color::RGB(40, 60, 100));
                canvas.fill_rect(rect)?;
            }

            let text_y = rect.y() + (rect.height() as i32 - text_height(scale * 2) as i32) / 2;
            let label_color = if is_selected {
                Color::RGB(255, 255, 255)
            } else {
                Color::RGB(180, 180, 190)
            };
            draw_simple_text(
                canvas,
                &row.label,
                rect.x() + layout.px(8) as i32,
                text_y,
                label_color,
                scale * 2,
            )?;

            if row.value.is_empty() {
                continue;
            }

            draw_centered_text(
                canvas,
                &row.value,
                panel.x() + layout.px(VALUE_X + VALUE_WIDTH / 2) as i32,
                text_y,
                Color::RGB(100, 255, 100),
                scale * 2,
            )?;

            if is_selected {
                let arrow = Color::RGB(255, 200, 100);
                let left = self.decrease_rect(i, layout);
                let right = self.increase_rect(i, layout);
                draw_simple_text(canvas, "<", left.x() + layout.px(3) as i32, text_y, arrow, scale * 2)?;
                draw_simple_text(canvas, ">", right.x() + layout.px(3) as i32, text_y, arrow, scale * 2)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> OptionList {
        let mut list = OptionList::new("VIDEO");
        list.set_rows(vec![
            OptionRow {
                label: "FULLSCREEN".to_string(),
                value: "OFF".to_string(),
            },
            OptionRow {
                label: "APPLY".to_string(),
                value: String::new(),
            },
        ]);
        list
    }

    #[test]
    fn test_hit_arrows_and_rows() {
        let list = list();
        let layout = Layout::new(640, 360);

        let dec = list.decrease_rect(0, &layout);
        assert_eq!(list.hit(dec.x() + 2, dec.y() + 2, &layout), Some(RowHit::Decrease(0)));

        let inc = list.increase_rect(0, &layout);
        assert_eq!(list.hit(inc.x() + 2, inc.y() + 2, &layout), Some(RowHit::Increase(0)));

        let row = list.row_rect(0, &layout);
        assert_eq!(list.hit(row.x() + 2, row.y() + 2, &layout), Some(RowHit::Row(0)));

        assert_eq!(list.hit(0, 0, &layout), None);
    }

    #[test]
    fn test_action_rows_have_no_arrows() {
        let list = list();
        let layout = Layout::new(640, 360);
        let inc = list.increase_rect(1, &layout);
        assert_eq!(list.hit(inc.x() + 2, inc.y() + 2, &layout), Some(RowHit::Row(1)));
    }
}
