//! Progress bar component
//!
//! A horizontal bar filled to a fraction, drawn with SDL2 rectangles. The
//! bar is stateless: create it once and call `render` with the current
//! fraction each frame.

use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

/// Configuration for progress bar appearance
#[derive(Debug, Clone)]
pub struct ProgressBarStyle {
    /// Background color (unfilled part)
    pub background_color: Color,

    /// Fill color
    pub fill_color: Color,

    /// Fill color below `low_threshold` (volume sliders near zero, etc.)
    pub low_color: Color,

    /// Fractions under this use `low_color`
    pub low_threshold: f32,

    /// Border color
    pub border_color: Color,

    /// Draw a 1px border
    pub border: bool,
}

impl Default for ProgressBarStyle {
    fn default() -> Self {
        ProgressBarStyle {
            background_color: Color::RGB(40, 40, 50),
            fill_color: Color::RGB(90, 140, 220),
            low_color: Color::RGB(90, 140, 220),
            low_threshold: 0.0,
            border_color: Color::RGB(120, 120, 140),
            border: true,
        }
    }
}

pub struct ProgressBar {
    style: ProgressBarStyle,
}

impl ProgressBar {
    pub fn with_style(style: ProgressBarStyle) -> Self {
        ProgressBar { style }
    }

    /// Filled width for `fraction` of a bar `width` pixels wide
    pub fn fill_width(width: u32, fraction: f32) -> u32 {
        (width as f32 * fraction.clamp(0.0, 1.0)) as u32
    }

    /// Renders the bar into `area` filled to `fraction` (0.0-1.0)
    pub fn render(
        &self,
        canvas: &mut Canvas<Window>,
        area: Rect,
        fraction: f32,
    ) -> Result<(), String> {
        canvas.set_draw_color(self.style.background_color);
        canvas.fill_rect(area)?;

        let fill_width = Self::fill_width(area.width(), fraction);
        if fill_width > 0 {
            let fill_color = if fraction < self.style.low_threshold {
                self.style.low_color
            } else {
                self.style.fill_color
            };
            canvas.set_draw_color(fill_color);
            canvas.fill_rect(Rect::new(area.x(), area.y(), fill_width, area.height()))?;
        }

        // Border drawn last so it's on top
        if self.style.border {
            canvas.set_draw_color(self.style.border_color);
            canvas.draw_rect(area)?;
        }

        Ok(())
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::with_style(ProgressBarStyle::default())
    }
}
