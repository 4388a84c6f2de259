//! Loading spinner
//!
//! A ring of segments where a bright "head" travels around the ring and
//! the segments behind it fade out. The phase advances with `update`.

use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::f32::consts::TAU;
use std::time::Duration;

pub struct Spinner {
    segments: u32,
    /// Segments per second
    speed: f32,
    phase: f32,
    color: Color,
}

impl Spinner {
    pub fn new(segments: u32, speed: f32) -> Self {
        Spinner {
            segments: segments.max(1),
            speed,
            phase: 0.0,
            color: Color::RGB(150, 190, 255),
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.phase = (self.phase + self.speed * dt.as_secs_f32()) % self.segments as f32;
    }

    /// Index of the brightest segment
    pub fn active_segment(&self) -> u32 {
        (self.phase as u32) % self.segments
    }

    /// Brightness of `segment` (1.0 for the head, fading behind it)
    pub fn intensity(&self, segment: u32) -> f32 {
        let behind = (self.active_segment() + self.segments - segment % self.segments)
            % self.segments;
        1.0 - behind as f32 / self.segments as f32
    }

    pub fn render(
        &self,
        canvas: &mut Canvas<Window>,
        center_x: i32,
        center_y: i32,
        radius: u32,
        dot: u32,
    ) -> Result<(), String> {
        for segment in 0..self.segments {
            let angle = segment as f32 / self.segments as f32 * TAU;
            let x = center_x + (angle.cos() * radius as f32) as i32 - (dot / 2) as i32;
            let y = center_y + (angle.sin() * radius as f32) as i32 - (dot / 2) as i32;

            let k = self.intensity(segment);
            canvas.set_draw_color(Color::RGB(
                (self.color.r as f32 * k) as u8,
                (self.color.g as f32 * k) as u8,
                (self.color.b as f32 * k) as u8,
            ));
            canvas.fill_rect(Rect::new(x, y, dot, dot))?;
        }
        Ok(())
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(12, 12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_advances_and_wraps() {
        let mut spinner = Spinner::new(12, 12.0);
        assert_eq!(spinner.active_segment(), 0);

        spinner.update(Duration::from_millis(250));
        assert_eq!(spinner.active_segment(), 3);

        spinner.update(Duration::from_secs(1));
        assert_eq!(spinner.active_segment(), 3);
    }

    #[test]
    fn test_intensity_fades_behind_head() {
        let mut spinner = Spinner::new(4, 1.0);
        spinner.update(Duration::from_secs(2));
        assert_eq!(spinner.active_segment(), 2);
        assert_eq!(spinner.intensity(2), 1.0);
        assert_eq!(spinner.intensity(1), 0.75);
        assert_eq!(spinner.intensity(3), 0.25);
    }
}
