//! RGBA Raster
//!
//! A plain CPU-side RGBA8 image. Rasters are what producers (the movie
//! decoder, the shipwalk renderer) write into and what the screens upload
//! into streaming textures.

/// Bytes per pixel (R, G, B, A)
pub const BYTES_PER_PIXEL: usize = 4;

/// Opaque black, used for letterbox bars
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// An RGBA8 pixel buffer with row pitch `width * 4`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a raster filled with transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Raster {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bytes per row
    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Fills every pixel with one colour
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Reads one pixel, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Writes one pixel, ignored when out of bounds
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Scales an RGBA source image into this raster, keeping its aspect ratio
    ///
    /// The uncovered area is filled with opaque black (letterbox / pillarbox).
    /// Sampling is nearest-neighbour. A source slice shorter than
    /// `src_width * src_height * 4` leaves the raster black.
    pub fn blit_fitted(&mut self, src_width: u32, src_height: u32, src: &[u8]) {
        self.fill(BLACK);

        let needed = src_width as usize * src_height as usize * BYTES_PER_PIXEL;
        if src_width == 0 || src_height == 0 || src.len() < needed {
            return;
        }

        let (dst_x, dst_y, dst_w, dst_h) =
            fit_rect(src_width, src_height, self.width, self.height);
        if dst_w == 0 || dst_h == 0 {
            return;
        }

        let src_pitch = src_width as usize * BYTES_PER_PIXEL;
        for dy in 0..dst_h {
            let sy = (dy as u64 * src_height as u64 / dst_h as u64) as usize;
            let row_start = self.offset(dst_x, dst_y + dy);
            for dx in 0..dst_w {
                let sx = (dx as u64 * src_width as u64 / dst_w as u64) as usize;
                let s = sy * src_pitch + sx * BYTES_PER_PIXEL;
                let d = row_start + dx as usize * BYTES_PER_PIXEL;
                self.pixels[d..d + BYTES_PER_PIXEL]
                    .copy_from_slice(&src[s..s + BYTES_PER_PIXEL]);
            }
        }
    }

    /// Multiplies the colour channels by `factor` (0.0 = black, 1.0 = unchanged)
    pub fn darken(&mut self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        if factor >= 1.0 {
            return;
        }
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            for channel in &mut px[..3] {
                *channel = (*channel as f32 * factor) as u8;
            }
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.pitch() + x as usize * BYTES_PER_PIXEL
    }
}

/// Largest rectangle with the source aspect ratio that fits the destination,
/// centred. Returns `(x, y, width, height)`.
pub fn fit_rect(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return (0, 0, 0, 0);
    }

    let scale = (dst_w as f64 / src_w as f64).min(dst_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, dst_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, dst_h);

    ((dst_w - w) / 2, (dst_h - h) / 2, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_raster_size() {
        let raster = Raster::new(4, 3);
        assert_eq!(raster.dimensions(), (4, 3));
        assert_eq!(raster.pitch(), 16);
        assert_eq!(raster.pixels().len(), 48);
    }

    #[test]
    fn test_put_and_read_pixel() {
        let mut raster = Raster::new(2, 2);
        raster.put_pixel(1, 1, [1, 2, 3, 4]);
        assert_eq!(raster.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(2, 0), None);

        // Out of bounds writes are ignored
        raster.put_pixel(5, 5, [9, 9, 9, 9]);
        assert_eq!(raster.pixels().iter().filter(|&&b| b == 9).count(), 0);
    }

    #[test]
    fn test_fit_rect_letterbox() {
        // 2:1 source into a square leaves bars top and bottom
        assert_eq!(fit_rect(200, 100, 100, 100), (0, 25, 100, 50));
        // 1:2 source into a square leaves bars left and right
        assert_eq!(fit_rect(100, 200, 100, 100), (25, 0, 50, 100));
        assert_eq!(fit_rect(0, 10, 100, 100), (0, 0, 0, 0));
    }

    #[test]
    fn test_blit_fitted_scales_and_letterboxes() {
        // 2x1 source: left red, right green
        let src = [255, 0, 0, 255, 0, 255, 0, 255];
        let mut raster = Raster::new(4, 4);
        raster.blit_fitted(2, 1, &src);

        // Picture occupies rows 1..3
        assert_eq!(raster.pixel(0, 0), Some(BLACK));
        assert_eq!(raster.pixel(0, 1), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(3, 2), Some([0, 255, 0, 255]));
        assert_eq!(raster.pixel(3, 3), Some(BLACK));
    }

    #[test]
    fn test_blit_fitted_rejects_short_source() {
        let mut raster = Raster::new(2, 2);
        raster.blit_fitted(4, 4, &[255; 8]);
        assert_eq!(raster.pixel(1, 1), Some(BLACK));
    }

    #[test]
    fn test_darken_keeps_alpha() {
        let mut raster = Raster::new(1, 1);
        raster.fill([200, 100, 50, 255]);
        raster.darken(0.5);
        assert_eq!(raster.pixel(0, 0), Some([100, 50, 25, 255]));
    }
}
