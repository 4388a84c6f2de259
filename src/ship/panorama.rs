//! Cylindrical panorama projection
//!
//! A panorama image spans 360° horizontally. The view shows `fov` degrees of
//! it centred on `yaw`; column `x` of the output samples the panorama at
//! the centre of that pixel, `yaw + ((x + 0.5) / width - 0.5) * fov`,
//! wrapped into 0..360. The full panorama height maps onto the output
//! height.

use crate::frame::{Raster, BYTES_PER_PIXEL};
use image::RgbaImage;

/// Renders the view at `yaw` (degrees) into `target`
pub fn render_panorama(panorama: &RgbaImage, yaw: f32, fov: f32, target: &mut Raster) {
    let (pano_w, pano_h) = panorama.dimensions();
    let (width, height) = target.dimensions();
    if pano_w == 0 || pano_h == 0 || width == 0 || height == 0 {
        return;
    }

    let columns: Vec<u32> = (0..width)
        .map(|x| source_column(x, width, yaw, fov, pano_w))
        .collect();

    let src = panorama.as_raw();
    let src_pitch = pano_w as usize * BYTES_PER_PIXEL;
    let pitch = target.pitch();
    let pixels = target.pixels_mut();

    for y in 0..height {
        let sy = (y as u64 * pano_h as u64 / height as u64) as usize;
        let src_row = &src[sy * src_pitch..(sy + 1) * src_pitch];
        let dst_row = &mut pixels[y as usize * pitch..(y as usize + 1) * pitch];

        for (dst, &sx) in dst_row.chunks_exact_mut(BYTES_PER_PIXEL).zip(&columns) {
            let s = sx as usize * BYTES_PER_PIXEL;
            dst.copy_from_slice(&src_row[s..s + BYTES_PER_PIXEL]);
        }
    }
}

/// Panorama column sampled by output column `x`
fn source_column(x: u32, width: u32, yaw: f32, fov: f32, pano_w: u32) -> u32 {
    let offset = ((x as f32 + 0.5) / width as f32 - 0.5) * fov;
    let angle = (yaw + offset).rem_euclid(360.0);
    ((angle / 360.0 * pano_w as f32) as u32).min(pano_w - 1)
}
