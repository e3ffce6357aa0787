//! Pixel-level helpers shared by the layer renderers.
//!
//! Every helper clips against the canvas, so callers may pass rectangles and
//! offsets that are partly (or entirely) outside of it.

use image::{Rgb, RgbImage, RgbaImage};

use crate::style::Color;

/// Linear interpolation between two channel values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Blend `src` over `dst` with coverage `alpha` in [0.0, 1.0].
#[inline]
pub fn blend_pixel(dst: &mut Rgb<u8>, src: Rgb<u8>, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    if alpha >= 1.0 {
        *dst = src;
        return;
    }
    for c in 0..3 {
        dst.0[c] = lerp(dst.0[c] as f32, src.0[c] as f32, alpha).round() as u8;
    }
}

/// Blend a single pixel at signed coordinates, ignoring out-of-bounds writes.
#[inline]
pub fn blend_at(canvas: &mut RgbImage, x: i32, y: i32, color: Color, alpha: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    blend_pixel(canvas.get_pixel_mut(x as u32, y as u32), color.to_rgb(), alpha);
}

/// Clip a rectangle `[x0, x1) × [y0, y1)` to the canvas.
fn clip(canvas: &RgbImage, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(u32, u32, u32, u32)> {
    let x0 = x0.max(0);
    let y0 = y0.max(0);
    let x1 = x1.min(canvas.width() as i32);
    let y1 = y1.min(canvas.height() as i32);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Fill the half-open rectangle `[x0, x1) × [y0, y1)` with a solid color.
pub fn fill_rect(canvas: &mut RgbImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let Some((x0, y0, x1, y1)) = clip(canvas, x0, y0, x1, y1) else {
        return;
    };
    let rgb = color.to_rgb();
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, rgb);
        }
    }
}

/// Copy `src` onto the canvas at `(x, y)`, overwriting the destination.
pub fn paste_opaque(canvas: &mut RgbImage, src: &RgbImage, x: i32, y: i32) {
    let Some((cx0, cy0, cx1, cy1)) = clip(
        canvas,
        x,
        y,
        x.saturating_add(src.width() as i32),
        y.saturating_add(src.height() as i32),
    ) else {
        return;
    };
    for cy in cy0..cy1 {
        for cx in cx0..cx1 {
            let sx = (cx as i64 - x as i64) as u32;
            let sy = (cy as i64 - y as i64) as u32;
            canvas.put_pixel(cx, cy, *src.get_pixel(sx, sy));
        }
    }
}

/// Composite `src` onto the canvas at `(x, y)` using its alpha channel as the mask.
pub fn paste_masked(canvas: &mut RgbImage, src: &RgbaImage, x: i32, y: i32) {
    let Some((cx0, cy0, cx1, cy1)) = clip(
        canvas,
        x,
        y,
        x.saturating_add(src.width() as i32),
        y.saturating_add(src.height() as i32),
    ) else {
        return;
    };
    for cy in cy0..cy1 {
        for cx in cx0..cx1 {
            let sx = (cx as i64 - x as i64) as u32;
            let sy = (cy as i64 - y as i64) as u32;
            let p = src.get_pixel(sx, sy);
            let alpha = p.0[3] as f32 / 255.0;
            blend_pixel(canvas.get_pixel_mut(cx, cy), Rgb([p.0[0], p.0[1], p.0[2]]), alpha);
        }
    }
}
