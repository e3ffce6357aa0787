//! Bottom-anchored black gradient fade.
//!
//! ```text
//! row 0            alpha 0.0   (canvas untouched)
//!  ...             linear ramp, one step per row
//! row height - 1   alpha 1.0   (solid black)
//! ─────────────── canvas bottom edge
//! ```
//!
//! Rows of a fade taller than the canvas fall above the top edge and are
//! never visited, so the work done is bounded by the canvas, not the fade.

use image::{Rgb, RgbImage};

use crate::paint::blend_pixel;

/// Alpha of fade row `row` (0 = top) in a fade of `height` rows.
///
/// Strictly increasing from 0.0 at the top row to 1.0 at the bottom row.
/// A one-row fade is fully opaque.
pub fn fade_alpha(row: u32, height: u32) -> f32 {
    if height <= 1 {
        return 1.0;
    }
    (row as f64 / (height - 1) as f64) as f32
}

/// Darken the bottom `height` rows of the canvas with a black ramp.
///
/// A fade taller than the canvas is clipped at the top.
pub fn render_black_fade(canvas: &mut RgbImage, height: u32) {
    let canvas_height = canvas.height();
    let visible = height.min(canvas_height);
    // fade rows hidden above the canvas top
    let skipped = height - visible;
    let top = canvas_height - visible;

    for i in 0..visible {
        let alpha = fade_alpha(skipped + i, height);
        let y = top + i;
        for x in 0..canvas.width() {
            blend_pixel(canvas.get_pixel_mut(x, y), Rgb([0, 0, 0]), alpha);
        }
    }
}
