//! Image layers: resize, position, paste.
//!
//! ## Resize precedence
//!
//! The first matching rule wins, resolved once into a [`ResizeMode`]:
//!
//! | Flag | Result |
//! |------|--------|
//! | `resize_to_height` | stretched to exactly canvas width × canvas height |
//! | `resize_to_width` | width = canvas width, height scaled by the same ratio |
//! | `max_width` + `max_height` | shrink-to-fit inside the box, never upscaled |
//! | `max_width` or `max_height` | that side set, the other scaled proportionally |
//!
//! ## Placement
//!
//! `y = auto` resolves to `cursor + auto_y_padding`; `from_bottom` overrides
//! the vertical placement so the image's bottom edge sits on the canvas
//! bottom. `crop_center_scale` then center-crops the largest window with the
//! canvas aspect ratio and scales it to the canvas size.

use image::{DynamicImage, GenericImageView, RgbImage, imageops::FilterType};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

use crate::CardError;
use crate::paint::{paste_masked, paste_opaque};
use crate::preset::ImageLayer;

/// How an image layer is sized relative to the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Keep the source size.
    #[default]
    None,
    /// Stretch to the full canvas (aspect ratio not preserved).
    FillCanvas,
    /// Match the canvas width, preserving aspect ratio.
    CanvasWidth,
    /// Scale against one or two limits, preserving aspect ratio.
    Bounded {
        max_width: Option<u32>,
        max_height: Option<u32>,
    },
}

impl ResizeMode {
    /// Resolve the individual layer flags by precedence.
    pub fn from_flags(
        resize_to_height: bool,
        resize_to_width: bool,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Self {
        if resize_to_height {
            ResizeMode::FillCanvas
        } else if resize_to_width {
            ResizeMode::CanvasWidth
        } else if max_width.is_some() || max_height.is_some() {
            ResizeMode::Bounded {
                max_width,
                max_height,
            }
        } else {
            ResizeMode::None
        }
    }

    /// Target size for an image of `(width, height)` on a canvas of
    /// `(canvas_width, canvas_height)`.
    pub fn target_size(self, (width, height): (u32, u32), (canvas_width, canvas_height): (u32, u32)) -> (u32, u32) {
        let scale = |value: u32, num: u32, den: u32| -> u32 {
            (value as u64 * num as u64 / den.max(1) as u64) as u32
        };

        match self {
            ResizeMode::None => (width, height),
            ResizeMode::FillCanvas => (canvas_width, canvas_height),
            ResizeMode::CanvasWidth => (canvas_width, scale(canvas_width, height, width)),
            ResizeMode::Bounded {
                max_width: Some(mw),
                max_height: Some(mh),
            } => fit_within((width, height), (mw, mh)),
            ResizeMode::Bounded {
                max_width: Some(mw),
                max_height: None,
            } => (mw, scale(mw, height, width)),
            ResizeMode::Bounded {
                max_width: None,
                max_height: Some(mh),
            } => (scale(mh, width, height), mh),
            ResizeMode::Bounded {
                max_width: None,
                max_height: None,
            } => (width, height),
        }
    }
}

/// Shrink `(width, height)` to fit inside `(max_width, max_height)`,
/// preserving aspect ratio. Sizes already inside the box are unchanged.
pub fn fit_within((width, height): (u32, u32), (max_width, max_height): (u32, u32)) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let w = (width as f64 * ratio).round().max(1.0) as u32;
    let h = (height as f64 * ratio).round().max(1.0) as u32;
    (w.min(max_width.max(1)), h.min(max_height.max(1)))
}

/// Largest window with the canvas aspect ratio, centered in the image.
/// Returns `(x, y, width, height)`.
pub fn center_crop_window((width, height): (u32, u32), (canvas_width, canvas_height): (u32, u32)) -> (u32, u32, u32, u32) {
    let (crop_w, crop_h) = if width as u64 * canvas_height as u64 > height as u64 * canvas_width as u64 {
        // Wider than the canvas: full height, trimmed sides
        let w = (height as u64 * canvas_width as u64 / canvas_height as u64) as u32;
        (w.max(1), height)
    } else {
        // Taller (or equal): full width, trimmed top and bottom
        let h = (width as u64 * canvas_height as u64 / canvas_width as u64) as u32;
        (width, h.max(1))
    };
    ((width - crop_w) / 2, (height - crop_h) / 2, crop_w, crop_h)
}

/// An image after sizing and placement, ready to paste.
#[derive(Debug, Clone)]
pub struct PlacedImage<'a> {
    pub image: Cow<'a, DynamicImage>,
    pub x: i32,
    pub y: i32,
}

impl PlacedImage<'_> {
    pub fn height(&self) -> i32 {
        self.image.height() as i32
    }
}

/// Size and position an image layer without drawing it.
pub fn place<'a>(
    layer: &'a ImageLayer,
    (canvas_width, canvas_height): (u32, u32),
    cursor: i32,
) -> Result<PlacedImage<'a>, CardError> {
    let source: &DynamicImage = &layer.image;
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(CardError::Image(format!(
            "image layer source is empty ({}x{})",
            width, height
        )));
    }

    let (target_w, target_h) = layer
        .resize
        .target_size((width, height), (canvas_width, canvas_height));
    if target_w == 0 || target_h == 0 {
        return Err(CardError::Image(format!(
            "image layer resizes to an empty image ({}x{})",
            target_w, target_h
        )));
    }

    let mut image = if (target_w, target_h) == (width, height) {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(source.resize_exact(target_w, target_h, FilterType::Lanczos3))
    };

    let mut y = layer.position.y.resolve(cursor, layer.auto_y_padding);
    if layer.from_bottom {
        y = (canvas_height as i32).saturating_sub(image.height() as i32);
    }

    if layer.crop_center_scale {
        let (cx, cy, cw, ch) = center_crop_window(image.dimensions(), (canvas_width, canvas_height));
        let cropped = image.crop_imm(cx, cy, cw, ch);
        image = Cow::Owned(cropped.resize_exact(canvas_width, canvas_height, FilterType::Lanczos3));
    }

    Ok(PlacedImage {
        image,
        x: layer.position.x,
        y,
    })
}

/// Render an image layer onto the canvas.
///
/// Images with an alpha channel are composited through it; others overwrite
/// the destination. Returns the placed image's top edge and rendered height.
pub fn render_image_layer(
    canvas: &mut RgbImage,
    layer: &ImageLayer,
    cursor: i32,
) -> Result<(i32, i32), CardError> {
    let placed = place(layer, canvas.dimensions(), cursor)?;

    debug!(
        x = placed.x,
        y = placed.y,
        width = placed.image.width(),
        height = placed.image.height(),
        alpha = placed.image.color().has_alpha(),
        "pasting image layer"
    );

    if placed.image.color().has_alpha() {
        paste_masked(canvas, &placed.image.to_rgba8(), placed.x, placed.y);
    } else {
        paste_opaque(canvas, &placed.image.to_rgb8(), placed.x, placed.y);
    }

    Ok((placed.y, placed.height()))
}
