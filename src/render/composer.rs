//! Single-pass layer compositor.
//!
//! The composer walks a preset's layers in order, threading a [`Cursor`]
//! through each step. The cursor is a plain value owned by one `compose()`
//! call: nothing is stored on the [`Composer`] itself, so one composer can
//! be shared by any number of concurrent compositions.
//!
//! ```text
//! canvas = bg_color; cursor = 0
//! for layer in preset.layers:
//!     image    → paste;       cursor = max(cursor, top + height)
//!     textbox  → draw block;  cursor = max(cursor, top + height + padding.bottom)
//!     fade     → darken;      cursor unchanged
//! ```

use image::RgbImage;
use tracing::debug;

use crate::CardError;
use crate::config::CardConfig;
use crate::layers::{render_black_fade, render_image_layer};
use crate::preset::{Layer, Preset, TextboxLayer};
use crate::style::Color;
use crate::text::TextBox;

/// Running vertical offset used to place `auto` layers.
///
/// Only ever moves down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(i32);

impl Cursor {
    pub const TOP: Cursor = Cursor(0);

    pub fn y(self) -> i32 {
        self.0
    }

    /// Move down to `bottom` if it lies below the current position.
    #[must_use]
    pub fn advance_to(self, bottom: i32) -> Cursor {
        Cursor(self.0.max(bottom))
    }
}

/// Canvas dimensions for a composition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composer {
    width: u32,
    height: u32,
}

impl Default for Composer {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_SIZE.0,
            height: Self::DEFAULT_SIZE.1,
        }
    }
}

impl Composer {
    /// Portrait 4:5 card.
    pub const DEFAULT_SIZE: (u32, u32) = (1080, 1350);

    pub fn new(width: u32, height: u32) -> Result<Self, CardError> {
        if width == 0 || height == 0 {
            return Err(CardError::Image(format!(
                "canvas size must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn from_config(config: &CardConfig) -> Result<Self, CardError> {
        Self::new(config.width, config.height)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render every layer of `preset` onto a fresh canvas.
    ///
    /// Either every layer is rendered and the finished canvas returned, or
    /// the first failing layer's error is returned and the canvas discarded.
    pub fn compose(&self, preset: &Preset) -> Result<RgbImage, CardError> {
        self.compose_traced(preset).map(|(canvas, _)| canvas)
    }

    /// Like [`compose`](Self::compose), also returning the cursor after each layer.
    pub fn compose_traced(&self, preset: &Preset) -> Result<(RgbImage, Vec<Cursor>), CardError> {
        let mut canvas = RgbImage::from_pixel(self.width, self.height, preset.bg_color.to_rgb());
        let mut cursor = Cursor::TOP;
        let mut trace = Vec::with_capacity(preset.layers.len());

        for (index, layer) in preset.layers.iter().enumerate() {
            let next = render_layer(&mut canvas, layer, cursor)
                .map_err(|e| annotate(e, index, layer))?;
            debug!(
                index,
                kind = layer.kind(),
                cursor_before = cursor.y(),
                cursor_after = next.y(),
                "layer rendered"
            );
            cursor = next;
            trace.push(cursor);
        }

        Ok((canvas, trace))
    }
}

/// Render one layer and return the advanced cursor.
fn render_layer(canvas: &mut RgbImage, layer: &Layer, cursor: Cursor) -> Result<Cursor, CardError> {
    match layer {
        Layer::Image(image) => {
            let (top, height) = render_image_layer(canvas, image, cursor.y())?;
            Ok(cursor.advance_to(top.saturating_add(height)))
        }
        Layer::Textbox(textbox) => render_textbox(canvas, textbox, cursor),
        Layer::BlackFade(fade) => {
            render_black_fade(canvas, fade.height);
            Ok(cursor)
        }
    }
}

fn render_textbox(canvas: &mut RgbImage, layer: &TextboxLayer, cursor: Cursor) -> Result<Cursor, CardError> {
    layer.validate()?;
    let y = layer.position.y.resolve(cursor.y(), layer.auto_y_padding);
    let block = TextBox {
        text: &layer.text,
        font: layer.font.as_ref(),
        max_width: layer.max_width,
        text_fill: layer.text_fill,
        bg_fill: layer.bg_fill.unwrap_or(Color::BLACK),
        bg_type: layer.bg_type,
        padding: layer.padding,
        line_spacing: layer.line_spacing,
        uppercase: layer.uppercase,
    };
    let size = block.draw(canvas, layer.position.x, y);
    Ok(cursor.advance_to(
        y.saturating_add(size.height)
            .saturating_add(layer.padding.bottom),
    ))
}

fn annotate(err: CardError, index: usize, layer: &Layer) -> CardError {
    match err {
        CardError::Image(msg) => CardError::Image(format!("layer {} ({}): {}", index, layer.kind(), msg)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{ImageLayer, TextboxLayer};
    use crate::style::Position;
    use crate::text::{BlockFont, FontRef};
    use image::{DynamicImage, Rgb};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn font() -> FontRef {
        Arc::new(BlockFont::new(10, 20))
    }

    fn solid(w: u32, h: u32) -> Arc<DynamicImage> {
        Arc::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([10, 20, 30]))))
    }

    #[test]
    fn test_cursor_advance_is_monotonic() {
        let c = Cursor::TOP.advance_to(50);
        assert_eq!(c.y(), 50);
        assert_eq!(c.advance_to(20).y(), 50);
        assert_eq!(c.advance_to(80).y(), 80);
    }

    #[test]
    fn test_zero_canvas_rejected() {
        assert!(Composer::new(0, 10).is_err());
        assert!(Composer::new(10, 0).is_err());
    }

    #[test]
    fn test_empty_preset_is_background() {
        let composer = Composer::new(20, 30).unwrap();
        let canvas = composer.compose(&Preset::new(Color::rgb(244, 244, 244))).unwrap();
        assert_eq!(canvas.dimensions(), (20, 30));
        assert!(canvas.pixels().all(|p| *p == Rgb([244, 244, 244])));
    }

    #[test]
    fn test_auto_layers_stack() {
        let composer = Composer::new(200, 400).unwrap();
        let preset = Preset::default()
            .layer(ImageLayer::new(solid(10, 40), Position::auto(0)))
            .layer(ImageLayer::new(solid(10, 25), Position::auto(0)).auto_y_padding(5))
            .layer(TextboxLayer::new("hello", font(), Position::auto(0), 200).padding(3).unwrap());
        let (_, trace) = composer.compose_traced(&preset).unwrap();
        let ys: Vec<i32> = trace.iter().map(|c| c.y()).collect();
        // 40; 40 + 5 + 25 = 70; 70 + text height 20 + bottom padding 3 = 93
        assert_eq!(ys, vec![40, 70, 93]);
    }

    #[test]
    fn test_explicit_layer_above_cursor_does_not_move_it_up() {
        let composer = Composer::new(100, 300).unwrap();
        let preset = Preset::default()
            .layer(ImageLayer::new(solid(10, 200), Position::at(0, 0)))
            .layer(ImageLayer::new(solid(10, 10), Position::at(0, 5)));
        let (_, trace) = composer.compose_traced(&preset).unwrap();
        assert_eq!(trace[1].y(), 200);
    }

    #[test]
    fn test_fade_leaves_cursor() {
        let composer = Composer::new(100, 300).unwrap();
        let preset = Preset::default()
            .layer(ImageLayer::new(solid(10, 60), Position::auto(0)))
            .black_fade(100);
        let (_, trace) = composer.compose_traced(&preset).unwrap();
        assert_eq!(trace[0], trace[1]);
    }

    #[test]
    fn test_failure_returns_error_not_canvas() {
        let composer = Composer::new(100, 100).unwrap();
        let preset = Preset::default()
            .layer(TextboxLayer::new("ok", font(), Position::at(0, 0), 100))
            .layer(ImageLayer::new(solid(0, 0), Position::auto(0)));
        let err = composer.compose(&preset).unwrap_err();
        assert!(err.to_string().contains("layer 1 (image)"), "{}", err);
    }

    #[test]
    fn test_layers_near_coordinate_limits_saturate_cursor() {
        let composer = Composer::new(50, 50).unwrap();
        let preset = Preset::default()
            .layer(ImageLayer::new(solid(10, 100), Position::at(0, i32::MAX - 10)))
            .layer(TextboxLayer::new("still here", font(), Position::auto(40), 50).padding(5).unwrap())
            .layer(ImageLayer::new(solid(10, 10), Position::auto(0)).auto_y_padding(i32::MAX));
        let (canvas, trace) = composer.compose_traced(&preset).unwrap();
        assert!(trace.iter().all(|c| c.y() == i32::MAX), "{:?}", trace);
        assert!(canvas.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_textbox_far_below_canvas_advances_cursor() {
        let composer = Composer::new(50, 50).unwrap();
        // three 20px lines and two gaps overflow i32 from here
        let preset = Preset::default()
            .layer(TextboxLayer::new("ab cd ef", font(), Position::at(0, i32::MAX - 30), 20).padding(4).unwrap());
        let (_, trace) = composer.compose_traced(&preset).unwrap();
        assert_eq!(trace[0].y(), i32::MAX);
    }

    #[test]
    fn test_negative_line_spacing_set_directly_fails() {
        let mut layer = TextboxLayer::new("a b", font(), Position::at(0, 0), 10);
        layer.line_spacing = -30;
        let err = Composer::new(50, 50).unwrap().compose(&Preset::default().layer(layer)).unwrap_err();
        assert!(matches!(err, CardError::InvalidSpacing(_)), "{}", err);
    }

    #[test]
    fn test_composer_is_reusable() {
        let composer = Composer::new(50, 50).unwrap();
        let preset = Preset::default().layer(ImageLayer::new(solid(10, 10), Position::auto(0)));
        let (_, a) = composer.compose_traced(&preset).unwrap();
        let (_, b) = composer.compose_traced(&preset).unwrap();
        assert_eq!(a, b);
    }
}
