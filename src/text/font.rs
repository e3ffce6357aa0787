//! Font metrics and glyph drawing.
//!
//! Layout only ever talks to [`TextFont`]: it measures a string's pixel
//! bounding box, reports the recommended line height, and draws a string
//! onto a canvas. Two implementations ship with the crate:
//!
//! - [`TtfFont`]: any TrueType/OpenType font, rasterized with ab_glyph
//!   (anti-aliased, kerned).
//! - [`BlockFont`]: a fixed-metric bitmap face that draws every glyph as a
//!   solid cell. Used when no font file is configured and for deterministic
//!   layout tests.

use ab_glyph::{Font, FontArc, Glyph, ScaleFont, point};
use image::RgbImage;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::CardError;
use crate::paint::{blend_at, fill_rect};
use crate::style::Color;

/// Pixel bounding box of a rendered string, relative to the draw origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        (self.x1 - self.x0).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y1 - self.y0).max(0)
    }
}

/// Metrics and drawing for one font at one size.
///
/// Implementations must be read-only: concurrent compositions share fonts.
pub trait TextFont: Send + Sync + fmt::Debug {
    /// Measure the bounding box `text` would occupy when drawn at (0, 0).
    fn measure(&self, text: &str) -> TextBounds;

    /// Recommended distance between consecutive baselines.
    fn line_height(&self) -> i32;

    /// Draw `text` with its top (ascender) line at `y`.
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Color);
}

/// Shared, immutable font handle.
pub type FontRef = Arc<dyn TextFont>;

// ============================================================================
// TTF
// ============================================================================

/// A TrueType/OpenType font at a fixed pixel size.
#[derive(Clone)]
pub struct TtfFont {
    font: FontArc,
    px: f32,
}

impl fmt::Debug for TtfFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfFont").field("px", &self.px).finish()
    }
}

impl TtfFont {
    /// Parse font data and bind it to a pixel size.
    pub fn from_bytes(bytes: Vec<u8>, px: f32) -> Result<Self, CardError> {
        if px.is_nan() || px <= 0.0 {
            return Err(CardError::Font(format!("font size must be positive, got {}", px)));
        }
        let font = FontArc::try_from_vec(bytes).map_err(|e| CardError::Font(e.to_string()))?;
        Ok(Self { font, px })
    }

    /// Load a font file from disk.
    pub fn load(path: impl AsRef<Path>, px: f32) -> Result<Self, CardError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CardError::Font(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_bytes(bytes, px)
    }

    pub fn size(&self) -> f32 {
        self.px
    }

    /// Position glyphs along a baseline at `(x, y + ascent)`. Returns the glyphs
    /// and the final caret offset.
    fn layout(&self, text: &str, x: f32, y: f32) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(self.px);
        let baseline = y + scaled.ascent();
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = x;
        let mut prev = None;

        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(self.px, point(caret, baseline)));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }

        (glyphs, caret - x)
    }
}

impl TextFont for TtfFont {
    fn measure(&self, text: &str) -> TextBounds {
        let (glyphs, advance) = self.layout(text, 0.0, 0.0);
        let mut bounds: Option<TextBounds> = None;

        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let r = outlined.px_bounds();
            let b = TextBounds {
                x0: r.min.x.floor() as i32,
                y0: r.min.y.floor() as i32,
                x1: r.max.x.ceil() as i32,
                y1: r.max.y.ceil() as i32,
            };
            bounds = Some(match bounds {
                None => b,
                Some(acc) => TextBounds {
                    x0: acc.x0.min(b.x0),
                    y0: acc.y0.min(b.y0),
                    x1: acc.x1.max(b.x1),
                    y1: acc.y1.max(b.y1),
                },
            });
        }

        // Whitespace-only strings have no outlines; they still advance the caret.
        bounds.unwrap_or(TextBounds {
            x0: 0,
            y0: 0,
            x1: advance.ceil() as i32,
            y1: 0,
        })
    }

    fn line_height(&self) -> i32 {
        (self.px.round() as i32).saturating_add(4)
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Color) {
        let (glyphs, _) = self.layout(text, x as f32, y as f32);
        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = (bounds.min.x.floor() as i32).saturating_add(gx as i32);
                let py = (bounds.min.y.floor() as i32).saturating_add(gy as i32);
                blend_at(canvas, px, py, color, coverage.min(1.0));
            });
        }
    }
}

// ============================================================================
// BLOCK FONT
// ============================================================================

/// Fixed-metric bitmap face: every character occupies a `char_width` ×
/// `char_height` cell and non-space characters are drawn as a filled cell
/// inset by one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFont {
    pub char_width: i32,
    pub char_height: i32,
}

impl BlockFont {
    /// Title-sized cells, roughly matching a 48px proportional font.
    pub const TITLE: BlockFont = BlockFont {
        char_width: 26,
        char_height: 48,
    };

    /// Caption-sized cells, roughly matching a 24px proportional font.
    pub const SMALL: BlockFont = BlockFont {
        char_width: 13,
        char_height: 24,
    };

    pub const fn new(char_width: i32, char_height: i32) -> Self {
        Self {
            char_width,
            char_height,
        }
    }
}

impl TextFont for BlockFont {
    fn measure(&self, text: &str) -> TextBounds {
        let n = text.chars().count() as i32;
        if n == 0 {
            return TextBounds::default();
        }
        TextBounds {
            x0: 0,
            y0: 0,
            x1: n.saturating_mul(self.char_width),
            y1: self.char_height,
        }
    }

    fn line_height(&self) -> i32 {
        self.char_height.saturating_add(4)
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let cx = x.saturating_add((i as i32).saturating_mul(self.char_width));
            fill_rect(
                canvas,
                cx.saturating_add(1),
                y.saturating_add(1),
                cx.saturating_add(self.char_width - 1),
                y.saturating_add(self.char_height - 1),
                color,
            );
        }
    }
}
