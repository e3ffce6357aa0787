//! Wrapped text blocks with optional per-line backgrounds.

use image::RgbImage;

use super::font::{TextBounds, TextFont};
use super::wrap::wrap_with_font;
use crate::paint::fill_rect;
use crate::style::{BgType, Color, Spacing};

/// Width and height of a rendered block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockSize {
    pub width: i32,
    pub height: i32,
}

/// One wrapped line, placed and ready to draw. Lives only for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub bounds: TextBounds,
    /// Top of the glyph run.
    pub y: i32,
    /// Background rectangle `(x0, y0, x1, y1)`, half-open, when the block has one.
    pub background: Option<(i32, i32, i32, i32)>,
}

/// Style bundle for one text block.
#[derive(Debug, Clone, Copy)]
pub struct TextBox<'a> {
    pub text: &'a str,
    pub font: &'a dyn TextFont,
    pub max_width: i32,
    pub text_fill: Color,
    pub bg_fill: Color,
    pub bg_type: BgType,
    pub padding: Spacing,
    pub line_spacing: i32,
    pub uppercase: bool,
}

impl<'a> TextBox<'a> {
    /// Plain text block: no background, no padding, default 5px line spacing.
    pub fn new(text: &'a str, font: &'a dyn TextFont, max_width: i32) -> Self {
        Self {
            text,
            font,
            max_width,
            text_fill: Color::BLACK,
            bg_fill: Color::BLACK,
            bg_type: BgType::None,
            padding: Spacing::default(),
            line_spacing: 5,
            uppercase: false,
        }
    }

    /// Wrap and place every line with the block's top-left at `(x, y)`.
    ///
    /// The block height accumulates, per line, the background rectangle's
    /// height when a background is drawn and the measured glyph height
    /// otherwise. `line_spacing` goes between lines, never after the last.
    pub fn layout(&self, x: i32, y: i32) -> (Vec<TextLine>, BlockSize) {
        let text = if self.uppercase {
            self.text.to_uppercase()
        } else {
            self.text.to_string()
        };
        let wrapped = wrap_with_font(&text, self.font, self.max_width);
        let line_height = self.font.line_height();
        let count = wrapped.len();

        let mut lines = Vec::with_capacity(count);
        let mut total = 0;

        for (i, text) in wrapped.into_iter().enumerate() {
            let bounds = self.font.measure(&text);
            let line_y = y.saturating_add(total);

            let background = match self.bg_type {
                BgType::Solid => Some((
                    x.saturating_sub(self.padding.left),
                    line_y.saturating_sub(self.padding.top),
                    x.saturating_add(bounds.width()).saturating_add(self.padding.right),
                    line_y
                        .saturating_add(line_height)
                        .saturating_add(self.padding.bottom),
                )),
                BgType::None => None,
            };

            // measured from the line metrics, so clamping at the canvas limits
            // doesn't shrink the block
            let advance = match background {
                Some(_) => line_height
                    .saturating_add(self.padding.top)
                    .saturating_add(self.padding.bottom),
                None => bounds.height(),
            };
            total = total.saturating_add(advance);
            if i + 1 < count {
                total = total.saturating_add(self.line_spacing);
            }

            lines.push(TextLine {
                text,
                bounds,
                y: line_y,
                background,
            });
        }

        (
            lines,
            BlockSize {
                width: self.max_width,
                height: total,
            },
        )
    }

    /// Block size without touching any canvas.
    pub fn measure(&self) -> BlockSize {
        self.layout(0, 0).1
    }

    /// Draw the block with its top-left at `(x, y)` and return its size.
    ///
    /// Each line's background (if any) is painted before its glyphs.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32) -> BlockSize {
        let (lines, size) = self.layout(x, y);
        for line in &lines {
            if let Some((x0, y0, x1, y1)) = line.background {
                fill_rect(canvas, x0, y0, x1, y1, self.bg_fill);
            }
            self.font.draw(canvas, x, line.y, &line.text, self.text_fill);
        }
        size
    }
}
