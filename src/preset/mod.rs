//! # Presets
//!
//! A [`Preset`] is the complete description of one card: a background color
//! and an ordered list of [`Layer`]s. Layer order is render order.
//!
//! Presets are built in Rust with the layer builders, or loaded from JSON
//! with [`PresetFile`]. Either way every value is validated before the preset
//! exists, so composition never starts from invalid style data.
//!
//! ```
//! use std::sync::Arc;
//! use cardpress::preset::{ImageLayer, Preset, TextboxLayer};
//! use cardpress::style::{Color, Position};
//! use cardpress::text::BlockFont;
//! use image::{DynamicImage, RgbImage};
//!
//! let photo = Arc::new(DynamicImage::ImageRgb8(RgbImage::new(800, 800)));
//! let preset = Preset::new(Color::rgb(244, 244, 244))
//!     .layer(
//!         TextboxLayer::new("Hello World", Arc::new(BlockFont::TITLE), Position::at(80, 100), 920)
//!             .text_fill(Color::WHITE)
//!             .background(Color::rgb(0, 45, 98))
//!             .padding(10)
//!             .unwrap(),
//!     )
//!     .layer(ImageLayer::new(photo, Position::auto(0)).resize_to_width())
//!     .black_fade(300);
//! assert_eq!(preset.layers.len(), 3);
//! ```

pub mod file;
pub mod news;

pub use file::PresetFile;
pub use news::{NewsTemplate, source_line};

use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

use crate::CardError;
use crate::layers::ResizeMode;
use crate::style::{BgType, Color, Position, Spacing};
use crate::text::FontRef;

/// An image pasted onto the canvas.
#[derive(Clone)]
pub struct ImageLayer {
    pub image: Arc<DynamicImage>,
    pub position: Position,
    pub resize: ResizeMode,
    /// Extra offset below the cursor when `position.y` is auto.
    pub auto_y_padding: i32,
    /// Anchor the image's bottom edge to the canvas bottom.
    pub from_bottom: bool,
    /// Center-crop to the canvas aspect ratio and scale to the canvas size.
    pub crop_center_scale: bool,
}

impl fmt::Debug for ImageLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageLayer")
            .field("image", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .field("resize", &self.resize)
            .field("auto_y_padding", &self.auto_y_padding)
            .field("from_bottom", &self.from_bottom)
            .field("crop_center_scale", &self.crop_center_scale)
            .finish()
    }
}

impl ImageLayer {
    pub fn new(image: Arc<DynamicImage>, position: Position) -> Self {
        Self {
            image,
            position,
            resize: ResizeMode::None,
            auto_y_padding: 0,
            from_bottom: false,
            crop_center_scale: false,
        }
    }

    /// Stretch to the full canvas.
    pub fn resize_to_height(mut self) -> Self {
        self.resize = ResizeMode::FillCanvas;
        self
    }

    /// Scale to the canvas width, preserving aspect ratio.
    pub fn resize_to_width(mut self) -> Self {
        self.resize = ResizeMode::CanvasWidth;
        self
    }

    /// Scale against a width and/or height limit.
    pub fn max_size(mut self, max_width: Option<u32>, max_height: Option<u32>) -> Self {
        self.resize = ResizeMode::from_flags(false, false, max_width, max_height);
        self
    }

    pub fn auto_y_padding(mut self, padding: i32) -> Self {
        self.auto_y_padding = padding;
        self
    }

    pub fn from_bottom(mut self) -> Self {
        self.from_bottom = true;
        self
    }

    pub fn crop_center_scale(mut self) -> Self {
        self.crop_center_scale = true;
        self
    }
}

/// A word-wrapped block of text.
#[derive(Debug, Clone)]
pub struct TextboxLayer {
    pub text: String,
    pub position: Position,
    pub font: FontRef,
    pub max_width: i32,
    pub text_fill: Color,
    /// Background color; black when unset and `bg_type` is solid.
    pub bg_fill: Option<Color>,
    pub bg_type: BgType,
    /// Background padding around each line. `padding.bottom` is also added to
    /// the cursor after the block.
    pub padding: Spacing,
    pub auto_y_padding: i32,
    pub line_spacing: i32,
    pub uppercase: bool,
}

impl TextboxLayer {
    pub fn new(text: impl Into<String>, font: FontRef, position: Position, max_width: i32) -> Self {
        Self {
            text: text.into(),
            position,
            font,
            max_width,
            text_fill: Color::BLACK,
            bg_fill: None,
            bg_type: BgType::None,
            padding: Spacing::default(),
            auto_y_padding: 0,
            line_spacing: 5,
            uppercase: false,
        }
    }

    pub fn text_fill(mut self, color: Color) -> Self {
        self.text_fill = color;
        self
    }

    /// Draw a solid background of `color` behind every line.
    pub fn background(mut self, color: Color) -> Self {
        self.bg_fill = Some(color);
        self.bg_type = BgType::Solid;
        self
    }

    /// Uniform padding; fails for negative values.
    pub fn padding(mut self, padding: i32) -> Result<Self, CardError> {
        self.padding = Spacing::uniform(padding)?;
        Ok(self)
    }

    pub fn auto_y_padding(mut self, padding: i32) -> Self {
        self.auto_y_padding = padding;
        self
    }

    /// Gap between wrapped lines; fails for negative values.
    pub fn line_spacing(mut self, spacing: i32) -> Result<Self, CardError> {
        self.line_spacing = spacing;
        self.validate()?;
        Ok(self)
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    /// Wrap width and line spacing must be non-negative.
    pub fn validate(&self) -> Result<(), CardError> {
        if self.max_width < 0 {
            return Err(CardError::InvalidSpacing(format!(
                "max_width must be non-negative, got {}",
                self.max_width
            )));
        }
        if self.line_spacing < 0 {
            return Err(CardError::InvalidSpacing(format!(
                "line_spacing must be non-negative, got {}",
                self.line_spacing
            )));
        }
        Ok(())
    }
}

/// Black gradient over the bottom `height` rows of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeLayer {
    pub height: u32,
}

/// One unit of a preset's render list.
#[derive(Debug, Clone)]
pub enum Layer {
    Image(ImageLayer),
    Textbox(TextboxLayer),
    BlackFade(FadeLayer),
}

impl Layer {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Layer::Image(_) => "image",
            Layer::Textbox(_) => "textbox",
            Layer::BlackFade(_) => "black_fade",
        }
    }
}

impl From<ImageLayer> for Layer {
    fn from(layer: ImageLayer) -> Self {
        Layer::Image(layer)
    }
}

impl From<TextboxLayer> for Layer {
    fn from(layer: TextboxLayer) -> Self {
        Layer::Textbox(layer)
    }
}

impl From<FadeLayer> for Layer {
    fn from(layer: FadeLayer) -> Self {
        Layer::BlackFade(layer)
    }
}

/// Background color plus ordered layers.
#[derive(Debug, Clone)]
pub struct Preset {
    pub bg_color: Color,
    pub layers: Vec<Layer>,
}

impl Default for Preset {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}

impl Preset {
    pub fn new(bg_color: Color) -> Self {
        Self {
            bg_color,
            layers: Vec::new(),
        }
    }

    /// Append a layer (builder style).
    pub fn layer(mut self, layer: impl Into<Layer>) -> Self {
        self.layers.push(layer.into());
        self
    }

    /// Append a black bottom fade (builder style).
    pub fn black_fade(self, height: u32) -> Self {
        self.layer(FadeLayer { height })
    }

    pub fn push(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
    }
}
