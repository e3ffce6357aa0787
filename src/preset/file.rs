//! JSON preset files.
//!
//! A preset file names its assets once and refers to them by name from the
//! layers:
//!
//! ```json
//! {
//!   "bg_color": [244, 244, 244],
//!   "fonts": {
//!     "title": { "path": "fonts/Roboto-Bold.ttf", "size": 52 },
//!     "small": { "builtin": "small" }
//!   },
//!   "images": {
//!     "photo": { "path": "photo.jpg", "max_size": [800, 800] }
//!   },
//!   "layers": [
//!     { "type": "textbox", "text": "Hello", "font": "title", "position": [80, 100],
//!       "max_width": 920, "text_fill": [255, 255, 255], "bg_fill": [0, 71, 171],
//!       "bg_type": "solid", "padding": 10 },
//!     { "type": "image", "image": "photo", "position": [0, "auto"], "resize_to_width": true },
//!     { "type": "black_fade", "height": 500 }
//!   ]
//! }
//! ```
//!
//! Relative asset paths resolve against the preset file's directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{FadeLayer, ImageLayer, Layer, Preset, TextboxLayer};
use crate::CardError;
use crate::assets::{AssetStore, load_font, load_image};
use crate::layers::ResizeMode;
use crate::style::{BgType, Color, Position, Spacing};
use crate::text::BlockFont;

fn default_bg_color() -> Color {
    Color::rgb(244, 244, 244)
}

fn default_text_fill() -> Color {
    Color::BLACK
}

fn default_max_width() -> i32 {
    1000
}

fn default_line_spacing() -> i32 {
    5
}

/// Built-in fixed-cell faces usable without a font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinFont {
    Title,
    Small,
}

impl BuiltinFont {
    pub fn face(self) -> BlockFont {
        match self {
            BuiltinFont::Title => BlockFont::TITLE,
            BuiltinFont::Small => BlockFont::SMALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontSpec {
    File { path: PathBuf, size: f32 },
    Builtin { builtin: BuiltinFont },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub max_size: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Image {
        image: String,
        position: Position,
        #[serde(default)]
        resize_to_height: bool,
        #[serde(default)]
        resize_to_width: bool,
        #[serde(default)]
        max_width: Option<u32>,
        #[serde(default)]
        max_height: Option<u32>,
        #[serde(default)]
        from_bottom: bool,
        #[serde(default)]
        crop_center_scale: bool,
        #[serde(default)]
        auto_y_padding: i32,
    },
    Textbox {
        text: String,
        font: String,
        position: Position,
        #[serde(default = "default_max_width")]
        max_width: i32,
        #[serde(default = "default_text_fill")]
        text_fill: Color,
        #[serde(default)]
        bg_fill: Option<Color>,
        #[serde(default)]
        bg_type: BgType,
        #[serde(default)]
        padding: Spacing,
        #[serde(default)]
        auto_y_padding: i32,
        #[serde(default = "default_line_spacing")]
        line_spacing: i32,
        #[serde(default)]
        uppercase: bool,
    },
    BlackFade {
        height: u32,
    },
}

/// The on-disk form of a [`Preset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetFile {
    #[serde(default = "default_bg_color")]
    pub bg_color: Color,
    #[serde(default)]
    pub fonts: BTreeMap<String, FontSpec>,
    #[serde(default)]
    pub images: BTreeMap<String, ImageSpec>,
    pub layers: Vec<LayerSpec>,
}

impl PresetFile {
    pub fn parse(json: &str) -> Result<Self, CardError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read, parse, and resolve a preset file in one step.
    pub fn load(path: impl AsRef<Path>) -> Result<Preset, CardError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CardError::Preset(format!("cannot read {}: {}", path.display(), e)))?;
        let file = Self::parse(&text)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let assets = file.load_assets(base_dir)?;
        file.resolve(&assets)
    }

    /// Load every font and image the file declares.
    pub fn load_assets(&self, base_dir: &Path) -> Result<AssetStore, CardError> {
        let mut store = AssetStore::new();
        for (name, spec) in &self.fonts {
            let font = match spec {
                FontSpec::File { path, size } => load_font(base_dir.join(path), *size)?,
                FontSpec::Builtin { builtin } => Arc::new(builtin.face()),
            };
            store.insert_font(name.clone(), font);
        }
        for (name, spec) in &self.images {
            store.insert_image(name.clone(), load_image(base_dir.join(&spec.path), spec.max_size)?);
        }
        debug!(
            fonts = self.fonts.len(),
            images = self.images.len(),
            "preset assets loaded"
        );
        Ok(store)
    }

    /// Turn layer specs into a [`Preset`], looking assets up in `assets`.
    ///
    /// Fails on the first unknown font or image name.
    pub fn resolve(&self, assets: &AssetStore) -> Result<Preset, CardError> {
        let mut preset = Preset::new(self.bg_color);
        for (index, spec) in self.layers.iter().enumerate() {
            let layer = resolve_layer(spec, assets)
                .map_err(|e| CardError::Preset(format!("layer {}: {}", index, e)))?;
            preset.push(layer);
        }
        Ok(preset)
    }
}

fn resolve_layer(spec: &LayerSpec, assets: &AssetStore) -> Result<Layer, CardError> {
    let layer = match spec {
        LayerSpec::Image {
            image,
            position,
            resize_to_height,
            resize_to_width,
            max_width,
            max_height,
            from_bottom,
            crop_center_scale,
            auto_y_padding,
        } => Layer::Image(ImageLayer {
            image: assets.image(image)?,
            position: *position,
            resize: ResizeMode::from_flags(*resize_to_height, *resize_to_width, *max_width, *max_height),
            auto_y_padding: *auto_y_padding,
            from_bottom: *from_bottom,
            crop_center_scale: *crop_center_scale,
        }),
        LayerSpec::Textbox {
            text,
            font,
            position,
            max_width,
            text_fill,
            bg_fill,
            bg_type,
            padding,
            auto_y_padding,
            line_spacing,
            uppercase,
        } => {
            let layer = TextboxLayer {
                text: text.clone(),
                position: *position,
                font: assets.font(font)?,
                max_width: *max_width,
                text_fill: *text_fill,
                bg_fill: *bg_fill,
                bg_type: *bg_type,
                padding: *padding,
                auto_y_padding: *auto_y_padding,
                line_spacing: *line_spacing,
                uppercase: *uppercase,
            };
            layer.validate()?;
            Layer::Textbox(layer)
        }
        LayerSpec::BlackFade { height } => Layer::BlackFade(FadeLayer { height: *height }),
    };
    Ok(layer)
}
