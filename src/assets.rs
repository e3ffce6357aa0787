//! # Assets
//!
//! Named fonts and images shared by presets. An [`AssetStore`] is filled once
//! (from files, downloads, or in-memory values) and then handed to preset
//! resolution, which looks assets up by name.

use image::DynamicImage;
use image::imageops::FilterType;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::CardError;
use crate::layers::image::fit_within;
use crate::text::{FontRef, TtfFont};

/// Load a TrueType/OpenType font at `px` pixels.
pub fn load_font(path: impl AsRef<Path>, px: f32) -> Result<FontRef, CardError> {
    let font = TtfFont::load(path.as_ref(), px)?;
    debug!(path = %path.as_ref().display(), px, "font loaded");
    Ok(Arc::new(font))
}

/// Decode an image file, shrinking it to fit inside `max_size` when given.
pub fn load_image(path: impl AsRef<Path>, max_size: Option<(u32, u32)>) -> Result<Arc<DynamicImage>, CardError> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|e| CardError::Image(format!("cannot load {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "image loaded");
    Ok(Arc::new(shrink_to_fit(image, max_size)))
}

/// Downscale `image` to fit inside `max_size`, preserving aspect ratio.
/// Images already inside the box are returned unchanged.
pub fn shrink_to_fit(image: DynamicImage, max_size: Option<(u32, u32)>) -> DynamicImage {
    let Some(max_size) = max_size else {
        return image;
    };
    let (w, h) = fit_within((image.width(), image.height()), max_size);
    if (w, h) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(w, h, FilterType::Lanczos3)
    }
}

/// Fonts and images addressed by name.
#[derive(Debug, Default, Clone)]
pub struct AssetStore {
    fonts: HashMap<String, FontRef>,
    images: HashMap<String, Arc<DynamicImage>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_font(&mut self, name: impl Into<String>, font: FontRef) {
        self.fonts.insert(name.into(), font);
    }

    pub fn insert_image(&mut self, name: impl Into<String>, image: Arc<DynamicImage>) {
        self.images.insert(name.into(), image);
    }

    pub fn font(&self, name: &str) -> Result<FontRef, CardError> {
        self.fonts
            .get(name)
            .cloned()
            .ok_or_else(|| CardError::Preset(format!("unknown font '{}'", name)))
    }

    pub fn image(&self, name: &str) -> Result<Arc<DynamicImage>, CardError> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| CardError::Preset(format!("unknown image '{}'", name)))
    }
}
