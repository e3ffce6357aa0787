//! # Image Fetching
//!
//! Resolves story images from URLs, local files, or already-decoded values.
//! Downloaded and loaded images are converted to RGBA and shrunk to fit the
//! configured source box. Every resolved image is cached by its source string
//! for the lifetime of the fetcher.
//!
//! When an image can't be resolved, [`ImageFetcher::fetch_or_placeholder`]
//! logs a warning and substitutes a flat gray card so the story still renders.

use image::{DynamicImage, RgbImage};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::CardError;
use crate::assets::shrink_to_fit;
use crate::config::CardConfig;
use crate::style::Color;
use crate::text::TextFont;

const PLACEHOLDER_GRAY: Color = Color::rgb(200, 200, 200);

/// Where a story's image comes from.
///
/// Deserialized from a plain string: `http://` and `https://` prefixes are
/// URLs, anything else is a file path.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "String")]
pub enum ImageSource {
    Url(String),
    Path(PathBuf),
    Loaded(Arc<DynamicImage>),
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            ImageSource::Url(s)
        } else {
            ImageSource::Path(PathBuf::from(s))
        }
    }
}

impl ImageSource {
    fn cache_key(&self) -> Option<String> {
        match self {
            ImageSource::Url(url) => Some(url.clone()),
            ImageSource::Path(path) => Some(path.display().to_string()),
            ImageSource::Loaded(_) => None,
        }
    }
}

/// Gray stand-in image, optionally labelled "Image Not Available".
pub fn placeholder_image((width, height): (u32, u32), font: Option<&dyn TextFont>) -> DynamicImage {
    let mut canvas = RgbImage::from_pixel(width, height, PLACEHOLDER_GRAY.to_rgb());
    if let Some(font) = font {
        let mut y = 50;
        for word in ["Image", "Not", "Available"] {
            font.draw(&mut canvas, 50, y, word, Color::BLACK);
            y += font.line_height();
        }
    }
    DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(canvas).to_rgba8())
}

fn normalize(image: DynamicImage, max_size: (u32, u32)) -> DynamicImage {
    shrink_to_fit(DynamicImage::ImageRgba8(image.to_rgba8()), Some(max_size))
}

/// Downloads and caches source images.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, Arc<DynamicImage>>>>,
    max_size: (u32, u32),
    placeholder_size: (u32, u32),
}

impl ImageFetcher {
    pub fn new(config: &CardConfig) -> Result<Self, CardError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cardpress/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CardError::Fetch(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            client,
            cache: Arc::new(RwLock::new(HashMap::new())),
            max_size: config.max_source_size,
            placeholder_size: config.placeholder_size,
        })
    }

    /// Resolve `source` to a decoded, normalized image.
    pub async fn fetch(&self, source: &ImageSource) -> Result<Arc<DynamicImage>, CardError> {
        let key = source.cache_key();
        if let Some(key) = &key {
            if let Some(hit) = self.cache.read().await.get(key) {
                debug!(source = %key, "image cache hit");
                return Ok(hit.clone());
            }
        }

        let image = match source {
            ImageSource::Loaded(image) => return Ok(image.clone()),
            ImageSource::Url(url) => self.download(url).await?,
            ImageSource::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    CardError::Image(format!("cannot read {}: {}", path.display(), e))
                })?;
                image::load_from_memory(&bytes).map_err(|e| {
                    CardError::Image(format!("cannot decode {}: {}", path.display(), e))
                })?
            }
        };
        let image = Arc::new(normalize(image, self.max_size));

        if let Some(key) = key {
            self.cache.write().await.insert(key, image.clone());
        }
        Ok(image)
    }

    async fn download(&self, url: &str) -> Result<DynamicImage, CardError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CardError::Fetch(format!("failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(CardError::Fetch(format!(
                "failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CardError::Fetch(format!("failed to read image data: {}", e)))?;
        debug!(url, bytes = bytes.len(), "image downloaded");
        image::load_from_memory(&bytes)
            .map_err(|e| CardError::Image(format!("failed to decode {}: {}", url, e)))
    }

    /// Like [`fetch`](Self::fetch), substituting a placeholder on failure.
    pub async fn fetch_or_placeholder(&self, source: &ImageSource, font: Option<&dyn TextFont>) -> Arc<DynamicImage> {
        match self.fetch(source).await {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "using placeholder image");
                Arc::new(placeholder_image(self.placeholder_size, font))
            }
        }
    }
}
